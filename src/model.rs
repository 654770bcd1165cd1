use serde::{Serialize, Deserialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,

    pub net_total: f64,
    pub cost: f64,
    pub profit: f64,

    // Keyed by configured outlet name. An entry exists on every record when
    // the outlet's column was found in the file; 0.0 means a blank cell.
    pub units_sold: HashMap<String, f64>,
    pub inventory_on_hand: HashMap<String, f64>,
}

impl ProductRecord {
    pub fn units_sold_at(&self, outlet: &str) -> f64 {
        self.units_sold.get(outlet).copied().unwrap_or(0.0)
    }

    pub fn inventory_at(&self, outlet: &str) -> f64 {
        self.inventory_on_hand.get(outlet).copied().unwrap_or(0.0)
    }

    pub fn total_units_sold(&self) -> f64 {
        self.units_sold.values().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateTotals {
    pub total_sales: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub margin_percent: f64,
}

impl AggregateTotals {
    pub fn zero() -> Self {
        AggregateTotals {
            total_sales: 0.0,
            total_cost: 0.0,
            total_profit: 0.0,
            margin_percent: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutletTotals {
    pub outlet: String,
    pub sales: f64,
    pub allocated_cost: f64,
    pub profit: f64,
    pub margin_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopEntry {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub name: String,
    pub projected_demand: f64,
    pub inventory_on_hand: f64,
    pub units_to_order: f64,
}
