use crate::config::AllocationStrategy;
use crate::model::{AggregateTotals, OutletTotals, ProductRecord, TopEntry};
use std::collections::HashMap;
use tracing::warn;

// Absolute tolerance, in currency units, before per-outlet figures are
// flagged as disagreeing with the grand total.
pub const RECONCILE_TOLERANCE: f64 = 0.01;

pub fn compute_aggregate_totals(records: &[ProductRecord]) -> AggregateTotals {
    let total_sales: f64 = records.iter().map(|r| r.net_total).sum();
    let total_cost: f64 = records.iter().map(|r| r.cost).sum();
    let total_profit = total_sales - total_cost;

    AggregateTotals {
        total_sales,
        total_cost,
        total_profit,
        margin_percent: margin_percent(total_profit, total_sales),
    }
}

// Outlet sales are reported in currency: each product's unit price is
// derived from its net total over all units it sold, so outlet figures are
// commensurable with the monetary grand totals.
pub fn compute_outlet_totals(
    records: &[ProductRecord],
    outlets: &[String],
    strategy: AllocationStrategy,
) -> Vec<OutletTotals> {
    let totals = compute_aggregate_totals(records);

    let mut sales = vec![0.0_f64; outlets.len()];
    let mut unit_cost_alloc = vec![0.0_f64; outlets.len()];

    for record in records {
        let units = record.total_units_sold();
        if units <= 0.0 {
            continue;
        }
        let unit_price = record.net_total / units;
        let unit_cost = record.cost / units;

        for (i, outlet) in outlets.iter().enumerate() {
            let sold = record.units_sold_at(outlet);
            sales[i] += sold * unit_price;
            unit_cost_alloc[i] += sold * unit_cost;
        }
    }

    outlets
        .iter()
        .enumerate()
        .map(|(i, outlet)| {
            let allocated_cost = match strategy {
                AllocationStrategy::RevenueShare => {
                    if totals.total_sales != 0.0 {
                        sales[i] / totals.total_sales * totals.total_cost
                    } else {
                        0.0
                    }
                }
                AllocationStrategy::PerUnitCost => unit_cost_alloc[i],
            };
            let profit = sales[i] - allocated_cost;

            OutletTotals {
                outlet: outlet.clone(),
                sales: sales[i],
                allocated_cost,
                profit,
                margin_percent: margin_percent(profit, sales[i]),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationWarning {
    pub outlet_sales_sum: f64,
    pub total_sales: f64,
}

impl ReconciliationWarning {
    pub fn difference(&self) -> f64 {
        self.total_sales - self.outlet_sales_sum
    }
}

// Revenue that no outlet accounts for (e.g. a product with sales but no
// recorded per-outlet units) shows up here as a warning, never an error.
pub fn reconcile(
    outlet_totals: &[OutletTotals],
    totals: &AggregateTotals,
) -> Option<ReconciliationWarning> {
    let outlet_sales_sum: f64 = outlet_totals.iter().map(|t| t.sales).sum();

    if (outlet_sales_sum - totals.total_sales).abs() > RECONCILE_TOLERANCE {
        warn!(
            "per-outlet sales {:.2} disagree with grand total {:.2}",
            outlet_sales_sum, totals.total_sales
        );
        Some(ReconciliationWarning {
            outlet_sales_sum,
            total_sales: totals.total_sales,
        })
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    NetTotal,
    Cost,
    Profit,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::NetTotal => "Ventas",
            Metric::Cost => "Costo",
            Metric::Profit => "Ganancia",
        }
    }

    fn of(&self, record: &ProductRecord) -> f64 {
        match self {
            Metric::NetTotal => record.net_total,
            Metric::Cost => record.cost,
            // Recomputed rather than read from the file, same as aggregates.
            Metric::Profit => record.net_total - record.cost,
        }
    }
}

pub fn compute_top_n(records: &[ProductRecord], metric: Metric, n: usize) -> Vec<TopEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();

    for record in records {
        if !sums.contains_key(&record.name) {
            order.push(record.name.clone());
        }
        *sums.entry(record.name.clone()).or_insert(0.0) += metric.of(record);
    }

    let mut entries: Vec<TopEntry> = order
        .into_iter()
        .map(|name| {
            let value = sums[&name];
            TopEntry { name, value }
        })
        .collect();

    // Stable sort keeps first-encountered order for equal values.
    entries.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    entries.truncate(n);
    entries
}

fn margin_percent(profit: f64, sales: f64) -> f64 {
    if sales != 0.0 {
        profit / sales * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, net_total: f64, cost: f64, sold: &[(&str, f64)]) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            category: None,
            brand: None,
            net_total,
            cost,
            profit: net_total - cost,
            units_sold: sold
                .iter()
                .map(|(o, u)| (o.to_string(), *u))
                .collect(),
            inventory_on_hand: HashMap::new(),
        }
    }

    fn outlets() -> Vec<String> {
        vec!["Centro".to_string(), "Norte".to_string()]
    }

    #[test]
    fn aggregate_totals_basic_scenario() {
        let records = vec![record("Cafe", 100.0, 60.0, &[])];
        let totals = compute_aggregate_totals(&records);
        assert!((totals.total_sales - 100.0).abs() < 1e-9);
        assert!((totals.total_cost - 60.0).abs() < 1e-9);
        assert!((totals.total_profit - 40.0).abs() < 1e-9);
        assert!((totals.margin_percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn margin_is_zero_when_sales_are_zero() {
        let records = vec![record("Cafe", 0.0, 50.0, &[])];
        let totals = compute_aggregate_totals(&records);
        assert_eq!(totals.margin_percent, 0.0);
        assert!((totals.total_profit - (-50.0)).abs() < 1e-9);
    }

    #[test]
    fn outlet_sales_sum_matches_grand_total_when_units_attributed() {
        let records = vec![
            record("Cafe", 100.0, 60.0, &[("Centro", 6.0), ("Norte", 4.0)]),
            record("Azucar", 50.0, 30.0, &[("Centro", 5.0), ("Norte", 0.0)]),
        ];
        let totals = compute_aggregate_totals(&records);
        let per_outlet =
            compute_outlet_totals(&records, &outlets(), AllocationStrategy::RevenueShare);

        let sum: f64 = per_outlet.iter().map(|t| t.sales).sum();
        assert!((sum - totals.total_sales).abs() / totals.total_sales < 1e-6);
        assert!(reconcile(&per_outlet, &totals).is_none());
    }

    #[test]
    fn allocated_cost_sums_to_total_cost_for_both_strategies() {
        let records = vec![
            record("Cafe", 100.0, 60.0, &[("Centro", 6.0), ("Norte", 4.0)]),
            record("Azucar", 50.0, 30.0, &[("Centro", 2.0), ("Norte", 8.0)]),
        ];

        for strategy in [
            AllocationStrategy::RevenueShare,
            AllocationStrategy::PerUnitCost,
        ] {
            let per_outlet = compute_outlet_totals(&records, &outlets(), strategy);
            let allocated: f64 = per_outlet.iter().map(|t| t.allocated_cost).sum();
            assert!(
                (allocated - 90.0).abs() < 1e-6,
                "{strategy:?}: allocated {allocated}"
            );
        }
    }

    #[test]
    fn strategies_differ_when_margins_differ_across_products() {
        // Cafe carries a 40% margin, Azucar runs at cost; revenue-share
        // spreads cost evenly over revenue while per-unit charges each
        // outlet for what it actually sold.
        let records = vec![
            record("Cafe", 100.0, 60.0, &[("Centro", 10.0), ("Norte", 0.0)]),
            record("Azucar", 50.0, 50.0, &[("Centro", 0.0), ("Norte", 10.0)]),
        ];

        let share = compute_outlet_totals(&records, &outlets(), AllocationStrategy::RevenueShare);
        let unit = compute_outlet_totals(&records, &outlets(), AllocationStrategy::PerUnitCost);

        assert!((share[0].allocated_cost - 100.0 / 150.0 * 110.0).abs() < 1e-9);
        assert!((unit[0].allocated_cost - 60.0).abs() < 1e-9);
        assert!((share[0].allocated_cost - unit[0].allocated_cost).abs() > 1.0);
    }

    #[test]
    fn unattributed_revenue_triggers_reconciliation_warning() {
        // Azucar has revenue but no outlet recorded any units of it.
        let records = vec![
            record("Cafe", 100.0, 60.0, &[("Centro", 10.0)]),
            record("Azucar", 50.0, 30.0, &[]),
        ];
        let totals = compute_aggregate_totals(&records);
        let per_outlet =
            compute_outlet_totals(&records, &outlets(), AllocationStrategy::RevenueShare);

        let warning = reconcile(&per_outlet, &totals).expect("should flag missing revenue");
        assert!((warning.difference() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn zero_margin_outlet_reports_zero_not_nan() {
        let records = vec![record("Cafe", 100.0, 60.0, &[("Centro", 10.0)])];
        let per_outlet =
            compute_outlet_totals(&records, &outlets(), AllocationStrategy::RevenueShare);
        let norte = &per_outlet[1];
        assert_eq!(norte.sales, 0.0);
        assert_eq!(norte.margin_percent, 0.0);
        assert!(!norte.margin_percent.is_nan());
    }

    #[test]
    fn top_n_groups_sums_and_orders_descending() {
        let records = vec![
            record("Cafe", 40.0, 10.0, &[]),
            record("Azucar", 100.0, 10.0, &[]),
            record("Cafe", 70.0, 10.0, &[]),
            record("Jabon", 5.0, 1.0, &[]),
        ];
        let top = compute_top_n(&records, Metric::NetTotal, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Cafe");
        assert!((top[0].value - 110.0).abs() < 1e-9);
        assert_eq!(top[1].name, "Azucar");
    }

    #[test]
    fn top_n_ties_keep_first_encountered_order() {
        let records = vec![
            record("Azucar", 50.0, 10.0, &[]),
            record("Cafe", 50.0, 10.0, &[]),
            record("Jabon", 50.0, 10.0, &[]),
        ];
        let top = compute_top_n(&records, Metric::NetTotal, 3);
        let names: Vec<&str> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Azucar", "Cafe", "Jabon"]);
    }

    #[test]
    fn top_n_profit_metric_is_recomputed_from_sales_and_cost() {
        let records = vec![
            record("Cafe", 100.0, 60.0, &[]),
            record("Azucar", 80.0, 20.0, &[]),
        ];
        let top = compute_top_n(&records, Metric::Profit, 5);
        assert_eq!(top[0].name, "Azucar");
        assert!((top[0].value - 60.0).abs() < 1e-9);
        assert!((top[1].value - 40.0).abs() < 1e-9);
    }
}
