use crate::error::MissingColumnError;
use crate::model::{OrderLine, ProductRecord};
use std::collections::HashMap;

// `units_sold` figures cover a fixed trailing window; the projection scales
// them down to a daily rate before extrapolating.
pub const REPORTING_WINDOW_DAYS: f64 = 30.0;
pub const MAX_PROJECTION_DAYS: u32 = 30;

pub fn compute_order_lines(
    records: &[ProductRecord],
    outlet: &str,
    days: u32,
    overrides: &HashMap<String, f64>,
) -> Result<Vec<OrderLine>, MissingColumnError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    // Column presence is uniform across the record set: the loader fills an
    // entry for every record when it finds the outlet's column.
    if !records.iter().any(|r| r.units_sold.contains_key(outlet)) {
        return Err(MissingColumnError {
            column: format!("{} vendido", outlet.to_lowercase()),
        });
    }
    if !records.iter().any(|r| r.inventory_on_hand.contains_key(outlet)) {
        return Err(MissingColumnError {
            column: format!("{} inventario", outlet.to_lowercase()),
        });
    }

    let days = days.clamp(1, MAX_PROJECTION_DAYS);

    let lines = records
        .iter()
        .map(|record| {
            let daily_rate = record.units_sold_at(outlet) / REPORTING_WINDOW_DAYS;
            // Round up: running short is worse than over-ordering.
            let projected_demand = (daily_rate * days as f64).ceil();

            let inventory_on_hand = overrides
                .get(&record.name)
                .copied()
                .unwrap_or_else(|| record.inventory_at(outlet));

            OrderLine {
                name: record.name.clone(),
                projected_demand,
                inventory_on_hand,
                units_to_order: (projected_demand - inventory_on_hand).max(0.0),
            }
        })
        .collect();

    Ok(lines)
}
