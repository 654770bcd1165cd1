use serde::{Serialize, Deserialize};
use std::fs;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    /// Split total cost by each outlet's share of total revenue.
    RevenueShare,
    /// Derive a per-unit cost per product and charge outlets for units sold.
    PerUnitCost,
}

impl AllocationStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            AllocationStrategy::RevenueShare => "Revenue share",
            AllocationStrategy::PerUnitCost => "Per-unit cost",
        }
    }
}

// The outlet set is configuration, not something derived from the data:
// adding a sales point means editing config.json, nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub outlets: Vec<String>,
    pub allocation: AllocationStrategy,
    pub data_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            outlets: vec![
                "Centro".to_string(),
                "Norte".to_string(),
                "Bodega".to_string(),
            ],
            allocation: AllocationStrategy::RevenueShare,
            data_file: "ventas.xlsx".to_string(),
        }
    }
}

pub const CONFIG_PATH: &str = "config.json";

impl AppConfig {
    pub fn load(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("ignoring malformed {path}: {e}");
                    AppConfig::default()
                }
            },
            Err(_) => {
                info!("no {path} found, using default outlets");
                AppConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let cfg = AppConfig::load("no-such-config-file.json");
        assert_eq!(cfg.outlets.len(), 3);
        assert_eq!(cfg.allocation, AllocationStrategy::RevenueShare);
    }

    #[test]
    fn parses_partial_config() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{ "outlets": ["Sur"], "allocation": "per_unit_cost" }"#,
        )
        .unwrap();
        assert_eq!(cfg.outlets, vec!["Sur".to_string()]);
        assert_eq!(cfg.allocation, AllocationStrategy::PerUnitCost);
        // data_file falls back to the default
        assert_eq!(cfg.data_file, "ventas.xlsx");
    }

    #[test]
    fn strategy_round_trips() {
        let json = serde_json::to_string(&AllocationStrategy::RevenueShare).unwrap();
        assert_eq!(json, r#""revenue_share""#);
        let back: AllocationStrategy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AllocationStrategy::RevenueShare);
    }
}
