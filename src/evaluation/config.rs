// src/evaluation/config.rs

use crate::model::inventory::DemandStats;
use crate::strategy::optimization::ServiceLevelLookup;
use std::path::PathBuf;

/// Knobs shared by the evaluation, inference and replenishment paths.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Directory holding the processed ETL tables and run outputs.
    pub data_dir: PathBuf,
    /// Directory holding the read-only model/stats artifacts.
    pub artifacts_dir: PathBuf,
    /// Global demand statistics used when no stats artifact exists.
    pub default_stats: DemandStats,
    /// Forecast used for inventory rows that have no forecast.
    pub forecast_fill: f64,
    /// Demand volatility used for inventory rows that have none.
    pub demand_std_fill: f64,
    pub unit_price: f64,
    pub target_service: f64,
    pub capacity: f64,
    /// Seasonal period of the naive scaling term in MASE.
    pub mase_period: usize,
    pub service_lookup: ServiceLevelLookup,
    pub horizon: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/processed"),
            artifacts_dir: PathBuf::from("models/artifacts"),
            default_stats: DemandStats {
                mean: 5.0,
                std: 2.0,
            },
            forecast_fill: 5.0,
            demand_std_fill: 2.0,
            unit_price: 50.0,
            target_service: 0.95,
            capacity: 50_000.0,
            mase_period: 1,
            service_lookup: ServiceLevelLookup::TwoTier,
            horizon: 8,
        }
    }
}

impl PlannerConfig {
    pub fn features_path(&self) -> PathBuf {
        self.data_dir.join("weekly_features.csv")
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.data_dir.join("inventory_latest.csv")
    }

    pub fn forecast_baseline_path(&self) -> PathBuf {
        self.data_dir.join("forecast_baseline.csv")
    }

    pub fn predictions_path(&self) -> PathBuf {
        self.data_dir.join("predictions.csv")
    }

    pub fn report_path(&self) -> PathBuf {
        self.data_dir.join("evaluation_report.json")
    }

    pub fn plan_path(&self) -> PathBuf {
        self.data_dir.join("replenishment_plan.csv")
    }

    pub fn stats_path(&self) -> PathBuf {
        self.artifacts_dir.join("demand_stats.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_follow_data_layout() {
        let config = PlannerConfig::default();
        assert_eq!(
            config.features_path(),
            PathBuf::from("data/processed/weekly_features.csv")
        );
        assert_eq!(
            config.stats_path(),
            PathBuf::from("models/artifacts/demand_stats.json")
        );
        assert_eq!(config.service_lookup, ServiceLevelLookup::TwoTier);
    }
}
