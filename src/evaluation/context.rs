// src/evaluation/context.rs

use crate::error::Result;
use crate::evaluation::config::PlannerConfig;
use crate::io::features::load_feature_table;
use crate::io::stats::load_stats;
use crate::model::inventory::DemandStats;
use crate::model::series::{FeatureTable, SkuLocation};
use crate::strategy::inference::{forecast_batch, ForecastResult};
use crate::strategy::traits::Predictor;
use std::fmt;
use tracing::info;

/// Everything one run reads: the feature table, global stats and an optional
/// fitted predictor. Owned by the caller for the duration of the run; nothing
/// is cached across runs.
pub struct RunContext {
    pub features: Option<FeatureTable>,
    pub stats: DemandStats,
    predictor: Option<Box<dyn Predictor>>,
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("rows", &self.features.as_ref().map(FeatureTable::row_count))
            .field("stats", &self.stats)
            .field("predictor", &self.predictor.is_some())
            .finish()
    }
}

impl RunContext {
    pub fn new(features: Option<FeatureTable>, stats: DemandStats) -> Self {
        Self {
            features,
            stats,
            predictor: None,
        }
    }

    pub fn with_predictor<P: Predictor + 'static>(mut self, predictor: P) -> Self {
        self.predictor = Some(Box::new(predictor));
        self
    }

    pub fn predictor(&self) -> Option<&dyn Predictor> {
        self.predictor.as_deref()
    }

    /// Context for a backtest. The feature table is required; stats come
    /// from the artifact, else from the table's own `units_sold`, else the
    /// configured defaults.
    pub fn for_evaluation(config: &PlannerConfig) -> Result<Self> {
        let features = load_feature_table(&config.features_path())?;
        let stats = match load_stats(&config.stats_path())? {
            Some(stats) => stats,
            None => {
                let derived =
                    DemandStats::from_units(&features.units()).unwrap_or(config.default_stats);
                info!(
                    mean = derived.mean,
                    std = derived.std,
                    "no stats artifact, derived stats from feature table"
                );
                derived
            }
        };
        Ok(Self::new(Some(features), stats))
    }

    /// Context for online forecasting. A missing feature table only means
    /// every pair gets the global fallback.
    pub fn for_inference(config: &PlannerConfig) -> Result<Self> {
        let path = config.features_path();
        let features = if path.exists() {
            Some(load_feature_table(&path)?)
        } else {
            info!(path = %path.display(), "no feature table, forecasts use global stats only");
            None
        };
        let stats = match load_stats(&config.stats_path())? {
            Some(stats) => stats,
            None => {
                info!("no stats artifact, using configured defaults");
                config.default_stats
            }
        };
        Ok(Self::new(features, stats))
    }

    pub fn forecast(&self, pairs: &[SkuLocation], horizon: usize) -> Result<ForecastResult> {
        forecast_batch(
            self.features.as_ref(),
            self.stats,
            self.predictor(),
            pairs,
            horizon,
        )
    }
}
