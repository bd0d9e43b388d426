// src/strategy/inference.rs

use crate::error::{PlannerError, Result};
use crate::model::inventory::{DemandStats, ForecastNext};
use crate::model::series::{FeatureTable, SkuLocation};
use crate::strategy::baseline::BaselineForecaster;
use crate::strategy::traits::{predict_non_negative, Predictor};
use serde::Serialize;
use tracing::{debug, info};

/// Forecast for one requested pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairForecast {
    pub store_id: String,
    pub product_id: String,
    pub forecast: Vec<f64>,
}

/// Forecasts for a batch of pairs, in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub horizon_weeks: usize,
    pub forecasts: Vec<PairForecast>,
}

impl ForecastResult {
    pub fn get(&self, key: &SkuLocation) -> Option<&[f64]> {
        self.forecasts
            .iter()
            .find(|f| f.store_id == key.store_id && f.product_id == key.product_id)
            .map(|f| f.forecast.as_slice())
    }

    /// First step of every forecast, in the shape the optimizer joins on.
    pub fn next_period(&self) -> Vec<ForecastNext> {
        self.forecasts
            .iter()
            .filter_map(|f| {
                f.forecast.first().map(|&v| ForecastNext {
                    store_id: f.store_id.clone(),
                    product_id: f.product_id.clone(),
                    forecast_next: v,
                })
            })
            .collect()
    }
}

/// Forecasts `horizon` weeks for each pair.
///
/// With a predictor, a pair with history gets the predictor's output on its
/// latest feature row, once per step. Without one, the baseline order is
/// seasonal naive, then naive. A pair with no history always gets the global
/// naive forecast.
pub fn forecast_batch(
    features: Option<&FeatureTable>,
    stats: DemandStats,
    predictor: Option<&dyn Predictor>,
    pairs: &[SkuLocation],
    horizon: usize,
) -> Result<ForecastResult> {
    if horizon == 0 {
        return Err(PlannerError::InvalidParameter(
            "horizon must be at least one week".to_string(),
        ));
    }

    let baseline = BaselineForecaster::new(stats);
    let forecasts = pairs
        .iter()
        .map(|pair| {
            let series = features.and_then(|table| table.series(pair));
            let latest = series.and_then(|s| s.last());

            let forecast = match (predictor, latest) {
                (Some(model), Some(row)) => {
                    let x = row.features();
                    (0..horizon).map(|_| predict_non_negative(model, &x)).collect()
                }
                (Some(_), None) => {
                    debug!(pair = %pair, "no history for pair, using global naive");
                    baseline.global_naive(horizon)
                }
                (None, _) => baseline.from_history(series, horizon).preferred(),
            };

            PairForecast {
                store_id: pair.store_id.clone(),
                product_id: pair.product_id.clone(),
                forecast,
            }
        })
        .collect::<Vec<_>>();

    info!(
        pairs = forecasts.len(),
        horizon,
        with_model = predictor.is_some(),
        "forecast batch complete"
    );
    Ok(ForecastResult {
        horizon_weeks: horizon,
        forecasts,
    })
}
