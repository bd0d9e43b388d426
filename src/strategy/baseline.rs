// src/strategy/baseline.rs

use crate::model::inventory::DemandStats;
use crate::model::series::{SeriesPoint, SkuLocationSeries};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Number of trailing horizon steps that get the late-horizon lift in the
/// global fallback.
const LATE_HORIZON_STEPS: usize = 2;

/// Fraction of the global std added to those trailing steps.
const LATE_HORIZON_LIFT: f64 = 0.5;

/// The forecasting methods scored by an evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ForecastMethod {
    Naive,
    SeasonalNaive,
    Model,
}

impl ForecastMethod {
    /// Column name of this method's predictions in the evaluation artifacts.
    pub fn column(self) -> &'static str {
        match self {
            ForecastMethod::Naive => "y_pred_naive",
            ForecastMethod::SeasonalNaive => "y_pred_seasonal",
            ForecastMethod::Model => "y_pred_model",
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Baseline forecasts for one SKU-location over a horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineForecast {
    pub naive: Vec<f64>,
    /// `None` when no 52-week lag is available.
    pub seasonal: Option<Vec<f64>>,
}

impl BaselineForecast {
    /// Seasonal naive when available, naive otherwise.
    pub fn preferred(self) -> Vec<f64> {
        self.seasonal.unwrap_or(self.naive)
    }
}

fn clip(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Naive, seasonal-naive and global-mean forecasts.
#[derive(Debug, Clone, Copy)]
pub struct BaselineForecaster {
    stats: DemandStats,
}

impl BaselineForecaster {
    pub fn new(stats: DemandStats) -> Self {
        Self { stats }
    }

    /// Constant forecast at the global mean, with the last two steps lifted by
    /// half a standard deviation. Used when a pair has no history.
    pub fn global_naive(&self, horizon: usize) -> Vec<f64> {
        let DemandStats { mean, std } = self.stats;
        let mut forecast = vec![mean; horizon];
        if horizon >= LATE_HORIZON_STEPS {
            for value in &mut forecast[horizon - LATE_HORIZON_STEPS..] {
                *value = mean + LATE_HORIZON_LIFT * std;
            }
        }
        forecast.into_iter().map(clip).collect()
    }

    /// Last observed `units_sold` repeated over the horizon.
    pub fn naive(series: &SkuLocationSeries, horizon: usize) -> Option<Vec<f64>> {
        series
            .last()
            .map(|last| vec![clip(last.units_sold); horizon])
    }

    /// The latest row's 52-week lag repeated over the horizon.
    pub fn seasonal_naive(series: &SkuLocationSeries, horizon: usize) -> Option<Vec<f64>> {
        series
            .last()
            .and_then(|last| last.lag_52)
            .filter(|v| !v.is_nan())
            .map(|v| vec![clip(v); horizon])
    }

    /// Both history-based baselines, or the global fallback when the pair has
    /// no rows at all.
    pub fn from_history(
        &self,
        series: Option<&SkuLocationSeries>,
        horizon: usize,
    ) -> BaselineForecast {
        match series.and_then(|s| Self::naive(s, horizon).map(|naive| (s, naive))) {
            Some((s, naive)) => BaselineForecast {
                naive,
                seasonal: Self::seasonal_naive(s, horizon),
            },
            None => {
                debug!(horizon, "no history for pair, using global naive");
                BaselineForecast {
                    naive: self.global_naive(horizon),
                    seasonal: None,
                }
            }
        }
    }

    /// Row-level naive prediction: lag 1, else lag 52, else the global mean.
    pub fn row_naive(&self, point: &SeriesPoint) -> f64 {
        present(point.lag_1)
            .or_else(|| present(point.lag_52))
            .unwrap_or(self.stats.mean)
    }

    /// Row-level seasonal prediction: lag 52, else lag 1, else the global mean.
    pub fn row_seasonal(&self, point: &SeriesPoint) -> f64 {
        present(point.lag_52)
            .or_else(|| present(point.lag_1))
            .unwrap_or(self.stats.mean)
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}
