// src/evaluation/engine.rs

use crate::error::{PlannerError, Result};
use crate::evaluation::context::RunContext;
use crate::evaluation::metrics::{mase, wape};
use crate::model::time_key::TimeSplit;
use crate::strategy::baseline::{BaselineForecaster, ForecastMethod};
use crate::strategy::traits::predict_non_negative;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// How many of the worst pairs the summary lists.
const WORST_PAIRS: usize = 5;

/// One scored test observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    pub store_id: String,
    pub product_id: String,
    pub year: u32,
    pub week: u32,
    pub y_true: f64,
    pub y_pred_naive: f64,
    pub y_pred_seasonal: f64,
    pub y_pred_model: Option<f64>,
}

impl PredictionRow {
    pub fn prediction(&self, method: ForecastMethod) -> Option<f64> {
        match method {
            ForecastMethod::Naive => Some(self.y_pred_naive),
            ForecastMethod::SeasonalNaive => Some(self.y_pred_seasonal),
            ForecastMethod::Model => self.y_pred_model,
        }
    }
}

/// A pair and its naive WAPE, for the worst-pairs listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairScore {
    pub pair: String,
    pub naive_wape: f64,
}

/// Headline numbers of a backtest; serialized as the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub test_rows: usize,
    pub sku_locations: usize,
    /// Method column -> WAPE over every test row.
    pub global_wape: BTreeMap<String, f64>,
    /// "store|product" -> {"<method>_wape", "<method>_mase"}.
    pub per_pair: BTreeMap<String, BTreeMap<String, f64>>,
    pub worst_pairs: Vec<PairScore>,
}

#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub split: TimeSplit,
    pub methods: Vec<ForecastMethod>,
    pub rows: Vec<PredictionRow>,
    pub summary: EvaluationSummary,
}

/// Backtests the baselines, and the context's predictor if it has one, on
/// the time-based test window.
pub struct EvaluationOrchestrator<'a> {
    ctx: &'a RunContext,
    mase_period: usize,
}

impl<'a> EvaluationOrchestrator<'a> {
    pub fn new(ctx: &'a RunContext, mase_period: usize) -> Self {
        Self { ctx, mase_period }
    }

    pub fn run(&self) -> Result<EvaluationReport> {
        let table = self
            .ctx
            .features
            .as_ref()
            .ok_or_else(|| PlannerError::MissingData {
                artifact: "feature table",
                path: "run context".to_string(),
            })?;

        let split = TimeSplit::from_keys(table.time_keys());
        let first_test = split.first_test_key().ok_or_else(|| {
            PlannerError::InsufficientHistory(format!(
                "{} distinct weeks leave an empty test split",
                split.train.len() + split.val.len()
            ))
        })?;
        info!(
            train_weeks = split.train.len(),
            val_weeks = split.val.len(),
            test_weeks = split.test.len(),
            first_test = %first_test,
            "time split computed"
        );

        let baseline = BaselineForecaster::new(self.ctx.stats);
        let predictor = self.ctx.predictor();
        let mut methods = vec![ForecastMethod::Naive, ForecastMethod::SeasonalNaive];
        if predictor.is_some() {
            methods.push(ForecastMethod::Model);
        }

        let mut rows = Vec::new();
        let mut per_pair = BTreeMap::new();

        for series in table.iter() {
            let start = rows.len();
            let windows = split.partition(series.points(), |p| p.time_key());
            for point in windows.test {
                rows.push(PredictionRow {
                    store_id: point.store_id.clone(),
                    product_id: point.product_id.clone(),
                    year: point.year,
                    week: point.week,
                    y_true: point.units_sold,
                    y_pred_naive: baseline.row_naive(point),
                    y_pred_seasonal: baseline.row_seasonal(point),
                    y_pred_model: predictor.map(|p| predict_non_negative(p, &point.features())),
                });
            }

            let pair_rows = &rows[start..];
            if pair_rows.is_empty() {
                debug!(pair = %series.key(), "no test rows for pair");
                continue;
            }

            let insample = series.units_before(first_test);
            let y_true: Vec<f64> = pair_rows.iter().map(|r| r.y_true).collect();
            let mut metrics = BTreeMap::new();
            for &method in &methods {
                let y_hat = predictions(pair_rows, method);
                metrics.insert(format!("{}_wape", method), wape(&y_true, &y_hat)?);
                metrics.insert(
                    format!("{}_mase", method),
                    mase(&y_true, &y_hat, &insample, self.mase_period)?,
                );
            }
            per_pair.insert(series.key().to_string(), metrics);
        }

        let y_true: Vec<f64> = rows.iter().map(|r| r.y_true).collect();
        let mut global_wape = BTreeMap::new();
        for &method in &methods {
            global_wape.insert(
                method.to_string(),
                wape(&y_true, &predictions(&rows, method))?,
            );
        }

        let summary = EvaluationSummary {
            test_rows: rows.len(),
            sku_locations: per_pair.len(),
            worst_pairs: worst_by_naive_wape(&per_pair),
            global_wape,
            per_pair,
        };
        info!(
            test_rows = summary.test_rows,
            sku_locations = summary.sku_locations,
            "evaluation complete"
        );

        Ok(EvaluationReport {
            split,
            methods,
            rows,
            summary,
        })
    }
}

fn predictions(rows: &[PredictionRow], method: ForecastMethod) -> Vec<f64> {
    rows.iter()
        .map(|r| r.prediction(method).unwrap_or(0.0))
        .collect()
}

fn worst_by_naive_wape(per_pair: &BTreeMap<String, BTreeMap<String, f64>>) -> Vec<PairScore> {
    let key = format!("{}_wape", ForecastMethod::Naive);
    let mut scores: Vec<PairScore> = per_pair
        .iter()
        .filter_map(|(pair, metrics)| {
            metrics.get(&key).map(|&naive_wape| PairScore {
                pair: pair.clone(),
                naive_wape,
            })
        })
        .collect();
    // Stable sort keeps pair order among ties.
    scores.sort_by(|a, b| b.naive_wape.total_cmp(&a.naive_wape));
    scores.truncate(WORST_PAIRS);
    scores
}
