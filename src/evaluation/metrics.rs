// src/evaluation/metrics.rs

//! Accuracy metrics for forecast evaluation.

use crate::error::{PlannerError, Result};

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() {
        return Err(PlannerError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    Ok(())
}

fn abs_errors<'a>(actual: &'a [f64], predicted: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
}

/// Weighted Absolute Percentage Error.
///
/// WAPE = sum(|actual - predicted|) / sum(|actual|)
///
/// Returns 0 when the actuals sum to zero: there is nothing to over- or
/// under-forecast.
pub fn wape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let denom: f64 = actual.iter().map(|a| a.abs()).sum();
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok(abs_errors(actual, predicted).sum::<f64>() / denom)
}

/// Mean Absolute Scaled Error against an in-sample naive benchmark.
///
/// MASE = mean(|actual - predicted|) / mean(|insample[t] - insample[t - m]|)
///
/// # Arguments
/// * `insample` - Reference history for the naive scaling term
/// * `period` - Seasonal lag `m` of the naive benchmark (1 for non-seasonal)
///
/// Falls back to [`wape`] when `insample` has `period` or fewer points, and
/// returns 0 when the naive in-sample error is exactly zero.
pub fn mase(actual: &[f64], predicted: &[f64], insample: &[f64], period: usize) -> Result<f64> {
    check_lengths(actual, predicted)?;
    if period == 0 {
        return Err(PlannerError::InvalidParameter(
            "seasonal period must be at least 1".to_string(),
        ));
    }

    if insample.len() <= period {
        return wape(actual, predicted);
    }

    let naive_err = insample
        .iter()
        .skip(period)
        .zip(insample.iter())
        .map(|(curr, prev)| (curr - prev).abs())
        .sum::<f64>()
        / (insample.len() - period) as f64;

    if naive_err == 0.0 {
        return Ok(0.0);
    }
    if actual.is_empty() {
        return Ok(0.0);
    }

    let forecast_mae = abs_errors(actual, predicted).sum::<f64>() / actual.len() as f64;
    Ok(forecast_mae / naive_err)
}
