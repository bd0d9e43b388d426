// src/io/reporting.rs

use crate::error::Result;
use crate::evaluation::engine::{EvaluationSummary, PredictionRow};
use crate::strategy::replenishment::ReplenishmentPlan;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, data: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    for record in data {
        wtr.serialize(record)?;
    }
    // Flush the buffer to ensure all data is written
    wtr.flush()?;
    info!(path = %path.display(), rows = data.len(), "wrote csv");
    Ok(())
}

/// Writes the row-level evaluation table. `y_pred_model` is left blank when
/// no predictor was scored.
pub fn write_predictions(path: &Path, rows: &[PredictionRow]) -> Result<()> {
    write_csv(path, rows)
}

/// Writes the global and per-pair metrics as pretty JSON.
pub fn write_evaluation_report(path: &Path, summary: &EvaluationSummary) -> Result<()> {
    ensure_parent(path)?;
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, summary)?;
    info!(path = %path.display(), "wrote evaluation report");
    Ok(())
}

/// Writes one CSV row per plan line (store_id, product_id, order_qty, unit_price, cost).
pub fn write_plan(path: &Path, plan: &ReplenishmentPlan) -> Result<()> {
    write_csv(path, &plan.lines)
}
