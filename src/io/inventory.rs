// src/io/inventory.rs

use crate::error::Result;
use crate::io::{open_required, read_records};
use crate::model::inventory::{ForecastNext, InventoryState};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Loads the latest inventory snapshot
/// (store_id, product_id, on_hand, on_order, demand_std).
pub fn load_inventory(path: &Path) -> Result<Vec<InventoryState>> {
    let file = open_required(path, "inventory snapshot")?;
    let rows: Vec<InventoryState> = read_records(file)?;
    info!(path = %path.display(), rows = rows.len(), "loaded inventory snapshot");
    Ok(rows)
}

/// Loads next-period forecasts (store_id, product_id, forecast_next) if the
/// table exists.
pub fn load_forecasts(path: &Path) -> Result<Option<Vec<ForecastNext>>> {
    if !path.exists() {
        return Ok(None);
    }
    let rows: Vec<ForecastNext> = read_records(File::open(path)?)?;
    info!(path = %path.display(), rows = rows.len(), "loaded forecast table");
    Ok(Some(rows))
}
