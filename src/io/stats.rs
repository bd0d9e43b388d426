// src/io/stats.rs

use crate::error::Result;
use crate::model::inventory::DemandStats;
use std::fs;
use std::path::Path;

/// Reads the `{ "mean": .., "std": .. }` stats artifact, if present.
pub fn load_stats(path: &Path) -> Result<Option<DemandStats>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&text)?))
}
