// src/model/inventory.rs

use crate::model::series::SkuLocation;
use serde::{Deserialize, Serialize};

/// Global demand statistics, the deepest forecasting fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandStats {
    pub mean: f64,
    pub std: f64,
}

impl DemandStats {
    /// Mean and sample standard deviation of `units`.
    ///
    /// Returns `None` for an empty slice. A single observation has zero spread.
    pub fn from_units(units: &[f64]) -> Option<Self> {
        if units.is_empty() {
            return None;
        }
        let n = units.len() as f64;
        let mean = units.iter().sum::<f64>() / n;
        let std = if units.len() < 2 {
            0.0
        } else {
            let ss: f64 = units.iter().map(|u| (u - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        };
        Some(Self { mean, std })
    }
}

/// Stock position of one SKU-location at planning time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryState {
    pub store_id: String,
    pub product_id: String,
    pub on_hand: f64,
    pub on_order: f64,
    #[serde(default)]
    pub demand_std: Option<f64>,
}

impl InventoryState {
    pub fn sku_location(&self) -> SkuLocation {
        SkuLocation::new(self.store_id.clone(), self.product_id.clone())
    }
}

/// Next-period point forecast for one SKU-location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastNext {
    pub store_id: String,
    pub product_id: String,
    pub forecast_next: f64,
}
