// src/model/series.rs

use crate::error::{PlannerError, Result};
use crate::model::time_key::TimeKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Names of the predictor inputs, in [`FeatureVector`] order.
pub const FEATURE_NAMES: [&str; 11] = [
    "is_holiday",
    "price",
    "lag_1",
    "lag_2",
    "lag_4",
    "lag_52",
    "rollmean_4",
    "rollmean_8",
    "rollmean_12",
    "sin_woy",
    "cos_woy",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// A (store, product) pair: the unit of forecasting and replenishment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkuLocation {
    pub store_id: String,
    pub product_id: String,
}

impl SkuLocation {
    pub fn new(store_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            product_id: product_id.into(),
        }
    }
}

impl fmt::Display for SkuLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.store_id, self.product_id)
    }
}

/// Fixed-width predictor input. Missing lag/rolling values are `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
    }
}

/// One weekly observation of a SKU-location, as emitted by the feature ETL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub store_id: String,
    pub product_id: String,
    pub year: u32,
    pub week: u32,
    pub units_sold: f64,
    pub is_holiday: f64,
    pub price: f64,
    #[serde(default)]
    pub lag_1: Option<f64>,
    #[serde(default)]
    pub lag_2: Option<f64>,
    #[serde(default)]
    pub lag_4: Option<f64>,
    #[serde(default)]
    pub lag_52: Option<f64>,
    #[serde(default)]
    pub rollmean_4: Option<f64>,
    #[serde(default)]
    pub rollmean_8: Option<f64>,
    #[serde(default)]
    pub rollmean_12: Option<f64>,
    pub sin_woy: f64,
    pub cos_woy: f64,
}

impl SeriesPoint {
    pub fn time_key(&self) -> TimeKey {
        TimeKey::encode(self.year, self.week)
    }

    pub fn sku_location(&self) -> SkuLocation {
        SkuLocation::new(self.store_id.clone(), self.product_id.clone())
    }

    pub fn features(&self) -> FeatureVector {
        let or_nan = |v: Option<f64>| v.unwrap_or(f64::NAN);
        FeatureVector([
            self.is_holiday,
            self.price,
            or_nan(self.lag_1),
            or_nan(self.lag_2),
            or_nan(self.lag_4),
            or_nan(self.lag_52),
            or_nan(self.rollmean_4),
            or_nan(self.rollmean_8),
            or_nan(self.rollmean_12),
            self.sin_woy,
            self.cos_woy,
        ])
    }
}

/// Time-ordered history of one SKU-location. Immutable once built.
#[derive(Debug, Clone)]
pub struct SkuLocationSeries {
    key: SkuLocation,
    points: Vec<SeriesPoint>,
}

impl SkuLocationSeries {
    /// Sorts `points` by time key and rejects repeated weeks.
    pub fn new(key: SkuLocation, mut points: Vec<SeriesPoint>) -> Result<Self> {
        for point in &points {
            TimeKey::from_year_week(point.year, point.week)?;
        }
        points.sort_by_key(|p| p.time_key());
        if let Some(pair) = points.windows(2).find(|w| w[0].time_key() == w[1].time_key()) {
            return Err(PlannerError::DuplicateObservation {
                store_id: key.store_id.clone(),
                product_id: key.product_id.clone(),
                time_key: pair[1].time_key().value(),
            });
        }
        Ok(Self { key, points })
    }

    pub fn key(&self) -> &SkuLocation {
        &self.key
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Actuals strictly before `cutoff`, oldest first.
    pub fn units_before(&self, cutoff: TimeKey) -> Vec<f64> {
        self.points
            .iter()
            .take_while(|p| p.time_key() < cutoff)
            .map(|p| p.units_sold)
            .collect()
    }
}

/// The weekly feature table, grouped by SKU-location.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    series: BTreeMap<SkuLocation, SkuLocationSeries>,
}

impl FeatureTable {
    pub fn from_points(points: Vec<SeriesPoint>) -> Result<Self> {
        let mut grouped: BTreeMap<SkuLocation, Vec<SeriesPoint>> = BTreeMap::new();
        for point in points {
            grouped.entry(point.sku_location()).or_default().push(point);
        }

        let mut series = BTreeMap::new();
        for (key, points) in grouped {
            let s = SkuLocationSeries::new(key.clone(), points)?;
            series.insert(key, s);
        }
        Ok(Self { series })
    }

    pub fn series(&self, key: &SkuLocation) -> Option<&SkuLocationSeries> {
        self.series.get(key)
    }

    /// All series, ordered by (store_id, product_id).
    pub fn iter(&self) -> impl Iterator<Item = &SkuLocationSeries> {
        self.series.values()
    }

    /// Every observation, grouped by SKU-location and time-ordered within a group.
    pub fn points(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.series.values().flat_map(|s| s.points.iter())
    }

    pub fn time_keys(&self) -> impl Iterator<Item = TimeKey> + '_ {
        self.points().map(SeriesPoint::time_key)
    }

    pub fn row_count(&self) -> usize {
        self.series.values().map(SkuLocationSeries::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn units(&self) -> Vec<f64> {
        self.points().map(|p| p.units_sold).collect()
    }
}
