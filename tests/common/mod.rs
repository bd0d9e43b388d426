//! Synthetic weekly fixtures shared by the integration tests.
#![allow(dead_code)]

use demand_replenishment::SeriesPoint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use std::path::Path;

/// Every week sells the same amount.
pub fn generate_constant_demand(weeks: usize, value: f64) -> Vec<f64> {
    vec![value; weeks]
}

/// Weekly demand drawn from a Normal distribution, rounded to whole units and
/// clamped at zero. Seeded so fixtures are reproducible.
pub fn generate_normal_demand(weeks: usize, mean: f64, std_dev: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean, std_dev).unwrap();
    (0..weeks)
        .map(|_| normal.sample(&mut rng).round().max(0.0))
        .collect()
}

fn lag(units: &[f64], i: usize, k: usize) -> Option<f64> {
    i.checked_sub(k).map(|j| units[j])
}

fn rolling_mean(units: &[f64], i: usize, window: usize) -> Option<f64> {
    // Mean of the `window` weeks before week i.
    if i < window {
        return None;
    }
    Some(units[i - window..i].iter().sum::<f64>() / window as f64)
}

/// Feature rows for one SKU-location, one per entry of `units`, starting at
/// ISO week 1 of `start_year` with 52 weeks per year.
pub fn build_points(store: &str, product: &str, start_year: u32, units: &[f64]) -> Vec<SeriesPoint> {
    (0..units.len())
        .map(|i| {
            let week = (i % 52) as u32 + 1;
            let angle = 2.0 * PI * week as f64 / 52.0;
            SeriesPoint {
                store_id: store.to_string(),
                product_id: product.to_string(),
                year: start_year + (i / 52) as u32,
                week,
                units_sold: units[i],
                is_holiday: if week == 52 { 1.0 } else { 0.0 },
                price: 12.5,
                lag_1: lag(units, i, 1),
                lag_2: lag(units, i, 2),
                lag_4: lag(units, i, 4),
                lag_52: lag(units, i, 52),
                rollmean_4: rolling_mean(units, i, 4),
                rollmean_8: rolling_mean(units, i, 8),
                rollmean_12: rolling_mean(units, i, 12),
                sin_woy: angle.sin(),
                cos_woy: angle.cos(),
            }
        })
        .collect()
}

/// Writes rows in the feature-table CSV layout.
pub fn write_features(path: &Path, points: &[SeriesPoint]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut wtr = csv::Writer::from_path(path).unwrap();
    for point in points {
        wtr.serialize(point).unwrap();
    }
    wtr.flush().unwrap();
}
