// src/strategy/traits.rs

use crate::model::series::FeatureVector;

/// A fitted regression model seen only through its prediction contract.
///
/// The core calls `predict` once per forecast step and clips the result to
/// zero; it never feeds predictions back into the features. Any
/// `Fn(&FeatureVector) -> f64` closure is a predictor.
///
/// We require `Send` + `Sync` so a loaded model can back concurrent requests.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> f64;
}

impl<F> Predictor for F
where
    F: Fn(&FeatureVector) -> f64 + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> f64 {
        self(features)
    }
}

/// Runs `predictor` and clips the output at zero. `NaN` maps to zero too.
pub(crate) fn predict_non_negative(predictor: &dyn Predictor, features: &FeatureVector) -> f64 {
    let y = predictor.predict(features);
    if y > 0.0 {
        y
    } else {
        0.0
    }
}
