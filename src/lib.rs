//! Weekly demand forecasting and budget-capped replenishment planning.
//!
//! The crate splits a weekly feature table by time, produces naive,
//! seasonal-naive and global-mean forecasts (or defers to a pluggable
//! [`strategy::traits::Predictor`]), scores them with WAPE and MASE, and turns
//! next-period forecasts plus stock positions into integer orders under a
//! pooled spend cap.

pub mod error;
pub mod evaluation;
pub mod io;
pub mod model;
pub mod strategy;

pub use error::{PlannerError, Result};
pub use evaluation::config::PlannerConfig;
pub use evaluation::context::RunContext;
pub use evaluation::engine::{EvaluationOrchestrator, EvaluationReport};
pub use model::series::{FeatureTable, FeatureVector, SeriesPoint, SkuLocation};
pub use strategy::replenishment::{ReplenishmentOptimizer, ReplenishmentPlan};
pub use strategy::traits::Predictor;
