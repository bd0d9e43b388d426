//! Property-based tests for splitting, baselines, metrics and planning.

mod common;

use common::build_points;
use demand_replenishment::evaluation::metrics::{mase, wape};
use demand_replenishment::model::inventory::DemandStats;
use demand_replenishment::model::series::SkuLocationSeries;
use demand_replenishment::model::time_key::TimeSplit;
use demand_replenishment::strategy::baseline::BaselineForecaster;
use demand_replenishment::strategy::replenishment::PlanningRow;
use demand_replenishment::{PlannerConfig, ReplenishmentOptimizer, SkuLocation};
use proptest::prelude::*;

/// Strategy for generating non-negative weekly demand.
fn demand_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..500.0_f64, min_len..max_len)
}

fn planning_rows(values: &[(f64, f64, f64, f64)]) -> Vec<PlanningRow> {
    values
        .iter()
        .enumerate()
        .map(|(i, &(forecast, std, on_hand, on_order))| PlanningRow {
            store_id: format!("S{:03}", i),
            product_id: "P001".to_string(),
            forecast_next: Some(forecast),
            demand_std: Some(std),
            on_hand,
            on_order,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn global_naive_shape(horizon in 1usize..40, mean in 0.0..100.0_f64, std in 0.0..50.0_f64) {
        let forecast = BaselineForecaster::new(DemandStats { mean, std }).global_naive(horizon);
        prop_assert_eq!(forecast.len(), horizon);
        prop_assert!(forecast.iter().all(|v| *v >= 0.0));
        if horizon >= 2 {
            prop_assert!(forecast[..horizon - 2].iter().all(|v| *v == mean));
        }
    }

    #[test]
    fn naive_repeats_last_value(units in demand_strategy(1, 80), horizon in 1usize..20) {
        let points = build_points("S001", "P001", 2022, &units);
        let series = SkuLocationSeries::new(SkuLocation::new("S001", "P001"), points).unwrap();
        let forecast = BaselineForecaster::naive(&series, horizon).unwrap();
        let last = *units.last().unwrap();
        prop_assert_eq!(forecast, vec![last.max(0.0); horizon]);
    }

    #[test]
    fn wape_of_perfect_forecast_is_zero(actual in demand_strategy(1, 50)) {
        prop_assert_eq!(wape(&actual, &actual).unwrap(), 0.0);
    }

    #[test]
    fn wape_is_scale_invariant(
        pairs in prop::collection::vec((1.0..500.0_f64, 0.0..500.0_f64), 1..40),
        scale in 0.01..100.0_f64,
    ) {
        let actual: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let predicted: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let scaled_actual: Vec<f64> = actual.iter().map(|v| v * scale).collect();
        let scaled_predicted: Vec<f64> = predicted.iter().map(|v| v * scale).collect();
        let base = wape(&actual, &predicted).unwrap();
        let scaled = wape(&scaled_actual, &scaled_predicted).unwrap();
        prop_assert!((base - scaled).abs() <= 1e-9 * base.max(1.0));
    }

    #[test]
    fn mase_falls_back_to_wape_on_short_insample(
        pairs in prop::collection::vec((0.0..500.0_f64, 0.0..500.0_f64), 1..20),
        period in 1usize..8,
        insample_len in 0usize..8,
    ) {
        prop_assume!(insample_len <= period);
        let actual: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let predicted: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let insample = vec![3.0; insample_len];
        prop_assert_eq!(
            mase(&actual, &predicted, &insample, period).unwrap(),
            wape(&actual, &predicted).unwrap()
        );
    }

    #[test]
    fn long_histories_hold_out_four_and_four(n in 12usize..300) {
        let units = vec![1.0; n];
        let points = build_points("S001", "P001", 2015, &units);
        let split = TimeSplit::from_keys(points.iter().map(|p| p.time_key()));
        prop_assert_eq!(split.test.len(), 4);
        prop_assert_eq!(split.val.len(), 4);
        prop_assert_eq!(split.train.len() + split.val.len() + split.test.len(), n);
        prop_assert!(split.train.last() < split.val.first());
        prop_assert!(split.val.last() < split.test.first());
    }

    #[test]
    fn short_histories_partition_every_key(n in 0usize..12) {
        let units = vec![1.0; n];
        let points = build_points("S001", "P001", 2020, &units);
        let split = TimeSplit::from_keys(points.iter().map(|p| p.time_key()));
        prop_assert_eq!(split.train.len() + split.val.len() + split.test.len(), n);
        if n > 0 {
            prop_assert!(!split.train.is_empty());
        }
    }

    #[test]
    fn unlimited_capacity_orders_floor_of_need(
        values in prop::collection::vec(
            (0.0..200.0_f64, 0.0..20.0_f64, 0.0..100.0_f64, 0.0..50.0_f64),
            1..25,
        ),
        target in 0.5..1.0_f64,
    ) {
        let rows = planning_rows(&values);
        let optimizer = ReplenishmentOptimizer::from_config(&PlannerConfig::default());
        let need = optimizer.needs(&rows, target);
        let plan = optimizer.plan(&rows, target, f64::INFINITY).unwrap();
        prop_assert!(plan.feasible);
        for (line, n) in plan.lines.iter().zip(&need) {
            prop_assert_eq!(line.order_qty, n.floor() as u64);
            prop_assert_eq!(line.cost, line.order_qty as f64 * 50.0);
        }
    }

    #[test]
    fn zero_capacity_with_any_need_falls_back(
        values in prop::collection::vec(
            (1.0..200.0_f64, 0.0..20.0_f64, 0.0..0.5_f64, 0.0..0.5_f64),
            1..25,
        ),
    ) {
        let rows = planning_rows(&values);
        let optimizer = ReplenishmentOptimizer::from_config(&PlannerConfig::default());
        let need = optimizer.needs(&rows, 0.95);
        let plan = optimizer.plan(&rows, 0.95, 0.0).unwrap();
        prop_assert!(!plan.feasible);
        for (line, n) in plan.lines.iter().zip(&need) {
            prop_assert_eq!(line.order_qty, n.floor() as u64);
        }
    }
}
