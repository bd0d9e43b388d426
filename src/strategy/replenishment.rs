// src/strategy/replenishment.rs

use crate::error::{PlannerError, Result};
use crate::evaluation::config::PlannerConfig;
use crate::model::inventory::{ForecastNext, InventoryState};
use crate::model::series::SkuLocation;
use crate::strategy::optimization::{solve_budgeted_lp, LpOutcome, ServiceLevelLookup};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// Inventory row joined with its next-period forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningRow {
    pub store_id: String,
    pub product_id: String,
    pub forecast_next: Option<f64>,
    pub demand_std: Option<f64>,
    pub on_hand: f64,
    pub on_order: f64,
}

/// Left-joins forecasts onto inventory rows. Inventory order is kept; rows
/// without a forecast carry `None`.
pub fn join_inputs(inventory: &[InventoryState], forecasts: &[ForecastNext]) -> Vec<PlanningRow> {
    let by_pair: HashMap<SkuLocation, f64> = forecasts
        .iter()
        .map(|f| {
            (
                SkuLocation::new(f.store_id.clone(), f.product_id.clone()),
                f.forecast_next,
            )
        })
        .collect();

    inventory
        .iter()
        .map(|inv| PlanningRow {
            store_id: inv.store_id.clone(),
            product_id: inv.product_id.clone(),
            forecast_next: by_pair.get(&inv.sku_location()).copied(),
            demand_std: inv.demand_std,
            on_hand: inv.on_hand,
            on_order: inv.on_order,
        })
        .collect()
}

/// One line of a replenishment plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub store_id: String,
    pub product_id: String,
    pub order_qty: u64,
    pub unit_price: f64,
    pub cost: f64,
}

/// Order quantities for one planning cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplenishmentPlan {
    pub lines: Vec<OrderLine>,
    /// `false` when the budget could not fund the need floor and the plan is
    /// the unconstrained need instead.
    pub feasible: bool,
    /// Optimal LP objective; `None` on the unconstrained fallback.
    pub objective: Option<f64>,
    pub capacity: f64,
}

impl ReplenishmentPlan {
    pub fn total_cost(&self) -> f64 {
        self.lines.iter().map(|l| l.cost).sum()
    }

    /// Saturates at `u64::MAX` rather than overflowing.
    pub fn total_units(&self) -> u64 {
        self.lines
            .iter()
            .fold(0u64, |acc, l| acc.saturating_add(l.order_qty))
    }

    pub fn over_budget(&self) -> bool {
        self.total_cost() > self.capacity
    }
}

/// Turns forecasts and stock positions into budget-capped integer orders.
#[derive(Debug, Clone)]
pub struct ReplenishmentOptimizer {
    pub unit_price: f64,
    pub forecast_fill: f64,
    pub demand_std_fill: f64,
    pub lookup: ServiceLevelLookup,
}

impl ReplenishmentOptimizer {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            unit_price: config.unit_price,
            forecast_fill: config.forecast_fill,
            demand_std_fill: config.demand_std_fill,
            lookup: config.service_lookup,
        }
    }

    /// Replenishment need per row: forecast plus safety stock, less stock on
    /// hand and on order, floored at zero.
    pub fn needs(&self, rows: &[PlanningRow], target_service: f64) -> Vec<f64> {
        let z = self.lookup.safety_factor(target_service);
        rows.iter()
            .map(|row| {
                let forecast = row.forecast_next.unwrap_or(self.forecast_fill);
                let safety = z * row.demand_std.unwrap_or(self.demand_std_fill);
                (forecast + safety - row.on_hand - row.on_order).max(0.0)
            })
            .collect()
    }

    /// Minimizes spend subject to the pooled budget, never ordering below the
    /// need of any row. If the budget cannot cover the need floor (or the
    /// solver fails) the budget is dropped and the raw need is returned with
    /// `feasible = false`.
    pub fn plan(
        &self,
        rows: &[PlanningRow],
        target_service: f64,
        capacity: f64,
    ) -> Result<ReplenishmentPlan> {
        if !(target_service > 0.0 && target_service <= 1.0) {
            return Err(PlannerError::InvalidParameter(format!(
                "target_service must be in (0, 1], got {}",
                target_service
            )));
        }
        if capacity.is_nan() || capacity < 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "capacity must be non-negative, got {}",
                capacity
            )));
        }
        if !(self.unit_price.is_finite() && self.unit_price >= 0.0) {
            return Err(PlannerError::InvalidParameter(format!(
                "unit_price must be finite and non-negative, got {}",
                self.unit_price
            )));
        }

        for row in rows {
            let inputs = [
                ("forecast_next", row.forecast_next),
                ("demand_std", row.demand_std),
                ("on_hand", Some(row.on_hand)),
                ("on_order", Some(row.on_order)),
            ];
            if let Some((field, value)) = inputs
                .iter()
                .find_map(|(field, v)| v.filter(|x| !x.is_finite()).map(|x| (field, x)))
            {
                return Err(PlannerError::InvalidParameter(format!(
                    "{} of {}|{} must be finite, got {}",
                    field, row.store_id, row.product_id, value
                )));
            }
        }

        let need = self.needs(rows, target_service);
        let prices = vec![self.unit_price; rows.len()];

        let (quantities, feasible, objective) =
            match solve_budgeted_lp(&prices, &prices, capacity, &need) {
                LpOutcome::Optimal { x, objective } => (x, true, Some(objective)),
                outcome => {
                    warn!(
                        ?outcome,
                        capacity,
                        need_cost = prices.iter().zip(&need).map(|(p, n)| p * n).sum::<f64>(),
                        "budget cannot fund the need floor, returning unconstrained need"
                    );
                    (need, false, None)
                }
            };

        let lines: Vec<OrderLine> = rows
            .iter()
            .zip(quantities)
            .map(|(row, qty)| {
                // LP noise can leave tiny negatives; floor and clamp.
                let order_qty = qty.floor().max(0.0) as u64;
                OrderLine {
                    store_id: row.store_id.clone(),
                    product_id: row.product_id.clone(),
                    order_qty,
                    unit_price: self.unit_price,
                    cost: order_qty as f64 * self.unit_price,
                }
            })
            .collect();

        let plan = ReplenishmentPlan {
            lines,
            feasible,
            objective,
            capacity,
        };
        info!(
            rows = plan.lines.len(),
            feasible,
            total_units = plan.total_units(),
            total_cost = plan.total_cost(),
            "replenishment plan computed"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn optimizer() -> ReplenishmentOptimizer {
        ReplenishmentOptimizer::from_config(&PlannerConfig::default())
    }

    fn row(forecast: Option<f64>, std: Option<f64>, on_hand: f64, on_order: f64) -> PlanningRow {
        PlanningRow {
            store_id: "S001".to_string(),
            product_id: "P001".to_string(),
            forecast_next: forecast,
            demand_std: std,
            on_hand,
            on_order,
        }
    }

    #[test]
    fn need_adds_safety_stock_and_nets_pipeline() {
        let need = optimizer().needs(&[row(Some(8.0), Some(2.0), 10.0, 0.0)], 0.95);
        assert_relative_eq!(need[0], 1.28, epsilon = 1e-9);
    }

    #[test]
    fn need_is_floored_at_zero() {
        let need = optimizer().needs(&[row(Some(8.0), Some(2.0), 30.0, 5.0)], 0.90);
        assert_eq!(need, vec![0.0]);
    }

    #[test]
    fn missing_inputs_use_fill_values() {
        // 5.0 + 1.28 * 2.0 - 1.0
        let need = optimizer().needs(&[row(None, None, 1.0, 0.0)], 0.90);
        assert_relative_eq!(need[0], 6.56, epsilon = 1e-9);
    }

    #[test]
    fn funded_plan_orders_floor_of_need() {
        let rows = vec![
            row(Some(8.0), Some(2.0), 10.0, 0.0),
            row(Some(20.0), Some(0.0), 2.0, 3.0),
        ];
        let plan = optimizer().plan(&rows, 0.95, f64::INFINITY).unwrap();
        assert!(plan.feasible);
        let qty: Vec<u64> = plan.lines.iter().map(|l| l.order_qty).collect();
        assert_eq!(qty, vec![1, 15]);
        assert_eq!(plan.lines[1].cost, 750.0);
        assert_relative_eq!(plan.objective.unwrap(), 50.0 * (1.28 + 15.0), epsilon = 1e-6);
        assert!(!plan.over_budget());
    }

    #[test]
    fn unfundable_plan_falls_back_to_need() {
        let rows = vec![
            row(Some(100.0), Some(0.0), 0.0, 0.0),
            row(Some(100.0), Some(0.0), 0.0, 0.0),
        ];
        let plan = optimizer().plan(&rows, 0.95, 6_000.0).unwrap();
        assert!(!plan.feasible);
        assert_eq!(plan.objective, None);
        assert_eq!(plan.total_units(), 200);
        assert_eq!(plan.total_cost(), 10_000.0);
        assert!(plan.over_budget());
    }

    #[test]
    fn zero_capacity_with_zero_need_is_feasible() {
        let plan = optimizer()
            .plan(&[row(Some(1.0), Some(0.0), 5.0, 0.0)], 0.95, 0.0)
            .unwrap();
        assert!(plan.feasible);
        assert_eq!(plan.total_units(), 0);
    }

    #[test]
    fn rejects_out_of_range_requests() {
        let rows = [row(Some(1.0), None, 0.0, 0.0)];
        assert!(optimizer().plan(&rows, 0.0, 100.0).is_err());
        assert!(optimizer().plan(&rows, 1.2, 100.0).is_err());
        assert!(optimizer().plan(&rows, 0.95, -1.0).is_err());
        assert!(optimizer().plan(&rows, 0.95, f64::NAN).is_err());
    }

    #[test]
    fn rejects_non_finite_row_inputs() {
        let opt = optimizer();
        let bad_rows = [
            row(Some(f64::INFINITY), Some(2.0), 0.0, 0.0),
            row(Some(1.0), Some(f64::NAN), 0.0, 0.0),
            row(Some(1.0), Some(2.0), f64::NEG_INFINITY, 0.0),
            row(Some(1.0), Some(2.0), 0.0, f64::INFINITY),
        ];
        for bad in bad_rows {
            let rows = [bad, row(Some(1.0), None, 0.0, 0.0)];
            assert!(matches!(
                opt.plan(&rows, 0.95, 1_000.0),
                Err(PlannerError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn huge_finite_needs_do_not_overflow_totals() {
        let rows = vec![
            row(Some(1e19), Some(0.0), 0.0, 0.0),
            row(Some(1e19), Some(0.0), 0.0, 0.0),
        ];
        let plan = optimizer().plan(&rows, 0.95, 1_000.0).unwrap();
        assert!(!plan.feasible);
        assert_eq!(plan.total_units(), u64::MAX);
        assert!(plan.over_budget());
    }

    #[test]
    fn join_keeps_inventory_order_and_marks_missing_forecasts() {
        let inventory = vec![
            InventoryState {
                store_id: "S002".to_string(),
                product_id: "P001".to_string(),
                on_hand: 4.0,
                on_order: 1.0,
                demand_std: None,
            },
            InventoryState {
                store_id: "S001".to_string(),
                product_id: "P001".to_string(),
                on_hand: 2.0,
                on_order: 0.0,
                demand_std: Some(1.5),
            },
        ];
        let forecasts = vec![ForecastNext {
            store_id: "S001".to_string(),
            product_id: "P001".to_string(),
            forecast_next: 9.0,
        }];
        let rows = join_inputs(&inventory, &forecasts);
        assert_eq!(rows[0].store_id, "S002");
        assert_eq!(rows[0].forecast_next, None);
        assert_eq!(rows[1].forecast_next, Some(9.0));
        assert_eq!(rows[1].demand_std, Some(1.5));
    }
}
