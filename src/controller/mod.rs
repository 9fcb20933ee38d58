use std::sync::Arc;
use tracing::info;

use crate::config::{Config, DispatchConfig};
use crate::domain::{PlanningError, ProductionPlan, ProductionPlanRequest};
use crate::optimizer::{ProductionPlanner, StrategyKind};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub controller: Arc<DispatchController>,
}

impl AppState {
    pub fn new(cfg: Config) -> Self {
        let controller = Arc::new(DispatchController::new(&cfg.dispatch));
        Self { cfg, controller }
    }
}

/// Applies the service policy around the planner: strategy selection and
/// whether a plan that misses the load is an error.
pub struct DispatchController {
    pub planner: ProductionPlanner,
    pub reject_infeasible: bool,
}

impl DispatchController {
    pub fn new(cfg: &DispatchConfig) -> Self {
        Self {
            planner: ProductionPlanner::new(cfg.settings(), cfg.strategy),
            reject_infeasible: cfg.reject_infeasible,
        }
    }

    /// Compute a plan. `strategy` overrides the configured default.
    pub fn production_plan(
        &self,
        request: &ProductionPlanRequest,
        strategy: Option<StrategyKind>,
    ) -> Result<ProductionPlan, PlanningError> {
        let kind = strategy.unwrap_or(self.planner.default_strategy);
        let plan = self.planner.plan_with(request, kind);
        info!(
            load = plan.load,
            total_power = plan.total_power,
            residual = plan.residual,
            total_cost = plan.total_cost,
            strategy = %plan.strategy,
            plants = plan.entries.len(),
            warnings = plan.warnings.len(),
            "production plan computed"
        );

        if self.reject_infeasible {
            plan.ensure_feasible()
        } else {
            Ok(plan)
        }
    }
}
