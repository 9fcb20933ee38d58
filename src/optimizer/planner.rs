use tracing::{debug, warn};

use super::constraints::FLOAT_TOLERANCE;
use super::format::{format_entries, round_tenth};
use super::{
    allocate_renewables, price_fleet, reconcile, DispatchSettings, DispatchStrategy,
    ExhaustiveDispatcher, MeritOrder, MeritOrderDispatcher, StrategyKind,
};
use crate::domain::{DispatchWarning, ProductionPlan, ProductionPlanRequest};

/// Runs the dispatch pipeline:
/// cost model -> renewable allocator -> thermal strategy -> reconciliation -> formatter.
///
/// The planner holds configuration only; every call builds its own data and
/// the planner can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct ProductionPlanner {
    pub settings: DispatchSettings,
    pub default_strategy: StrategyKind,
}

impl ProductionPlanner {
    pub fn new(settings: DispatchSettings, default_strategy: StrategyKind) -> Self {
        Self {
            settings,
            default_strategy,
        }
    }

    fn strategy(&self, kind: StrategyKind) -> Box<dyn DispatchStrategy> {
        match kind {
            StrategyKind::MeritOrder => Box::new(MeritOrderDispatcher),
            StrategyKind::Exhaustive => {
                Box::new(ExhaustiveDispatcher::new(self.settings.exhaustive_max_units))
            }
        }
    }

    pub fn plan(&self, request: &ProductionPlanRequest) -> ProductionPlan {
        self.plan_with(request, self.default_strategy)
    }

    pub fn plan_with(&self, request: &ProductionPlanRequest, kind: StrategyKind) -> ProductionPlan {
        let mut warnings = Vec::new();

        let load = if request.load.is_finite() && request.load >= 0.0 {
            request.load
        } else {
            warn!(load = request.load, "unusable load, planning for 0 MW");
            warnings.push(DispatchWarning::InvalidLoad { load: request.load });
            0.0
        };

        let fleet = price_fleet(&request.powerplants, &request.fuels, &self.settings);
        warnings.extend(fleet.warnings);

        let (renewables, thermal): (Vec<_>, Vec<_>) = fleet
            .units
            .into_iter()
            .partition(|u| u.plant_type.is_renewable());

        let wind = allocate_renewables(&renewables, &request.fuels, load);
        let order = MeritOrder::new(thermal);
        debug!(
            wind_total = wind.total,
            remaining_load = wind.remaining_load,
            thermal_units = order.len(),
            "renewables allocated"
        );

        let dispatch = self.strategy(kind).dispatch(wind.remaining_load, &order);
        let reconciled = reconcile(
            load,
            wind.total,
            &order,
            &dispatch,
            self.settings.residual_tolerance,
        );

        let mut powers = vec![0.0; request.powerplants.len()];
        for output in &wind.outputs {
            powers[output.index] = output.power;
        }
        for (unit, power) in order.units().iter().zip(&reconciled.powers) {
            powers[unit.index] = *power;
        }

        let total_cost = order
            .units()
            .iter()
            .zip(&reconciled.powers)
            .filter(|(unit, power)| unit.is_dispatchable() && **power > 0.0)
            .map(|(unit, power)| unit.cost * power)
            .sum::<f64>();

        let entries = format_entries(&request.powerplants, &powers);
        let total_power = round_tenth(entries.iter().map(|e| e.power).sum());
        let residual = round_tenth(load - total_power);

        warnings.extend(dispatch.warnings);
        if residual.abs() >= self.settings.residual_tolerance - FLOAT_TOLERANCE {
            warn!(load, total_power, residual, "load cannot be matched");
            warnings.push(DispatchWarning::InfeasibleLoad {
                requested: load,
                supplied: total_power,
            });
        }

        ProductionPlan {
            entries,
            strategy: dispatch.strategy,
            load,
            total_power,
            residual,
            total_cost,
            warnings,
        }
    }
}

/// Compute a dispatch plan with default settings and the merit order strategy
pub fn compute_production_plan(request: &ProductionPlanRequest) -> ProductionPlan {
    ProductionPlanner::default().plan(request)
}
