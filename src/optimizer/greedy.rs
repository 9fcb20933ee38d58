use tracing::debug;

use super::constraints::{FLOAT_TOLERANCE, STOP_EPSILON_MW};
use super::format::round_tenth_within;
use super::{DispatchStrategy, MeritOrder, StrategyKind, ThermalDispatch};

/// Greedy merit order dispatcher:
/// - Walk thermal units from cheapest to most expensive
/// - Give each unit as much of the remaining need as it can take
/// - Skip a unit whose pmin is larger than what is still needed
///
/// The skip is a known limitation: no combination of units is searched, the
/// reconciliation pass repairs what it can afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeritOrderDispatcher;

impl DispatchStrategy for MeritOrderDispatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MeritOrder
    }

    fn dispatch(&self, remaining_load: f64, order: &MeritOrder) -> ThermalDispatch {
        let mut dispatched = 0.0;
        let mut powers = Vec::with_capacity(order.len());

        for unit in order.units() {
            let needed = remaining_load - dispatched;
            let power = if needed < STOP_EPSILON_MW || !unit.is_dispatchable() {
                0.0
            } else if unit.pmin <= 0.0 || needed + FLOAT_TOLERANCE >= unit.pmin {
                round_tenth_within(needed.min(unit.pmax), unit.pmin, unit.pmax)
            } else {
                debug!(plant = %unit.name, needed, pmin = unit.pmin, "need below pmin, skipping");
                0.0
            };
            if power > 0.0 {
                debug!(plant = %unit.name, cost = unit.cost, power, "merit order dispatch");
            }
            dispatched += power;
            powers.push(power);
        }

        ThermalDispatch {
            strategy: StrategyKind::MeritOrder,
            powers,
            warnings: Vec::new(),
        }
    }
}
