//! Post-dispatch repair of the gap between supplied power and load.
//!
//! Each step takes the current thermal powers by value and returns new ones,
//! so every intermediate state can be inspected in isolation.

use tracing::debug;

use super::constraints::{FLOAT_TOLERANCE, STOP_EPSILON_MW};
use super::format::{round_tenth, round_tenth_within};
use super::{MeritOrder, ThermalDispatch};

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Thermal powers after repair, aligned with the merit order
    pub powers: Vec<f64>,
    /// Load minus supply before the pass, one decimal
    pub initial_gap: f64,
    /// Load minus supply after the pass, one decimal
    pub final_gap: f64,
}

impl Reconciliation {
    pub fn total(&self) -> f64 {
        self.powers.iter().sum()
    }
}

/// Close the gap left by the thermal strategy.
///
/// Under-supply raises units in merit order; if that is not enough the
/// cheapest idle unit whose pmin was too large is started, and the overshoot
/// it causes is taken back from the most expensive units. That start is kept
/// only when it leaves a smaller gap than before. Over-supply is curtailed from
/// the most expensive unit down.
pub fn reconcile(
    load: f64,
    renewable_total: f64,
    order: &MeritOrder,
    dispatch: &ThermalDispatch,
    tolerance: f64,
) -> Reconciliation {
    let powers = dispatch.powers.clone();
    let initial_gap = round_tenth(load - renewable_total - powers.iter().sum::<f64>());

    if initial_gap.abs() < tolerance - FLOAT_TOLERANCE {
        return Reconciliation {
            powers,
            initial_gap,
            final_gap: initial_gap,
        };
    }

    let (powers, gap) = if initial_gap > 0.0 {
        let (raised, gap) = raise(order, powers, initial_gap);
        if gap < STOP_EPSILON_MW {
            (raised, gap)
        } else {
            match start_blocked_unit(order, &raised, gap) {
                Some((started, overshoot)) => {
                    let (curtailed, after) = curtail(order, started, overshoot);
                    if after.abs() <= gap.abs() + FLOAT_TOLERANCE {
                        (curtailed, after)
                    } else {
                        debug!(gap, after, "starting a blocked unit would widen the gap");
                        (raised, gap)
                    }
                }
                None => (raised, gap),
            }
        }
    } else {
        curtail(order, powers, initial_gap)
    };

    debug!(initial_gap, final_gap = gap, "reconciliation done");
    Reconciliation {
        powers,
        initial_gap,
        final_gap: round_tenth(gap),
    }
}

/// Raise units in ascending cost order. Returns the powers and the gap still open.
fn raise(order: &MeritOrder, mut powers: Vec<f64>, mut gap: f64) -> (Vec<f64>, f64) {
    for (unit, power) in order.units().iter().zip(powers.iter_mut()) {
        if gap < STOP_EPSILON_MW {
            break;
        }
        if !unit.is_dispatchable() || unit.pmax - *power < STOP_EPSILON_MW {
            continue;
        }
        let running = *power > 0.0 || unit.pmin <= 0.0;
        if !running && unit.pmin > gap + FLOAT_TOLERANCE {
            // Would overshoot; only considered once nothing else helps
            continue;
        }
        let target = round_tenth_within(*power + gap, unit.pmin, unit.pmax);
        if target <= *power {
            continue;
        }
        debug!(plant = %unit.name, from = *power, to = target, "raising unit");
        gap = round_tenth(gap - (target - *power));
        *power = target;
    }
    (powers, gap)
}

/// Start the cheapest idle unit whose pmin exceeds `gap`. Returns the new
/// powers and the (negative) gap it causes.
fn start_blocked_unit(order: &MeritOrder, powers: &[f64], gap: f64) -> Option<(Vec<f64>, f64)> {
    let position = order
        .units()
        .iter()
        .zip(powers)
        .position(|(unit, power)| {
            unit.is_dispatchable() && *power == 0.0 && unit.pmin > gap && unit.pmax > 0.0
        })?;
    let unit = &order.units()[position];
    let start = round_tenth_within(unit.pmin, unit.pmin, unit.pmax);
    debug!(plant = %unit.name, start, gap, "starting unit at pmin");

    let mut started = powers.to_vec();
    started[position] = start;
    Some((started, round_tenth(gap - start)))
}

/// Reduce units in descending cost order until the over-supply is gone.
/// A unit is taken down to its pmin, or switched off when its whole output
/// fits into the excess. Returns the powers and the remaining gap (<= 0).
fn curtail(order: &MeritOrder, mut powers: Vec<f64>, gap: f64) -> (Vec<f64>, f64) {
    let mut excess = -gap;
    for (unit, power) in order.units().iter().zip(powers.iter_mut()).rev() {
        if excess < STOP_EPSILON_MW {
            break;
        }
        if !unit.is_dispatchable() || *power <= 0.0 {
            continue;
        }
        let current = *power;
        let reducible = if unit.pmin > 0.0 { current - unit.pmin } else { current };
        let target = if reducible + FLOAT_TOLERANCE >= excess {
            round_tenth_within(current - excess, unit.pmin, unit.pmax)
        } else if current <= excess + FLOAT_TOLERANCE {
            0.0
        } else {
            current - reducible
        };
        if target >= current {
            continue;
        }
        debug!(plant = %unit.name, from = current, to = target, "curtailing unit");
        excess = round_tenth(excess - (current - target));
        *power = target;
    }
    (powers, -excess)
}
