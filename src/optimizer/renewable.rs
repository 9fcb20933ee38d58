//! Wind allocation and curtailment.

use ordered_float::OrderedFloat;
use tracing::debug;

use super::constraints::FLOAT_TOLERANCE;
use super::format::{round_tenth, round_tenth_within};
use super::{PricedUnit, UnitOutput};
use crate::domain::FuelPrices;

/// Below this much wind the scaling factor is meaningless
const NEGLIGIBLE_WIND_MW: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct RenewableAllocation {
    pub outputs: Vec<UnitOutput>,
    /// Sum of `outputs`
    pub total: f64,
    /// Load left for the thermal fleet, never negative
    pub remaining_load: f64,
    /// True when wind had to be scaled down to the load
    pub curtailed: bool,
}

/// Natural output of a wind unit at the given availability, on the 0.1 MW grid
pub fn natural_output(unit: &PricedUnit, fuels: &FuelPrices) -> f64 {
    round_tenth_within(unit.pmax * fuels.wind_fraction(), 0.0, unit.pmax)
}

/// Allocate the renewable units of `units` against `load`.
///
/// Non-renewable units in the slice are ignored. When wind alone exceeds the
/// load every wind unit is scaled by the same factor and the result is
/// apportioned on the 0.1 MW grid, so the wind total equals the load.
pub fn allocate_renewables(units: &[PricedUnit], fuels: &FuelPrices, load: f64) -> RenewableAllocation {
    let natural: Vec<UnitOutput> = units
        .iter()
        .filter(|u| u.plant_type.is_renewable())
        .map(|u| UnitOutput {
            index: u.index,
            power: natural_output(u, fuels),
        })
        .collect();
    let natural_total: f64 = natural.iter().map(|o| o.power).sum();

    if natural_total <= load + FLOAT_TOLERANCE {
        debug!(total_wind = natural_total, load, "wind fully absorbed");
        return RenewableAllocation {
            remaining_load: (load - natural_total).max(0.0),
            outputs: natural,
            total: natural_total,
            curtailed: false,
        };
    }

    let target = if natural_total < NEGLIGIBLE_WIND_MW { 0.0 } else { load };
    let caps: Vec<f64> = natural.iter().map(|o| o.power).collect();
    let outputs: Vec<UnitOutput> = natural
        .iter()
        .zip(apportion_tenths(&caps, target))
        .map(|(o, power)| UnitOutput {
            index: o.index,
            power,
        })
        .collect();
    let total: f64 = outputs.iter().map(|o| o.power).sum();
    debug!(natural_total, total, load, "wind curtailed to load");

    RenewableAllocation {
        remaining_load: round_tenth((load - total).max(0.0)),
        outputs,
        total,
        curtailed: true,
    }
}

/// Split `target` MW over units with the given caps, proportionally to the
/// caps and on the 0.1 MW grid.
///
/// Each share is floored to a tenth and the tenths left over go to the units
/// with the largest remainders, earlier units first on ties. No unit exceeds
/// its cap and the shares add up to `target` rounded to a tenth, or to the sum
/// of the caps when that is smaller.
pub fn apportion_tenths(caps: &[f64], target: f64) -> Vec<f64> {
    // Whole tenths as f64: exact up to 2^53 and free of integer overflow
    let cap_tenths: Vec<f64> = caps
        .iter()
        .map(|c| (c.max(0.0) * 10.0 + FLOAT_TOLERANCE).floor())
        .collect();
    let cap_total: f64 = cap_tenths.iter().sum();
    if cap_total <= 0.0 || !target.is_finite() || target <= 0.0 {
        return vec![0.0; caps.len()];
    }
    let target_tenths = (target * 10.0).round().min(cap_total);

    let mut shares = Vec::with_capacity(caps.len());
    let mut remainders = Vec::with_capacity(caps.len());
    for (i, cap) in cap_tenths.iter().enumerate() {
        let exact = cap * target_tenths / cap_total;
        let floor = exact.floor().min(*cap);
        shares.push(floor);
        remainders.push((i, exact - floor));
    }

    let mut leftover = target_tenths - shares.iter().sum::<f64>();
    remainders.sort_by(|a, b| {
        OrderedFloat(b.1)
            .cmp(&OrderedFloat(a.1))
            .then(a.0.cmp(&b.0))
    });
    while leftover >= 1.0 {
        let before = leftover;
        for &(i, _) in &remainders {
            if leftover < 1.0 {
                break;
            }
            if shares[i] + 1.0 <= cap_tenths[i] {
                shares[i] += 1.0;
                leftover -= 1.0;
            }
        }
        if leftover == before {
            break;
        }
    }

    shares.into_iter().map(|t| round_tenth(t / 10.0)).collect()
}
