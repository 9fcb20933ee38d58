use tracing::{debug, warn};

use crate::domain::DispatchWarning;
use crate::optimizer::constraints::{MAX_EXHAUSTIVE_CAPACITY_MW, MAX_EXHAUSTIVE_UNITS};
use crate::optimizer::format::round_tenth;
use crate::optimizer::{
    DispatchStrategy, MeritOrder, MeritOrderDispatcher, StrategyKind, ThermalDispatch,
};

/// Exact dispatcher for small fleets.
///
/// Every on/off combination of the dispatchable thermal units is evaluated.
/// Within a combination the committed units first run at pmin and the rest of
/// the need is filled in merit order, which is optimal for constant marginal
/// costs. Work happens in integer tenths of a MW so the result sits on the
/// same 0.1 MW grid as the merit order strategy.
///
/// Combinations are ranked by the absolute mismatch with the load, then by
/// cost; the first one enumerated wins exact ties.
#[derive(Debug, Clone, Copy)]
pub struct ExhaustiveDispatcher {
    pub max_units: usize,
}

impl ExhaustiveDispatcher {
    pub fn new(max_units: usize) -> Self {
        Self {
            max_units: max_units.min(MAX_EXHAUSTIVE_UNITS),
        }
    }
}

/// A unit eligible for commitment, in tenths of a MW
#[derive(Debug, Clone, Copy)]
struct Candidate {
    position: usize,
    lo: i64,
    hi: i64,
    cost: f64,
}

#[derive(Debug, Clone)]
struct Commitment {
    mismatch: i64,
    cost: f64,
    levels: Vec<i64>,
}

fn to_tenths_ceil(mw: f64) -> i64 {
    (mw * 10.0 - 1e-6).ceil() as i64
}

fn to_tenths_floor(mw: f64) -> i64 {
    (mw * 10.0 + 1e-6).floor() as i64
}

fn evaluate(candidates: &[Candidate], mask: u64, target: i64) -> Commitment {
    let mut levels = vec![0i64; candidates.len()];
    let mut floor = 0i64;
    for (j, c) in candidates.iter().enumerate() {
        if mask & (1 << j) != 0 {
            levels[j] = c.lo;
            floor += c.lo;
        }
    }

    let mut left = target - floor;
    for (j, c) in candidates.iter().enumerate() {
        if left <= 0 {
            break;
        }
        if mask & (1 << j) != 0 {
            let add = left.min(c.hi - c.lo);
            levels[j] += add;
            left -= add;
        }
    }

    let supplied: i64 = levels.iter().sum();
    let cost = candidates
        .iter()
        .zip(&levels)
        .map(|(c, level)| *level as f64 / 10.0 * c.cost)
        .sum();
    Commitment {
        mismatch: (target - supplied).abs(),
        cost,
        levels,
    }
}

impl DispatchStrategy for ExhaustiveDispatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Exhaustive
    }

    fn dispatch(&self, remaining_load: f64, order: &MeritOrder) -> ThermalDispatch {
        let candidates: Vec<Candidate> = order
            .units()
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_dispatchable() && u.pmax > 0.0)
            .map(|(position, u)| Candidate {
                position,
                lo: to_tenths_ceil(u.pmin).max(0),
                hi: to_tenths_floor(u.pmax),
                cost: u.cost,
            })
            .filter(|c| c.lo <= c.hi)
            .collect();

        let oversized = order
            .units()
            .iter()
            .any(|u| u.is_dispatchable() && u.pmax > MAX_EXHAUSTIVE_CAPACITY_MW);
        if candidates.len() > self.max_units || oversized {
            warn!(
                units = candidates.len(),
                max_units = self.max_units,
                oversized,
                "fleet too large for exhaustive dispatch, using merit order"
            );
            let mut fallback = MeritOrderDispatcher.dispatch(remaining_load, order);
            fallback.warnings.push(DispatchWarning::StrategyFallback {
                requested: StrategyKind::Exhaustive,
                used: StrategyKind::MeritOrder,
                units: candidates.len(),
            });
            return fallback;
        }

        let target = (remaining_load.max(0.0) * 10.0).round() as i64;
        let mut best: Option<Commitment> = None;
        for mask in 0..(1u64 << candidates.len()) {
            let commitment = evaluate(&candidates, mask, target);
            let better = match &best {
                None => true,
                Some(b) => {
                    commitment.mismatch < b.mismatch
                        || (commitment.mismatch == b.mismatch && commitment.cost < b.cost - 1e-9)
                }
            };
            if better {
                best = Some(commitment);
            }
        }

        let mut powers = vec![0.0; order.len()];
        if let Some(best) = best {
            debug!(
                mismatch_tenths = best.mismatch,
                cost = best.cost,
                combinations = 1u64 << candidates.len(),
                "exhaustive dispatch"
            );
            for (c, level) in candidates.iter().zip(best.levels) {
                powers[c.position] = round_tenth(level as f64 / 10.0);
            }
        }

        ThermalDispatch {
            strategy: StrategyKind::Exhaustive,
            powers,
            warnings: Vec::new(),
        }
    }
}
