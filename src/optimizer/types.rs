use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::domain::{DispatchWarning, PlantType};

/// Which thermal dispatch algorithm to run
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum StrategyKind {
    /// Greedy loading in ascending cost order, followed by reconciliation
    #[default]
    MeritOrder,
    /// Enumerates on/off commitments; exact in 0.1 MW steps for small fleets
    Exhaustive,
}

/// A plant together with its marginal cost and sanitized operating range
#[derive(Debug, Clone, PartialEq)]
pub struct PricedUnit {
    /// Position of the plant in the request
    pub index: usize,
    pub name: String,
    pub plant_type: PlantType,
    pub pmin: f64,
    pub pmax: f64,
    /// EUR/MWh; infinite for units that must never run
    pub cost: f64,
}

impl PricedUnit {
    pub fn is_dispatchable(&self) -> bool {
        self.cost.is_finite()
    }
}

/// Power decided for one unit by a stage, keyed by request position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitOutput {
    pub index: usize,
    pub power: f64,
}

/// Thermal units sorted by ascending cost, ties broken by name.
#[derive(Debug, Clone, PartialEq)]
pub struct MeritOrder {
    units: Vec<PricedUnit>,
}

impl MeritOrder {
    pub fn new(units: impl IntoIterator<Item = PricedUnit>) -> Self {
        let mut units: Vec<PricedUnit> = units.into_iter().collect();
        units.sort_by(|a, b| {
            OrderedFloat(a.cost)
                .cmp(&OrderedFloat(b.cost))
                .then_with(|| a.name.cmp(&b.name))
        });
        Self { units }
    }

    pub fn units(&self) -> &[PricedUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn dispatchable_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_dispatchable()).count()
    }
}

/// Thermal assignment produced by a strategy, aligned with the merit order
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalDispatch {
    /// Strategy that actually produced the powers
    pub strategy: StrategyKind,
    pub powers: Vec<f64>,
    pub warnings: Vec<DispatchWarning>,
}

impl ThermalDispatch {
    pub fn total(&self) -> f64 {
        self.powers.iter().sum()
    }
}

/// Thermal dispatch algorithm.
///
/// Implementations are pure: they read the merit order and the load left after
/// renewables and return a fresh assignment.
pub trait DispatchStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn dispatch(&self, remaining_load: f64, order: &MeritOrder) -> ThermalDispatch;
}
