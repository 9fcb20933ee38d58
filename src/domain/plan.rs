use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::optimizer::StrategyKind;

/// Power assigned to one plant, in MW with one decimal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantDispatch {
    pub name: String,
    #[serde(rename = "p", alias = "power")]
    pub power: f64,
}

/// Non-fatal conditions found while planning.
///
/// None of these abort a calculation; they travel with the plan so the caller
/// can decide how loud to be about them.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchWarning {
    #[error("plant '{plant}' has unsupported type '{plant_type}' and was excluded")]
    UnsupportedPlantType { plant: String, plant_type: String },

    #[error("plant '{plant}' has invalid efficiency {efficiency} and was excluded")]
    InvalidEfficiency { plant: String, efficiency: f64 },

    #[error("requested load {load} is not a usable quantity, planning for 0 MW")]
    InvalidLoad { load: f64 },

    #[error("load of {requested} MW cannot be matched, best effort supplies {supplied} MW")]
    InfeasibleLoad { requested: f64, supplied: f64 },

    #[error("{requested} strategy cannot handle {units} units, used {used} instead")]
    StrategyFallback {
        requested: StrategyKind,
        used: StrategyKind,
        units: usize,
    },
}

/// Raised when a caller insists on a plan that actually meets the load
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    #[error("could not compute a valid production plan: load {requested} MW, best effort {supplied} MW")]
    Infeasible { requested: f64, supplied: f64 },
}

/// Result of one dispatch calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPlan {
    /// One entry per input plant, in input order
    pub entries: Vec<PlantDispatch>,
    pub strategy: StrategyKind,
    pub load: f64,
    pub total_power: f64,
    /// Requested load minus supplied power
    pub residual: f64,
    /// Fuel and emission cost of the plan, EUR/h
    pub total_cost: f64,
    pub warnings: Vec<DispatchWarning>,
}

impl ProductionPlan {
    pub fn is_feasible(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| matches!(w, DispatchWarning::InfeasibleLoad { .. }))
    }

    /// Power assigned to the named plant, if it is part of the plan
    pub fn power_of(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.power)
    }

    pub fn ensure_feasible(self) -> Result<Self, PlanningError> {
        if self.is_feasible() {
            Ok(self)
        } else {
            Err(PlanningError::Infeasible {
                requested: self.load,
                supplied: self.total_power,
            })
        }
    }
}
