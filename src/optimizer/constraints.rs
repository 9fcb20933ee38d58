use serde::{Deserialize, Serialize};

/// Gap below which a stage considers the load met
pub const STOP_EPSILON_MW: f64 = 0.01;

/// Slack used when comparing values that should be equal up to float noise
pub const FLOAT_TOLERANCE: f64 = 1e-9;

/// Hard ceiling on the fleet size the exhaustive strategy will enumerate
pub const MAX_EXHAUSTIVE_UNITS: usize = 20;

/// Largest unit capacity the exhaustive strategy enumerates in tenths of a MW.
/// Twenty units at this size still sum well inside `i64`.
pub const MAX_EXHAUSTIVE_CAPACITY_MW: f64 = 1e9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// Tons of CO2 per MWh produced by gas-fired units
    pub co2_emission_factor: f64,
    /// Largest |load - supplied| still reported as a match
    pub residual_tolerance: f64,
    /// Above this many dispatchable units the exhaustive strategy falls back to merit order
    pub exhaustive_max_units: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            co2_emission_factor: 0.3,
            residual_tolerance: 0.1,
            exhaustive_max_units: 12,
        }
    }
}
