use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumString;
use validator::{Validate, ValidationError};

// ============================================================================
// Fuel Prices
// ============================================================================

/// Market prices for one calculation.
///
/// Field names on the wire follow the production plan payload format, so
/// `{"gas(euro/MWh)": 13.4, "wind(%)": 60, ...}`. Short aliases are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct FuelPrices {
    /// Gas price in EUR/MWh
    #[serde(rename = "gas(euro/MWh)", alias = "gas")]
    pub gas_euro_per_mwh: f64,
    /// Kerosine price in EUR/MWh
    #[serde(rename = "kerosine(euro/MWh)", alias = "kerosine")]
    pub kerosine_euro_per_mwh: f64,
    /// CO2 emission allowance price in EUR/ton
    #[serde(rename = "co2(euro/ton)", alias = "co2")]
    pub co2_euro_per_ton: f64,
    /// Wind availability, 0-100
    #[serde(rename = "wind(%)", alias = "wind")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub wind_percent: f64,
}

impl FuelPrices {
    /// Wind availability as a fraction, clamped to [0, 1]. Non-finite input yields 0.
    pub fn wind_fraction(&self) -> f64 {
        if self.wind_percent.is_finite() {
            (self.wind_percent / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

// ============================================================================
// Plant Types
// ============================================================================

/// Generating technology of a plant.
///
/// The set is closed; anything else parses into [`PlantType::Unsupported`] so
/// that a single bad record degrades into a warning instead of rejecting the
/// whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum PlantType {
    #[strum(serialize = "gas-fired", serialize = "gasfired")]
    GasFired,
    #[strum(serialize = "turbojet")]
    Turbojet,
    #[strum(serialize = "wind-turbine", serialize = "windturbine")]
    WindTurbine,
    #[strum(default)]
    Unsupported(String),
}

impl PlantType {
    /// Renewable units are dispatched by the renewable allocator, not by merit order
    pub fn is_renewable(&self) -> bool {
        matches!(self, PlantType::WindTurbine)
    }
}

impl From<String> for PlantType {
    fn from(value: String) -> Self {
        match value.trim().parse() {
            Ok(kind) => kind,
            Err(_) => PlantType::Unsupported(value),
        }
    }
}

impl From<PlantType> for String {
    fn from(value: PlantType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for PlantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlantType::GasFired => write!(f, "gas-fired"),
            PlantType::Turbojet => write!(f, "turbojet"),
            PlantType::WindTurbine => write!(f, "wind-turbine"),
            PlantType::Unsupported(other) => write!(f, "{}", other),
        }
    }
}

// ============================================================================
// Plants
// ============================================================================

/// One generating unit of the fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_capacity_range"))]
pub struct Plant {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "type")]
    pub plant_type: PlantType,
    /// Fuel-to-power conversion efficiency. Ignored for wind turbines.
    #[serde(default)]
    pub efficiency: f64,
    /// Minimum stable output in MW when running
    #[validate(range(min = 0.0))]
    pub pmin: f64,
    /// Maximum output in MW
    #[validate(range(min = 0.0))]
    pub pmax: f64,
}

impl Plant {
    pub fn new(
        name: impl Into<String>,
        plant_type: PlantType,
        efficiency: f64,
        pmin: f64,
        pmax: f64,
    ) -> Self {
        Self {
            name: name.into(),
            plant_type,
            efficiency,
            pmin,
            pmax,
        }
    }

    /// Operating range with degenerate values folded into something usable:
    /// non-finite or negative bounds become 0 and pmax is never below pmin.
    pub fn capacity_range(&self) -> (f64, f64) {
        let pmin = if self.pmin.is_finite() { self.pmin.max(0.0) } else { 0.0 };
        let pmax = if self.pmax.is_finite() { self.pmax.max(0.0) } else { 0.0 };
        (pmin, pmax.max(pmin))
    }
}

fn validate_capacity_range(plant: &Plant) -> Result<(), ValidationError> {
    if plant.pmax < plant.pmin {
        let mut err = ValidationError::new("pmax_below_pmin");
        err.message = Some(
            format!(
                "plant '{}' has pmax {} below pmin {}",
                plant.name, plant.pmax, plant.pmin
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Request
// ============================================================================

/// Input of a single dispatch calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_unique_names"))]
pub struct ProductionPlanRequest {
    /// Load to be met, in MW
    #[validate(range(min = 0.0))]
    pub load: f64,
    #[validate(nested)]
    pub fuels: FuelPrices,
    #[validate(nested)]
    pub powerplants: Vec<Plant>,
}

fn validate_unique_names(request: &ProductionPlanRequest) -> Result<(), ValidationError> {
    match request.powerplants.iter().map(|p| p.name.as_str()).duplicates().next() {
        Some(name) => {
            let mut err = ValidationError::new("duplicate_plant_name");
            err.message = Some(format!("plant name '{name}' appears more than once").into());
            Err(err)
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("gasfired", PlantType::GasFired)]
    #[case("gas-fired", PlantType::GasFired)]
    #[case("GasFired", PlantType::GasFired)]
    #[case("turbojet", PlantType::Turbojet)]
    #[case("windturbine", PlantType::WindTurbine)]
    #[case("wind-turbine", PlantType::WindTurbine)]
    #[case("nuclear", PlantType::Unsupported("nuclear".to_string()))]
    fn test_plant_type_parsing(#[case] raw: &str, #[case] expected: PlantType) {
        assert_eq!(PlantType::from(raw.to_string()), expected);
    }

    #[test]
    fn test_plant_type_display_is_canonical() {
        assert_eq!(PlantType::GasFired.to_string(), "gas-fired");
        assert_eq!(PlantType::WindTurbine.to_string(), "wind-turbine");
        assert_eq!(PlantType::Unsupported("hydro".into()).to_string(), "hydro");
    }

    #[test]
    fn test_request_deserialization() {
        let json = r#"{
            "load": 480,
            "fuels": {
                "gas(euro/MWh)": 13.4,
                "kerosine(euro/MWh)": 50.8,
                "co2(euro/ton)": 20,
                "wind(%)": 60
            },
            "powerplants": [
                {"name": "gasfiredbig1", "type": "gasfired", "efficiency": 0.53, "pmin": 100, "pmax": 460},
                {"name": "windpark1", "type": "windturbine", "efficiency": 1, "pmin": 0, "pmax": 150}
            ]
        }"#;

        let request: ProductionPlanRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.load, 480.0);
        assert_eq!(request.fuels.co2_euro_per_ton, 20.0);
        assert_eq!(request.powerplants.len(), 2);
        assert_eq!(request.powerplants[0].plant_type, PlantType::GasFired);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_unknown_type_survives_deserialization() {
        let json = r#"{"name": "x", "type": "fusion", "efficiency": 0.9, "pmin": 0, "pmax": 10}"#;
        let plant: Plant = serde_json::from_str(json).unwrap();
        assert_eq!(plant.plant_type, PlantType::Unsupported("fusion".to_string()));
    }

    #[test]
    fn test_validation_rejects_duplicates_and_bad_ranges() {
        let fuels = FuelPrices {
            gas_euro_per_mwh: 13.4,
            kerosine_euro_per_mwh: 50.8,
            co2_euro_per_ton: 20.0,
            wind_percent: 60.0,
        };
        let duplicate = ProductionPlanRequest {
            load: 100.0,
            fuels,
            powerplants: vec![
                Plant::new("a", PlantType::Turbojet, 0.3, 0.0, 16.0),
                Plant::new("a", PlantType::Turbojet, 0.3, 0.0, 16.0),
            ],
        };
        assert!(duplicate.validate().is_err());

        let inverted = ProductionPlanRequest {
            load: 100.0,
            fuels,
            powerplants: vec![Plant::new("a", PlantType::GasFired, 0.5, 50.0, 10.0)],
        };
        assert!(inverted.validate().is_err());

        let windy = ProductionPlanRequest {
            load: 100.0,
            fuels: FuelPrices { wind_percent: 140.0, ..fuels },
            powerplants: vec![],
        };
        assert!(windy.validate().is_err());
    }

    #[test]
    fn test_capacity_range_sanitizes() {
        let plant = Plant::new("p", PlantType::GasFired, 0.5, f64::NAN, -5.0);
        assert_eq!(plant.capacity_range(), (0.0, 0.0));

        let plant = Plant::new("p", PlantType::GasFired, 0.5, 10.0, f64::INFINITY);
        assert_eq!(plant.capacity_range(), (10.0, 10.0));
    }
}
