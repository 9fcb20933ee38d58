//! Marginal cost of each unit from fuel prices and efficiency.

use thiserror::Error;
use tracing::{debug, warn};

use super::{DispatchSettings, PricedUnit};
use crate::domain::{DispatchWarning, FuelPrices, Plant, PlantType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    #[error("unsupported plant type '{0}'")]
    UnsupportedType(String),

    #[error("efficiency must be positive, got {0}")]
    InvalidEfficiency(f64),
}

/// Cost of producing one MWh with the given technology, in EUR/MWh.
///
/// Wind is free. Gas pays for fuel and for `co2_emission_factor` tons of CO2
/// per MWh; turbojets only pay for kerosine.
pub fn marginal_cost(
    plant_type: &PlantType,
    efficiency: f64,
    fuels: &FuelPrices,
    co2_emission_factor: f64,
) -> Result<f64, CostError> {
    let valid_efficiency = efficiency.is_finite() && efficiency > 0.0;
    match plant_type {
        PlantType::WindTurbine => Ok(0.0),
        PlantType::Unsupported(other) => Err(CostError::UnsupportedType(other.clone())),
        PlantType::GasFired | PlantType::Turbojet if !valid_efficiency => {
            Err(CostError::InvalidEfficiency(efficiency))
        }
        PlantType::GasFired => Ok(
            fuels.gas_euro_per_mwh / efficiency + co2_emission_factor * fuels.co2_euro_per_ton,
        ),
        PlantType::Turbojet => Ok(fuels.kerosine_euro_per_mwh / efficiency),
    }
}

/// Fleet with costs attached, plus the warnings raised while pricing it
#[derive(Debug, Clone, PartialEq)]
pub struct PricedFleet {
    pub units: Vec<PricedUnit>,
    pub warnings: Vec<DispatchWarning>,
}

/// Price every plant. Units that cannot be priced get an infinite cost so no
/// later stage ever selects them.
pub fn price_fleet(plants: &[Plant], fuels: &FuelPrices, settings: &DispatchSettings) -> PricedFleet {
    let mut warnings = Vec::new();
    let units = plants
        .iter()
        .enumerate()
        .map(|(index, plant)| {
            let cost = match marginal_cost(
                &plant.plant_type,
                plant.efficiency,
                fuels,
                settings.co2_emission_factor,
            ) {
                Ok(cost) => cost,
                Err(e) => {
                    warn!(plant = %plant.name, error = %e, "excluding plant from dispatch");
                    warnings.push(match e {
                        CostError::UnsupportedType(plant_type) => DispatchWarning::UnsupportedPlantType {
                            plant: plant.name.clone(),
                            plant_type,
                        },
                        CostError::InvalidEfficiency(efficiency) => DispatchWarning::InvalidEfficiency {
                            plant: plant.name.clone(),
                            efficiency,
                        },
                    });
                    f64::INFINITY
                }
            };
            let (pmin, pmax) = plant.capacity_range();
            debug!(plant = %plant.name, plant_type = %plant.plant_type, cost, pmin, pmax, "priced unit");
            PricedUnit {
                index,
                name: plant.name.clone(),
                plant_type: plant.plant_type.clone(),
                pmin,
                pmax,
                cost,
            }
        })
        .collect();

    PricedFleet { units, warnings }
}
