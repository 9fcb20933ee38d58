//! Property-based and scenario tests for the dispatch pipeline.

use proptest::prelude::*;

use production_planner::compute_production_plan;
use production_planner::domain::{FuelPrices, Plant, PlantType, ProductionPlanRequest};
use production_planner::optimizer::{ProductionPlanner, StrategyKind};

fn fuels(wind_percent: f64) -> FuelPrices {
    FuelPrices {
        gas_euro_per_mwh: 13.4,
        kerosine_euro_per_mwh: 50.8,
        co2_euro_per_ton: 20.0,
        wind_percent,
    }
}

fn on_tenth_grid(value: f64) -> bool {
    ((value * 10.0).round() - value * 10.0).abs() < 1e-6
}

/// (type, efficiency, pmin, pmax) with integer capacities
fn arb_plant() -> impl Strategy<Value = (u8, f64, u32, u32)> {
    (0u8..3, 0.2f64..0.6, 0u32..150, 0u32..300)
        .prop_map(|(kind, eff, a, b)| (kind, eff, a.min(b), a.max(b)))
}

fn build_request(load: u32, wind: u32, plants: &[(u8, f64, u32, u32)]) -> ProductionPlanRequest {
    let powerplants = plants
        .iter()
        .enumerate()
        .map(|(i, &(kind, eff, pmin, pmax))| {
            let (plant_type, pmin) = match kind {
                0 => (PlantType::GasFired, pmin),
                1 => (PlantType::Turbojet, pmin),
                _ => (PlantType::WindTurbine, 0),
            };
            Plant::new(format!("unit{i}"), plant_type, eff, pmin as f64, pmax as f64)
        })
        .collect();
    ProductionPlanRequest {
        load: load as f64,
        fuels: fuels(wind as f64),
        powerplants,
    }
}

proptest! {
    /// Every plant is either off or inside its operating range, on the 0.1 MW grid.
    #[test]
    fn entries_respect_bounds(
        load in 0u32..1500,
        wind in 0u32..=100,
        plants in prop::collection::vec(arb_plant(), 1..8),
    ) {
        let request = build_request(load, wind, &plants);
        let plan = compute_production_plan(&request);

        prop_assert_eq!(plan.entries.len(), request.powerplants.len());
        for (entry, plant) in plan.entries.iter().zip(&request.powerplants) {
            prop_assert_eq!(&entry.name, &plant.name);
            prop_assert!(entry.power >= 0.0, "{} negative: {}", entry.name, entry.power);
            prop_assert!(on_tenth_grid(entry.power), "{} off grid: {}", entry.name, entry.power);
            if plant.plant_type.is_renewable() {
                prop_assert!(entry.power <= plant.pmax * wind as f64 / 100.0 + 0.05 + 1e-9);
            } else if entry.power > 0.0 {
                prop_assert!(entry.power >= plant.pmin - 1e-9, "{} below pmin", entry.name);
                prop_assert!(entry.power <= plant.pmax + 1e-9, "{} above pmax", entry.name);
            }
        }
    }

    /// Same request, same plan.
    #[test]
    fn planning_is_deterministic(
        load in 0u32..1500,
        wind in 0u32..=100,
        plants in prop::collection::vec(arb_plant(), 1..8),
    ) {
        let request = build_request(load, wind, &plants);
        prop_assert_eq!(compute_production_plan(&request), compute_production_plan(&request));
    }

    /// Without pmin constraints any load up to the thermal capacity is met exactly.
    #[test]
    fn flexible_fleet_meets_load(
        wind in 0u32..=100,
        wind_parks in prop::collection::vec(0u32..200, 0..5),
        thermal in prop::collection::vec((0.2f64..0.6, 1u32..300), 1..6),
        share in 0.0f64..=1.0,
    ) {
        let capacity: u32 = thermal.iter().map(|(_, pmax)| pmax).sum();
        let load = (capacity as f64 * share).floor() as u32;

        let mut plants: Vec<_> = thermal.iter().map(|&(eff, pmax)| (0u8, eff, 0, pmax)).collect();
        plants.extend(wind_parks.iter().map(|&pmax| (2, 1.0, 0, pmax)));
        let request = build_request(load, wind, &plants);
        let plan = compute_production_plan(&request);

        prop_assert!(plan.is_feasible(), "warnings: {:?}", plan.warnings);
        prop_assert!((plan.total_power - load as f64).abs() < 0.1 - 1e-9);
        prop_assert_eq!(plan.residual, 0.0);
    }

    /// Wind alone covering the load is curtailed to the load exactly,
    /// however many parks share it.
    #[test]
    fn curtailed_wind_meets_load(
        wind in 1u32..=100,
        wind_parks in prop::collection::vec(1u32..200, 1..10),
        share in 0.0f64..=1.0,
    ) {
        let available: f64 = wind_parks.iter().map(|&p| p as f64 * wind as f64 / 100.0).sum();
        let load = (available * share).floor() as u32;

        let mut plants: Vec<_> = wind_parks.iter().map(|&pmax| (2u8, 1.0, 0, pmax)).collect();
        // Backstop for the few tenths per park lost when natural output is rounded
        plants.push((0, 0.5, 0, 10_000));
        let request = build_request(load, wind, &plants);
        let plan = compute_production_plan(&request);

        prop_assert!(plan.is_feasible(), "warnings: {:?}", plan.warnings);
        prop_assert_eq!(plan.total_power, load as f64);
        prop_assert_eq!(plan.residual, 0.0);
    }

    /// A zero-capacity plant neither produces nor moves anyone else.
    #[test]
    fn zero_capacity_plant_is_dead_weight(
        load in 0u32..1500,
        wind in 0u32..=100,
        plants in prop::collection::vec(arb_plant(), 1..8),
    ) {
        let request = build_request(load, wind, &plants);
        let mut extended = request.clone();
        extended
            .powerplants
            .push(Plant::new("zero", PlantType::GasFired, 0.9, 0.0, 0.0));

        let base = compute_production_plan(&request);
        let with_zero = compute_production_plan(&extended);
        prop_assert_eq!(&with_zero.entries[..base.entries.len()], &base.entries[..]);
        prop_assert_eq!(with_zero.power_of("zero"), Some(0.0));
    }

    /// Units with zero capacity never produce.
    #[test]
    fn zero_capacity_units_stay_off(
        load in 0u32..500,
        wind in 0u32..=100,
    ) {
        let request = ProductionPlanRequest {
            load: load as f64,
            fuels: fuels(wind as f64),
            powerplants: vec![
                Plant::new("dead-gas", PlantType::GasFired, 0.9, 0.0, 0.0),
                Plant::new("dead-wind", PlantType::WindTurbine, 1.0, 0.0, 0.0),
                Plant::new("gas", PlantType::GasFired, 0.5, 0.0, 600.0),
            ],
        };
        let plan = compute_production_plan(&request);
        prop_assert_eq!(plan.power_of("dead-gas"), Some(0.0));
        prop_assert_eq!(plan.power_of("dead-wind"), Some(0.0));
        prop_assert_eq!(plan.power_of("gas"), Some(load as f64));
    }
}

#[test]
fn scenario_wind_then_gas() {
    let request = ProductionPlanRequest {
        load: 480.0,
        fuels: fuels(60.0),
        powerplants: vec![
            Plant::new("wind", PlantType::WindTurbine, 1.0, 0.0, 150.0),
            Plant::new("gas", PlantType::GasFired, 0.5, 100.0, 460.0),
        ],
    };
    let plan = compute_production_plan(&request);
    assert_eq!(plan.power_of("wind"), Some(90.0));
    assert_eq!(plan.power_of("gas"), Some(390.0));
    assert!(plan.is_feasible());
}

#[test]
fn scenario_wind_curtailed_to_load() {
    let request = ProductionPlanRequest {
        load: 50.0,
        fuels: fuels(100.0),
        powerplants: vec![
            Plant::new("wind", PlantType::WindTurbine, 1.0, 0.0, 150.0),
            Plant::new("gas", PlantType::GasFired, 0.5, 100.0, 460.0),
        ],
    };
    let plan = compute_production_plan(&request);
    assert_eq!(plan.power_of("wind"), Some(50.0));
    assert_eq!(plan.power_of("gas"), Some(0.0));
    assert_eq!(plan.residual, 0.0);
}

#[test]
fn scenario_pmin_above_load_is_reported() {
    let request = ProductionPlanRequest {
        load: 30.0,
        fuels: fuels(0.0),
        powerplants: vec![Plant::new("gas", PlantType::GasFired, 0.5, 50.0, 200.0)],
    };
    let plan = compute_production_plan(&request);
    assert_eq!(plan.power_of("gas"), Some(50.0));
    assert_eq!(plan.residual, -20.0);
    assert!(!plan.is_feasible());
}

#[test]
fn exhaustive_never_costs_more_than_merit_order() {
    let request = ProductionPlanRequest {
        load: 130.0,
        fuels: fuels(0.0),
        powerplants: vec![
            Plant::new("big", PlantType::GasFired, 0.55, 100.0, 120.0),
            Plant::new("mid", PlantType::GasFired, 0.45, 60.0, 80.0),
            Plant::new("small", PlantType::GasFired, 0.35, 40.0, 70.0),
            Plant::new("jet", PlantType::Turbojet, 0.3, 0.0, 20.0),
        ],
    };
    let planner = ProductionPlanner::default();
    let greedy = planner.plan_with(&request, StrategyKind::MeritOrder);
    let exhaustive = planner.plan_with(&request, StrategyKind::Exhaustive);

    assert!(exhaustive.is_feasible());
    assert!(exhaustive.total_cost <= greedy.total_cost + 1e-6);
}
