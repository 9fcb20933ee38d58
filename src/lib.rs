//! Single-period economic dispatch of a power plant fleet.
//!
//! [`optimizer`] holds the planning pipeline, [`api`] exposes it over HTTP.

pub mod api;
pub mod config;
pub mod controller;
pub mod domain;
pub mod optimizer;
pub mod telemetry;

pub use domain::{PlantDispatch, ProductionPlan, ProductionPlanRequest};
pub use optimizer::{compute_production_plan, ProductionPlanner, StrategyKind};
