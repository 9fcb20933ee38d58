use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::time::Instant;

use crate::controller::AppState;
use crate::domain::{FuelPrices, Plant, PlantType, ProductionPlanRequest};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    planner: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentHealth {
    fn healthy(latency_ms: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            latency_ms: None,
            error: Some(error),
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

fn probe_request() -> ProductionPlanRequest {
    ProductionPlanRequest {
        load: 150.0,
        fuels: FuelPrices {
            gas_euro_per_mwh: 13.4,
            kerosine_euro_per_mwh: 50.8,
            co2_euro_per_ton: 20.0,
            wind_percent: 50.0,
        },
        powerplants: vec![
            Plant::new("probe-gas", PlantType::GasFired, 0.5, 50.0, 200.0),
            Plant::new("probe-wind", PlantType::WindTurbine, 1.0, 0.0, 100.0),
        ],
    }
}

/// Plans a fixed fleet with the configured settings: wind 50 MW, gas 100 MW.
fn check_planner(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    let plan = state.controller.planner.plan(&probe_request());
    let latency = start.elapsed().as_millis() as u64;

    match (plan.power_of("probe-wind"), plan.power_of("probe-gas")) {
        (Some(wind), Some(gas)) if plan.is_feasible() && wind == 50.0 && gas == 100.0 => {
            ComponentHealth::healthy(latency)
        }
        (wind, gas) => ComponentHealth::unhealthy(format!(
            "probe plan mismatch: wind {wind:?} MW, gas {gas:?} MW, residual {} MW",
            plan.residual
        )),
    }
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let planner = check_planner(&state);
    let healthy = planner.is_healthy();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now(),
        checks: HealthChecks { planner },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        tracing::warn!(?response, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

/// GET /health/ready - Readiness probe
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if check_planner(&state).is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
