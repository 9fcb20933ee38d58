use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use crate::{
    api::{error::ApiError, response::ApiResponse},
    controller::AppState,
    domain::{ProductionPlan, ProductionPlanRequest},
    optimizer::{DispatchSettings, StrategyKind},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dispatch", post(dispatch))
        .route("/settings", get(settings))
}

#[derive(Debug, Default, Deserialize)]
pub struct DispatchQuery {
    pub strategy: Option<StrategyKind>,
}

/// POST /api/v1/dispatch - Full plan report with totals, cost and warnings
pub async fn dispatch(
    State(state): State<AppState>,
    query: Result<Query<DispatchQuery>, QueryRejection>,
    payload: Result<Json<ProductionPlanRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ProductionPlan>>, ApiError> {
    let Query(query) = query?;
    let Json(request) = payload?;
    request.validate()?;

    let start = Instant::now();
    let plan = state.controller.production_plan(&request, query.strategy)?;
    let count = plan.entries.len();

    Ok(Json(
        ApiResponse::success(plan)
            .with_count(count)
            .with_duration(start.elapsed().as_millis() as u64),
    ))
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub strategy: StrategyKind,
    pub reject_infeasible: bool,
    pub settings: DispatchSettings,
}

/// GET /api/v1/settings - Active dispatch configuration
pub async fn settings(State(state): State<AppState>) -> Json<ApiResponse<SettingsResponse>> {
    let controller = &state.controller;
    Json(ApiResponse::success(SettingsResponse {
        strategy: controller.planner.default_strategy,
        reject_infeasible: controller.reject_infeasible,
        settings: controller.planner.settings,
    }))
}
