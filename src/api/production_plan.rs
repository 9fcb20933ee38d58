use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use crate::{
    api::error::ApiError,
    controller::AppState,
    domain::{PlantDispatch, ProductionPlanRequest},
};

/// POST /productionplan - One `{name, p}` entry per plant, in request order
pub async fn production_plan(
    State(state): State<AppState>,
    payload: Result<Json<ProductionPlanRequest>, JsonRejection>,
) -> Result<Json<Vec<PlantDispatch>>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    tracing::info!(
        load = request.load,
        plants = request.powerplants.len(),
        "Production plan requested"
    );

    let plan = state.controller.production_plan(&request, None)?;
    Ok(Json(plan.entries))
}
