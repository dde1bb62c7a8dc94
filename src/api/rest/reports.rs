use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use uuid::Uuid;

use super::existing_city;
use crate::error::AppError;
use crate::models::delivery::DriverDistance;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/driver-rank", get(driver_rank))
        .route("/reports/driver-rank/:city_id", get(driver_rank_by_city))
}

async fn driver_rank(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DriverDistance>>, AppError> {
    Ok(Json(state.assignments.driver_rank_report()?))
}

async fn driver_rank_by_city(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<Uuid>,
) -> Result<Json<Vec<DriverDistance>>, AppError> {
    let city = existing_city(&state, city_id)?;
    Ok(Json(state.assignments.driver_rank_report_by_city(&city)?))
}
