use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use super::{existing_city, required_name};
use crate::error::AppError;
use crate::models::delivery::Delivery;
use crate::models::driver::Driver;
use crate::state::AppState;
use crate::store::{DeliveryLedger, DriverDirectory};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", post(create_driver).get(list_drivers))
        .route("/drivers/:id/deliveries", get(driver_deliveries))
}

#[derive(Deserialize)]
pub struct CreateDriverRequest {
    pub name: String,
    pub city_id: Uuid,
}

#[derive(Deserialize)]
pub struct DriverFilter {
    pub city_id: Option<Uuid>,
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDriverRequest>,
) -> Result<Json<Driver>, AppError> {
    let name = required_name(&payload.name)?;
    let city = existing_city(&state, payload.city_id)?;

    Ok(Json(state.store.create_driver(name, city)))
}

async fn list_drivers(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DriverFilter>,
) -> Result<Json<Vec<Driver>>, AppError> {
    let Some(city_id) = filter.city_id else {
        return Ok(Json(state.store.drivers()));
    };

    let city = existing_city(&state, city_id)?;
    let mut drivers = state.store.drivers_in_city(&city)?;
    drivers.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(drivers))
}

async fn driver_deliveries(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Delivery>>, AppError> {
    let driver = state
        .store
        .driver(id)
        .ok_or_else(|| AppError::NotFound(format!("driver {} not found", id)))?;

    Ok(Json(state.store.all_deliveries_for(&driver)?))
}
