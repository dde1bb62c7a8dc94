use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use super::{existing_city, required_name};
use crate::error::AppError;
use crate::models::city::City;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cities", post(create_city).get(list_cities))
        .route("/cities/:id", get(get_city))
}

#[derive(Deserialize)]
pub struct CreateCityRequest {
    pub name: String,
}

async fn create_city(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCityRequest>,
) -> Result<Json<City>, AppError> {
    let name = required_name(&payload.name)?;
    let city = state.store.create_city(name)?;
    Ok(Json(city))
}

async fn list_cities(State(state): State<Arc<AppState>>) -> Json<Vec<City>> {
    Json(state.store.cities())
}

async fn get_city(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<City>, AppError> {
    Ok(Json(existing_city(&state, id)?))
}
