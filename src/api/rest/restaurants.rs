use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use super::{existing_city, required_name};
use crate::error::AppError;
use crate::models::restaurant::Restaurant;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/restaurants", post(create_restaurant).get(list_restaurants))
        .route("/restaurants/:id", get(get_restaurant))
}

#[derive(Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub city_id: Uuid,
    #[serde(default)]
    pub description: String,
}

async fn create_restaurant(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRestaurantRequest>,
) -> Result<Json<Restaurant>, AppError> {
    let name = required_name(&payload.name)?;
    let city = existing_city(&state, payload.city_id)?;

    let restaurant = state
        .store
        .create_restaurant(name, city, &payload.description);
    Ok(Json(restaurant))
}

async fn list_restaurants(State(state): State<Arc<AppState>>) -> Json<Vec<Restaurant>> {
    Json(state.store.restaurants())
}

async fn get_restaurant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Restaurant>, AppError> {
    let restaurant = state
        .store
        .restaurant(id)
        .ok_or_else(|| AppError::NotFound(format!("restaurant {} not found", id)))?;

    Ok(Json(restaurant))
}
