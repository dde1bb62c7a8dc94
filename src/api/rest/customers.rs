use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use super::{existing_city, required_name};
use crate::error::AppError;
use crate::models::customer::Customer;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/customers", post(create_customer).get(list_customers))
        .route("/customers/:id", get(get_customer))
}

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub city_id: Uuid,
    #[serde(default)]
    pub description: String,
}

async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let name = required_name(&payload.name)?;
    let city = existing_city(&state, payload.city_id)?;

    let customer = state
        .store
        .create_customer(name, city, &payload.description);
    Ok(Json(customer))
}

async fn list_customers(State(state): State<Arc<AppState>>) -> Json<Vec<Customer>> {
    Json(state.store.customers())
}

async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .store
        .customer(id)
        .ok_or_else(|| AppError::NotFound(format!("customer {} not found", id)))?;

    Ok(Json(customer))
}
