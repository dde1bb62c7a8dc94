pub mod cities;
pub mod customers;
pub mod deliveries;
pub mod drivers;
pub mod reports;
pub mod restaurants;
pub mod ws;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::city::City;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(cities::router())
        .merge(customers::router())
        .merge(restaurants::router())
        .merge(drivers::router())
        .merge(deliveries::router())
        .merge(reports::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

fn required_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    Ok(name)
}

fn existing_city(state: &AppState, id: Uuid) -> Result<City, AppError> {
    state
        .store
        .city(id)
        .ok_or_else(|| AppError::NotFound(format!("city {} not found", id)))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    cities: usize,
    customers: usize,
    restaurants: usize,
    drivers: usize,
    deliveries: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cities: state.store.city_count(),
        customers: state.store.customer_count(),
        restaurants: state.store.restaurant_count(),
        drivers: state.store.driver_count(),
        deliveries: state.store.delivery_count(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
