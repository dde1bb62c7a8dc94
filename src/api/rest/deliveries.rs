use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::delivery::Delivery;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/deliveries", post(create_delivery))
        .route("/deliveries/:id", get(get_delivery))
}

/// Unknown customer or restaurant ids are treated the same as missing ones.
#[derive(Deserialize)]
pub struct CreateDeliveryRequest {
    pub customer_id: Option<Uuid>,
    pub restaurant_id: Option<Uuid>,
    pub delivery_time: Option<DateTime<Utc>>,
    pub distance: f64,
}

async fn create_delivery(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDeliveryRequest>,
) -> Result<Json<Delivery>, AppError> {
    // Assignment may wait on the slot lock for its city and time.
    let delivery = tokio::task::spawn_blocking(move || {
        let customer = payload.customer_id.and_then(|id| state.store.customer(id));
        let restaurant = payload
            .restaurant_id
            .and_then(|id| state.store.restaurant(id));

        state.assignments.try_create_order_and_assign_driver(
            customer.as_ref(),
            restaurant.as_ref(),
            payload.delivery_time,
            payload.distance,
        )
    })
    .await
    .map_err(|err| AppError::Internal(format!("assignment task failed: {err}")))?
    .inspect_err(|err| warn!(error = %err, "delivery was not created"))?;

    Ok(Json(delivery))
}

async fn get_delivery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = state
        .store
        .delivery(id)
        .ok_or_else(|| AppError::NotFound(format!("delivery {} not found", id)))?;

    Ok(Json(delivery))
}
