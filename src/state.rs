use std::sync::Arc;

use tokio::sync::broadcast;

use crate::engine::assignment::DeliveryAssignmentService;
use crate::models::delivery::Delivery;
use crate::observability::metrics::Metrics;
use crate::store::MemoryStore;

pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub assignments: DeliveryAssignmentService,
    pub delivery_events_tx: broadcast::Sender<Delivery>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize) -> Self {
        let store = Arc::new(MemoryStore::new());
        let metrics = Metrics::new();
        let (delivery_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        let assignments = DeliveryAssignmentService::new(
            store.clone(),
            store.clone(),
            metrics.clone(),
            delivery_events_tx.clone(),
        );

        Self {
            store,
            assignments,
            delivery_events_tx,
            metrics,
        }
    }
}
