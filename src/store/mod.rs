pub mod memory;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::city::City;
use crate::models::delivery::{Delivery, DriverDistance, NewDelivery};
use crate::models::driver::Driver;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Lookup of the drivers registered in a city.
pub trait DriverDirectory: Send + Sync {
    fn drivers_in_city(&self, city: &City) -> Result<Vec<Driver>, StoreError>;
}

/// Persistence and aggregation of deliveries.
pub trait DeliveryLedger: Send + Sync {
    /// Deliveries of `driver` scheduled at exactly `time`.
    fn deliveries_for_driver_at(
        &self,
        driver: &Driver,
        time: DateTime<Utc>,
    ) -> Result<Vec<Delivery>, StoreError>;

    fn all_deliveries_for(&self, driver: &Driver) -> Result<Vec<Delivery>, StoreError>;

    /// Persists the delivery and assigns its identity.
    fn save(&self, delivery: NewDelivery) -> Result<Delivery, StoreError>;

    /// Summed distance per driver, highest first.
    fn total_distance_per_driver(&self) -> Result<Vec<DriverDistance>, StoreError>;

    /// Same as [`DeliveryLedger::total_distance_per_driver`], restricted to drivers of `city`.
    fn total_distance_per_driver_in_city(
        &self,
        city: &City,
    ) -> Result<Vec<DriverDistance>, StoreError>;
}
