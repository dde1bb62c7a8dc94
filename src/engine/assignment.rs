use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::engine::selection::{least_busy, Candidate};
use crate::models::city::City;
use crate::models::customer::Customer;
use crate::models::delivery::{Delivery, DriverDistance, NewDelivery};
use crate::models::driver::Driver;
use crate::models::restaurant::Restaurant;
use crate::observability::metrics::Metrics;
use crate::store::{DeliveryLedger, DriverDirectory, StoreError};

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("customer and restaurant are located in different cities")]
    CityMismatch,

    #[error("no available driver")]
    NoAvailableDriver,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AssignmentError {
    pub fn outcome(&self) -> &'static str {
        match self {
            AssignmentError::InvalidInput(_) => "invalid_input",
            AssignmentError::CityMismatch => "city_mismatch",
            AssignmentError::NoAvailableDriver => "no_available_driver",
            AssignmentError::Store(_) => "store_error",
        }
    }
}

type SlotKey = (Uuid, DateTime<Utc>);

/// Assigns drivers to new orders and records the resulting deliveries.
///
/// Assignments for the same city and delivery time are serialized, so two
/// concurrent orders can never both claim the same free driver.
pub struct DeliveryAssignmentService {
    directory: Arc<dyn DriverDirectory>,
    ledger: Arc<dyn DeliveryLedger>,
    slots: DashMap<SlotKey, Arc<Mutex<()>>>,
    metrics: Metrics,
    delivery_events_tx: broadcast::Sender<Delivery>,
}

impl DeliveryAssignmentService {
    pub fn new(
        directory: Arc<dyn DriverDirectory>,
        ledger: Arc<dyn DeliveryLedger>,
        metrics: Metrics,
        delivery_events_tx: broadcast::Sender<Delivery>,
    ) -> Self {
        Self {
            directory,
            ledger,
            slots: DashMap::new(),
            metrics,
            delivery_events_tx,
        }
    }

    /// Creates a delivery for the order, or returns `None` when any rule
    /// rejects it. The reason is logged; nothing is persisted on failure.
    pub fn create_order_and_assign_driver(
        &self,
        customer: Option<&Customer>,
        restaurant: Option<&Restaurant>,
        delivery_time: Option<DateTime<Utc>>,
        distance: f64,
    ) -> Option<Delivery> {
        match self.try_create_order_and_assign_driver(customer, restaurant, delivery_time, distance)
        {
            Ok(delivery) => Some(delivery),
            Err(err) => {
                error!(error = %err, "delivery was not created");
                None
            }
        }
    }

    /// Same as [`Self::create_order_and_assign_driver`] but keeps the reason.
    pub fn try_create_order_and_assign_driver(
        &self,
        customer: Option<&Customer>,
        restaurant: Option<&Restaurant>,
        delivery_time: Option<DateTime<Utc>>,
        distance: f64,
    ) -> Result<Delivery, AssignmentError> {
        let start = Instant::now();
        let result = self.assign(customer, restaurant, delivery_time, distance);

        let outcome = match &result {
            Ok(_) => "success",
            Err(err) => err.outcome(),
        };
        self.metrics
            .record_assignment(outcome, start.elapsed().as_secs_f64());

        result
    }

    /// Finds a driver in the restaurant's city with nothing scheduled at
    /// exactly `delivery_time`, preferring the one with the fewest deliveries.
    pub fn find_available_driver(
        &self,
        restaurant: &Restaurant,
        delivery_time: DateTime<Utc>,
    ) -> Result<Driver, AssignmentError> {
        let drivers_in_city = self.directory.drivers_in_city(&restaurant.city)?;

        let mut available = Vec::new();
        for driver in drivers_in_city {
            if driver.city.id != restaurant.city.id {
                warn!(driver_id = %driver.id, "directory returned driver from another city");
                continue;
            }
            if self
                .ledger
                .deliveries_for_driver_at(&driver, delivery_time)?
                .is_empty()
            {
                available.push(driver);
            }
        }

        if available.len() <= 1 {
            return available
                .pop()
                .ok_or(AssignmentError::NoAvailableDriver);
        }

        let mut candidates = Vec::with_capacity(available.len());
        for driver in available {
            let delivery_count = self.ledger.all_deliveries_for(&driver)?.len();
            candidates.push(Candidate {
                driver,
                delivery_count,
            });
        }

        least_busy(candidates).ok_or(AssignmentError::NoAvailableDriver)
    }

    pub fn driver_rank_report(&self) -> Result<Vec<DriverDistance>, StoreError> {
        self.ledger.total_distance_per_driver()
    }

    pub fn driver_rank_report_by_city(
        &self,
        city: &City,
    ) -> Result<Vec<DriverDistance>, StoreError> {
        self.ledger.total_distance_per_driver_in_city(city)
    }

    fn assign(
        &self,
        customer: Option<&Customer>,
        restaurant: Option<&Restaurant>,
        delivery_time: Option<DateTime<Utc>>,
        distance: f64,
    ) -> Result<Delivery, AssignmentError> {
        let (customer, restaurant, delivery_time) = match (customer, restaurant, delivery_time) {
            (Some(customer), Some(restaurant), Some(delivery_time)) => {
                (customer, restaurant, delivery_time)
            }
            _ => {
                return Err(AssignmentError::InvalidInput(
                    "customer, restaurant and delivery time are required".to_string(),
                ));
            }
        };

        if !distance.is_finite() || distance < 0.0 {
            return Err(AssignmentError::InvalidInput(format!(
                "distance must be a non-negative number, got {distance}"
            )));
        }

        if customer.city.id != restaurant.city.id {
            return Err(AssignmentError::CityMismatch);
        }

        let key = (restaurant.city.id, delivery_time);
        let slot = self.slots.entry(key).or_default().value().clone();

        let delivery = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            let result = self.find_available_driver(restaurant, delivery_time).and_then(|driver| {
                self.ledger
                    .save(NewDelivery {
                        driver,
                        restaurant: restaurant.clone(),
                        customer: customer.clone(),
                        delivery_time,
                        distance,
                    })
                    .map_err(AssignmentError::from)
            });
            // Drop the slot once no other caller is waiting on it.
            self.slots
                .remove_if(&key, |_, held| Arc::strong_count(held) == 2);
            result?
        };

        self.metrics.deliveries_recorded_total.inc();
        self.metrics
            .deliveries_by_city_total
            .with_label_values(&[&restaurant.city.name])
            .inc();
        let _ = self.delivery_events_tx.send(delivery.clone());

        info!(
            delivery_id = %delivery.id,
            driver_id = %delivery.driver.id,
            city = %restaurant.city.name,
            delivery_time = %delivery_time,
            "delivery created"
        );

        Ok(delivery)
    }
}
