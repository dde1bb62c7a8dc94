use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::customer::Customer;
use crate::models::driver::Driver;
use crate::models::restaurant::Restaurant;

/// A delivery with its driver already assigned, not yet given an identity.
#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub driver: Driver,
    pub restaurant: Restaurant,
    pub customer: Customer,
    pub delivery_time: DateTime<Utc>,
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Delivery {
    pub id: Uuid,
    pub driver: Driver,
    pub restaurant: Restaurant,
    pub customer: Customer,
    pub delivery_time: DateTime<Utc>,
    pub distance: f64,
}

impl Delivery {
    pub fn from_new(id: Uuid, new: NewDelivery) -> Self {
        Self {
            id,
            driver: new.driver,
            restaurant: new.restaurant,
            customer: new.customer,
            delivery_time: new.delivery_time,
            distance: new.distance,
        }
    }
}

/// One row of the driver rank report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverDistance {
    pub driver: Driver,
    pub total_distance: f64,
}
