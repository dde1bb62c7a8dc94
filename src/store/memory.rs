use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::models::city::City;
use crate::models::customer::Customer;
use crate::models::delivery::{Delivery, DriverDistance, NewDelivery};
use crate::models::driver::Driver;
use crate::models::restaurant::Restaurant;
use crate::store::{DeliveryLedger, DriverDirectory, StoreError};

/// In-process store backing every repository the service needs.
#[derive(Default)]
pub struct MemoryStore {
    cities: DashMap<Uuid, City>,
    city_names: DashMap<String, Uuid>,
    customers: DashMap<Uuid, Customer>,
    restaurants: DashMap<Uuid, Restaurant>,
    drivers: DashMap<Uuid, Driver>,
    deliveries: DashMap<Uuid, Delivery>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_city(&self, name: &str) -> Result<City, StoreError> {
        match self.city_names.entry(name.to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "city {name} already exists"
            ))),
            Entry::Vacant(slot) => {
                let city = City {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                };
                self.cities.insert(city.id, city.clone());
                slot.insert(city.id);
                Ok(city)
            }
        }
    }

    pub fn city(&self, id: Uuid) -> Option<City> {
        self.cities.get(&id).map(|entry| entry.value().clone())
    }

    pub fn city_by_name(&self, name: &str) -> Option<City> {
        let id = *self.city_names.get(name)?;
        self.city(id)
    }

    pub fn cities(&self) -> Vec<City> {
        let mut cities: Vec<City> = self
            .cities
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        cities
    }

    pub fn create_customer(&self, name: &str, city: City, description: &str) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city,
            description: description.to_string(),
        };
        self.customers.insert(customer.id, customer.clone());
        customer
    }

    pub fn customer(&self, id: Uuid) -> Option<Customer> {
        self.customers.get(&id).map(|entry| entry.value().clone())
    }

    pub fn customer_by_name(&self, name: &str) -> Option<Customer> {
        self.customers
            .iter()
            .find(|entry| entry.value().name == name)
            .map(|entry| entry.value().clone())
    }

    pub fn customers(&self) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self
            .customers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        customers
    }

    pub fn create_restaurant(&self, name: &str, city: City, description: &str) -> Restaurant {
        let restaurant = Restaurant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city,
            description: description.to_string(),
        };
        self.restaurants.insert(restaurant.id, restaurant.clone());
        restaurant
    }

    pub fn restaurant(&self, id: Uuid) -> Option<Restaurant> {
        self.restaurants.get(&id).map(|entry| entry.value().clone())
    }

    pub fn restaurant_by_name(&self, name: &str) -> Option<Restaurant> {
        self.restaurants
            .iter()
            .find(|entry| entry.value().name == name)
            .map(|entry| entry.value().clone())
    }

    pub fn restaurants(&self) -> Vec<Restaurant> {
        let mut restaurants: Vec<Restaurant> = self
            .restaurants
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        restaurants.sort_by(|a, b| a.name.cmp(&b.name));
        restaurants
    }

    pub fn create_driver(&self, name: &str, city: City) -> Driver {
        let driver = Driver {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city,
        };
        self.drivers.insert(driver.id, driver.clone());
        driver
    }

    pub fn driver(&self, id: Uuid) -> Option<Driver> {
        self.drivers.get(&id).map(|entry| entry.value().clone())
    }

    pub fn driver_by_name(&self, name: &str) -> Option<Driver> {
        self.drivers
            .iter()
            .find(|entry| entry.value().name == name)
            .map(|entry| entry.value().clone())
    }

    pub fn drivers(&self) -> Vec<Driver> {
        let mut drivers: Vec<Driver> = self
            .drivers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        drivers.sort_by(|a, b| a.name.cmp(&b.name));
        drivers
    }

    pub fn delivery(&self, id: Uuid) -> Option<Delivery> {
        self.deliveries.get(&id).map(|entry| entry.value().clone())
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn restaurant_count(&self) -> usize {
        self.restaurants.len()
    }

    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.len()
    }

    fn deliveries_matching<F>(&self, predicate: F) -> Vec<Delivery>
    where
        F: Fn(&Delivery) -> bool,
    {
        let mut deliveries: Vec<Delivery> = self
            .deliveries
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        deliveries.sort_by(|a, b| a.delivery_time.cmp(&b.delivery_time));
        deliveries
    }
}

impl DriverDirectory for MemoryStore {
    fn drivers_in_city(&self, city: &City) -> Result<Vec<Driver>, StoreError> {
        Ok(self
            .drivers
            .iter()
            .filter(|entry| entry.value().city.id == city.id)
            .map(|entry| entry.value().clone())
            .collect())
    }
}

impl DeliveryLedger for MemoryStore {
    fn deliveries_for_driver_at(
        &self,
        driver: &Driver,
        time: DateTime<Utc>,
    ) -> Result<Vec<Delivery>, StoreError> {
        Ok(self.deliveries_matching(|delivery| {
            delivery.driver.id == driver.id && delivery.delivery_time == time
        }))
    }

    fn all_deliveries_for(&self, driver: &Driver) -> Result<Vec<Delivery>, StoreError> {
        Ok(self.deliveries_matching(|delivery| delivery.driver.id == driver.id))
    }

    fn save(&self, delivery: NewDelivery) -> Result<Delivery, StoreError> {
        if !self.drivers.contains_key(&delivery.driver.id) {
            return Err(StoreError::NotFound(format!(
                "driver {} not found",
                delivery.driver.id
            )));
        }

        let delivery = Delivery::from_new(Uuid::new_v4(), delivery);
        self.deliveries.insert(delivery.id, delivery.clone());
        Ok(delivery)
    }

    fn total_distance_per_driver(&self) -> Result<Vec<DriverDistance>, StoreError> {
        let deliveries = self.deliveries_matching(|_| true);
        Ok(rank_by_distance(&deliveries))
    }

    fn total_distance_per_driver_in_city(
        &self,
        city: &City,
    ) -> Result<Vec<DriverDistance>, StoreError> {
        let deliveries = self.deliveries_matching(|delivery| delivery.driver.city.id == city.id);
        Ok(rank_by_distance(&deliveries))
    }
}

/// Sums distance per driver and orders the rows by total, highest first.
/// Equal totals fall back to driver id so the report is stable.
pub fn rank_by_distance(deliveries: &[Delivery]) -> Vec<DriverDistance> {
    let mut totals: HashMap<Uuid, DriverDistance> = HashMap::new();

    for delivery in deliveries {
        totals
            .entry(delivery.driver.id)
            .or_insert_with(|| DriverDistance {
                driver: delivery.driver.clone(),
                total_distance: 0.0,
            })
            .total_distance += delivery.distance;
    }

    let mut rows: Vec<DriverDistance> = totals.into_values().collect();
    rows.sort_by(|a, b| {
        b.total_distance
            .total_cmp(&a.total_distance)
            .then_with(|| a.driver.id.cmp(&b.driver.id))
    });
    rows
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::MemoryStore;
    use crate::models::delivery::NewDelivery;
    use crate::store::{DeliveryLedger, DriverDirectory, StoreError};

    fn deliver(store: &MemoryStore, driver_name: &str, hour: u32, distance: f64) {
        let driver = store.driver_by_name(driver_name).unwrap();
        let restaurant = store.restaurants().into_iter().next().unwrap();
        let customer = store.customers().into_iter().next().unwrap();
        store
            .save(NewDelivery {
                driver,
                restaurant,
                customer,
                delivery_time: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
                distance,
            })
            .unwrap();
    }

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        let haifa = store.create_city("Haifa").unwrap();
        let eilat = store.create_city("Eilat").unwrap();
        store.create_driver("Noa", haifa.clone());
        store.create_driver("Ofri", haifa.clone());
        store.create_driver("Lior", eilat);
        store.create_customer("Chopin", haifa.clone(), "pianist");
        store.create_restaurant("falafel", haifa, "street food");
        store
    }

    #[test]
    fn duplicate_city_name_is_rejected() {
        let store = store();
        let result = store.create_city("Haifa");
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.city_count(), 2);
    }

    #[test]
    fn drivers_in_city_only_returns_that_city() {
        let store = store();
        let haifa = store.city_by_name("Haifa").unwrap();

        let mut names: Vec<String> = store
            .drivers_in_city(&haifa)
            .unwrap()
            .into_iter()
            .map(|driver| driver.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["Noa", "Ofri"]);
    }

    #[test]
    fn deliveries_at_time_match_exact_timestamp_only() {
        let store = store();
        deliver(&store, "Noa", 12, 3.0);
        let noa = store.driver_by_name("Noa").unwrap();

        let exact = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let a_second_later = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 1).unwrap();

        assert_eq!(store.deliveries_for_driver_at(&noa, exact).unwrap().len(), 1);
        assert!(store
            .deliveries_for_driver_at(&noa, a_second_later)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn rank_report_sums_and_sorts_descending() {
        let store = store();
        deliver(&store, "Noa", 9, 4.0);
        deliver(&store, "Noa", 10, 5.0);
        deliver(&store, "Ofri", 9, 12.5);

        let report = store.total_distance_per_driver().unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].driver.name, "Ofri");
        assert_eq!(report[0].total_distance, 12.5);
        assert_eq!(report[1].driver.name, "Noa");
        assert_eq!(report[1].total_distance, 9.0);
    }

    #[test]
    fn rank_report_by_city_skips_other_cities() {
        let store = store();
        deliver(&store, "Noa", 9, 4.0);
        deliver(&store, "Lior", 9, 40.0);

        let haifa = store.city_by_name("Haifa").unwrap();
        let report = store.total_distance_per_driver_in_city(&haifa).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].driver.name, "Noa");
    }

    #[test]
    fn save_rejects_unknown_driver() {
        let store = store();
        let mut driver = store.driver_by_name("Noa").unwrap();
        driver.id = uuid::Uuid::nil();

        let result = store.save(NewDelivery {
            driver,
            restaurant: store.restaurants().remove(0),
            customer: store.customers().remove(0),
            delivery_time: Utc::now(),
            distance: 1.0,
        });

        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
