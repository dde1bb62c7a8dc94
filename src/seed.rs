use tracing::info;

use crate::store::{MemoryStore, StoreError};

/// Loads the reference data set: four cities with their drivers, customers
/// and restaurants.
pub fn demo_data(store: &MemoryStore) -> Result<(), StoreError> {
    let jerusalem = store.create_city("Jerusalem")?;
    let tel_aviv = store.create_city("Tel-Aviv")?;
    let beer_sheva = store.create_city("Beer-Sheva")?;
    let haifa = store.create_city("Haifa")?;

    let drivers = [
        ("Mary", &tel_aviv),
        ("Patricia", &tel_aviv),
        ("Jennifer", &haifa),
        ("James", &beer_sheva),
        ("John", &beer_sheva),
        ("Robert", &jerusalem),
        ("David", &jerusalem),
        ("Daniel", &tel_aviv),
        ("Noa", &haifa),
        ("Ofri", &haifa),
        ("Neta", &jerusalem),
    ];
    for (name, city) in drivers {
        store.create_driver(name, city.clone());
    }

    let customers = [
        ("Beethoven", &tel_aviv, "Ludwig van Beethoven"),
        ("Mozart", &jerusalem, "Wolfgang Amadeus Mozart"),
        ("Chopin", &haifa, "Frédéric François Chopin"),
        ("Rachmaninoff", &tel_aviv, "Sergei Rachmaninoff"),
        ("Bach", &tel_aviv, "Johann Sebastian Bach"),
    ];
    for (name, city, description) in customers {
        store.create_customer(name, city.clone(), description);
    }

    let restaurants = [
        ("meat", &jerusalem, "All meat restaurant"),
        ("vegan", &tel_aviv, "Only vegan"),
        ("cafe", &tel_aviv, "Coffee shop"),
        ("chinese", &tel_aviv, "chinese restaurant"),
        ("mexican", &tel_aviv, "mexican restaurant"),
    ];
    for (name, city, description) in restaurants {
        store.create_restaurant(name, city.clone(), description);
    }

    info!(
        cities = store.city_count(),
        drivers = store.driver_count(),
        customers = store.customer_count(),
        restaurants = store.restaurant_count(),
        "demo data loaded"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::demo_data;
    use crate::store::{DriverDirectory, MemoryStore};

    #[test]
    fn loads_reference_data() {
        let store = MemoryStore::new();
        demo_data(&store).unwrap();

        assert_eq!(store.city_count(), 4);
        assert_eq!(store.driver_count(), 11);
        assert_eq!(store.customer_count(), 5);
        assert_eq!(store.restaurant_count(), 5);

        let beer_sheva = store.city_by_name("Beer-Sheva").unwrap();
        assert_eq!(store.drivers_in_city(&beer_sheva).unwrap().len(), 2);
    }

    #[test]
    fn loading_twice_conflicts_on_city_names() {
        let store = MemoryStore::new();
        demo_data(&store).unwrap();
        assert!(demo_data(&store).is_err());
    }
}
