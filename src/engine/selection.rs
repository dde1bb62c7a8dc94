use crate::models::driver::Driver;

/// An available driver together with their lifetime delivery count.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub driver: Driver,
    pub delivery_count: usize,
}

/// Picks the least busy candidate. Equal counts are resolved by the lowest
/// driver id, independent of the order the directory returned them in.
pub fn least_busy(candidates: Vec<Candidate>) -> Option<Driver> {
    candidates
        .into_iter()
        .min_by(|a, b| {
            a.delivery_count
                .cmp(&b.delivery_count)
                .then_with(|| a.driver.id.cmp(&b.driver.id))
        })
        .map(|candidate| candidate.driver)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{least_busy, Candidate};
    use crate::models::city::City;
    use crate::models::driver::Driver;

    fn candidate(id_seed: u128, delivery_count: usize) -> Candidate {
        Candidate {
            driver: Driver {
                id: Uuid::from_u128(id_seed),
                name: format!("driver-{id_seed}"),
                city: City {
                    id: Uuid::from_u128(100),
                    name: "Jerusalem".to_string(),
                },
            },
            delivery_count,
        }
    }

    #[test]
    fn no_candidates_yields_none() {
        assert!(least_busy(Vec::new()).is_none());
    }

    #[test]
    fn fewest_deliveries_wins() {
        let picked = least_busy(vec![candidate(1, 4), candidate(2, 1), candidate(3, 2)]).unwrap();
        assert_eq!(picked.id, Uuid::from_u128(2));
    }

    #[test]
    fn ties_go_to_lowest_driver_id_regardless_of_order() {
        let forward = least_busy(vec![candidate(7, 0), candidate(3, 0), candidate(9, 1)]).unwrap();
        let reversed = least_busy(vec![candidate(9, 1), candidate(3, 0), candidate(7, 0)]).unwrap();

        assert_eq!(forward.id, Uuid::from_u128(3));
        assert_eq!(reversed.id, Uuid::from_u128(3));
    }
}
