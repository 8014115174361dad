//! In-memory ship store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::domain::{NewShip, Ship};
use crate::error::{Result, ShipyardError};
use crate::filter::{PredicateSet, ShipQuery};
use crate::store::ShipStore;

#[derive(Debug, Default)]
struct Catalog {
    ships: BTreeMap<i64, Ship>,
    last_id: i64,
}

/// Ship store kept in process memory. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryShipStore {
    catalog: RwLock<Catalog>,
}

impl InMemoryShipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> ShipyardError {
        ShipyardError::storage("ship catalog lock poisoned")
    }
}

impl ShipStore for InMemoryShipStore {
    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        let mut catalog = self.catalog.write().map_err(|_| Self::poisoned())?;
        catalog.last_id += 1;
        let stored = ship.clone().with_id(catalog.last_id);
        catalog.ships.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: i64) -> Result<Option<Ship>> {
        let catalog = self.catalog.read().map_err(|_| Self::poisoned())?;
        Ok(catalog.ships.get(&id).cloned())
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        let mut catalog = self.catalog.write().map_err(|_| Self::poisoned())?;
        match catalog.ships.get_mut(&ship.id) {
            Some(slot) => {
                *slot = ship.clone();
                Ok(ship.clone())
            }
            None => Err(ShipyardError::NotFound(format!(
                "Ship {} does not exist",
                ship.id
            ))),
        }
    }

    fn delete(&self, id: i64) -> Result<()> {
        let mut catalog = self.catalog.write().map_err(|_| Self::poisoned())?;
        catalog.ships.remove(&id);
        Ok(())
    }

    fn query(&self, query: &ShipQuery) -> Result<Vec<Ship>> {
        let catalog = self.catalog.read().map_err(|_| Self::poisoned())?;
        let mut matching: Vec<&Ship> = catalog
            .ships
            .values()
            .filter(|ship| query.predicates.matches(ship))
            .collect();
        matching.sort_by(|left, right| query.order.compare(left, right));
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count(&self, predicates: &PredicateSet) -> Result<i64> {
        let catalog = self.catalog.read().map_err(|_| Self::poisoned())?;
        let total = catalog
            .ships
            .values()
            .filter(|ship| predicates.matches(ship))
            .count();
        Ok(i64::try_from(total).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryShipStore;
    use crate::domain::{NewShip, ShipType};
    use crate::filter::{Page, Predicate, PredicateSet, ShipOrder, ShipQuery};
    use crate::store::ShipStore;
    use chrono::{TimeZone, Utc};

    fn new_ship(name: &str, crew_size: i32) -> NewShip {
        NewShip {
            name: name.to_string(),
            planet: "Venus".to_string(),
            ship_type: ShipType::Transport,
            prod_date: Utc.with_ymd_and_hms(2990, 1, 1, 0, 0, 0).unwrap(),
            is_used: false,
            speed: 0.4,
            crew_size,
            rating: 1.07,
        }
    }

    #[test]
    fn assigns_increasing_ids_without_reuse() {
        let store = InMemoryShipStore::new();
        let first = store.insert(&new_ship("One", 1)).expect("insert");
        let second = store.insert(&new_ship("Two", 2)).expect("insert");
        store.delete(second.id).expect("delete");
        let third = store.insert(&new_ship("Three", 3)).expect("insert");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
        assert_eq!(store.fetch(2).expect("fetch"), None);
    }

    #[test]
    fn save_replaces_existing_ship() {
        let store = InMemoryShipStore::new();
        let mut ship = store.insert(&new_ship("Old", 5)).expect("insert");
        ship.name = "New".to_string();

        store.save(&ship).expect("save");

        assert_eq!(store.fetch(ship.id).expect("fetch"), Some(ship));
    }

    #[test]
    fn query_orders_filters_and_pages() {
        let store = InMemoryShipStore::new();
        for (name, crew) in [("Delta", 4), ("Alpha", 9), ("Charlie", 1), ("Bravo", 7)] {
            store.insert(&new_ship(name, crew)).expect("insert");
        }
        let mut predicates = PredicateSet::default();
        predicates.push(Predicate::CrewSizeAtLeast(2));
        let query = ShipQuery {
            predicates: predicates.clone(),
            order: ShipOrder::Name,
            page: Page { number: 0, size: 2 },
        };

        let names: Vec<String> = store
            .query(&query)
            .expect("query")
            .into_iter()
            .map(|ship| ship.name)
            .collect();

        assert_eq!(names, vec!["Alpha".to_string(), "Bravo".to_string()]);
        assert_eq!(store.count(&predicates).expect("count"), 3);
    }
}
