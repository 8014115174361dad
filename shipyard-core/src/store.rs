//! Persistence abstraction for ships.

use std::sync::Arc;

use crate::domain::{NewShip, Ship};
use crate::error::Result;
use crate::filter::{PredicateSet, ShipQuery};

/// Durable ship storage consumed by [`crate::ShipService`].
///
/// Each call is one unit of work; concurrent callers get whatever isolation
/// the implementation provides.
#[cfg_attr(test, mockall::automock)]
pub trait ShipStore {
    /// Persist a new ship and return it with its assigned id.
    fn insert(&self, ship: &NewShip) -> Result<Ship>;
    /// Fetch a ship by id.
    fn fetch(&self, id: i64) -> Result<Option<Ship>>;
    /// Overwrite an existing ship and return the stored value.
    fn save(&self, ship: &Ship) -> Result<Ship>;
    /// Remove a ship by id.
    fn delete(&self, id: i64) -> Result<()>;
    /// Return the ordered page of ships matching the query predicates.
    fn query(&self, query: &ShipQuery) -> Result<Vec<Ship>>;
    /// Count every ship matching the predicates.
    fn count(&self, predicates: &PredicateSet) -> Result<i64>;
}

impl<T: ShipStore + ?Sized> ShipStore for Arc<T> {
    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        (**self).insert(ship)
    }

    fn fetch(&self, id: i64) -> Result<Option<Ship>> {
        (**self).fetch(id)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        (**self).save(ship)
    }

    fn delete(&self, id: i64) -> Result<()> {
        (**self).delete(id)
    }

    fn query(&self, query: &ShipQuery) -> Result<Vec<Ship>> {
        (**self).query(query)
    }

    fn count(&self, predicates: &PredicateSet) -> Result<i64> {
        (**self).count(predicates)
    }
}
