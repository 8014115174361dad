//! Ship catalog operations.

use std::collections::HashMap;

use chrono::Datelike;
use log::{debug, info};

use crate::domain::{NewShip, Ship, ShipDraft, ShipPatch};
use crate::error::{Result, ShipyardError};
use crate::filter::{ShipFilter, ShipQuery};
use crate::rating::rating;
use crate::store::ShipStore;
use crate::validator::validate;

/// Parse a raw path segment into a ship id.
pub fn parse_ship_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ShipyardError::invalid(format!("Ship id must be an integer: {raw}")))
}

/// Validates, derives, and persists ships through a [`ShipStore`].
#[derive(Debug, Clone)]
pub struct ShipService<S> {
    store: S,
}

impl<S: ShipStore> ShipService<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// List one ordered page of ships matching the request parameters.
    pub fn list(&self, params: &HashMap<String, String>) -> Result<Vec<Ship>> {
        let query = ShipQuery::from_params(params)?;
        debug!(
            "listing ships: {} predicates, order {}, page {}x{}",
            query.predicates.len(),
            query.order.field_name(),
            query.page.number,
            query.page.size
        );
        self.store.query(&query)
    }

    /// Count every ship matching the filter parameters.
    pub fn count(&self, params: &HashMap<String, String>) -> Result<i64> {
        let predicates = ShipFilter::from_params(params)?.predicates();
        debug!("counting ships: {} predicates", predicates.len());
        self.store.count(&predicates)
    }

    /// Validate a candidate, derive its rating, and store it.
    pub fn create(&self, draft: ShipDraft) -> Result<Ship> {
        let ship = self.store.insert(&prepare(draft)?)?;
        info!("created ship {}", ship.id);
        Ok(ship)
    }

    /// Fetch a ship; ids must be positive.
    pub fn get(&self, id: i64) -> Result<Ship> {
        if id <= 0 {
            return Err(ShipyardError::invalid("Ship id must be greater than 0"));
        }
        self.store
            .fetch(id)?
            .ok_or_else(|| ShipyardError::NotFound(format!("Ship {id} does not exist")))
    }

    /// Apply a patch to a stored ship, revalidating the merged result.
    pub fn update(&self, id: i64, patch: ShipPatch) -> Result<Ship> {
        let original = self.get(id)?;
        let merged = patch.merge_into(ShipDraft::from(original));
        let ship = self.store.save(&prepare(merged)?.with_id(id))?;
        info!("updated ship {id}");
        Ok(ship)
    }

    /// Remove a stored ship.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.get(id)?;
        self.store.delete(id)?;
        info!("deleted ship {id}");
        Ok(())
    }
}

/// Turn a candidate into storable values: validate, default, then rate.
fn prepare(draft: ShipDraft) -> Result<NewShip> {
    validate(&draft)?;
    let ship_type = draft.ship_type.ok_or(ShipyardError::MissingField("shipType"))?;
    let (Some(name), Some(planet), Some(prod_date), Some(speed), Some(crew_size)) = (
        draft.name,
        draft.planet,
        draft.prod_date,
        draft.speed,
        draft.crew_size,
    ) else {
        return Err(ShipyardError::invalid("Ship candidate is incomplete"));
    };
    let is_used = draft.is_used.unwrap_or(false);
    Ok(NewShip {
        rating: rating(speed, is_used, prod_date.year()),
        name,
        planet,
        ship_type,
        prod_date,
        is_used,
        speed,
        crew_size,
    })
}
