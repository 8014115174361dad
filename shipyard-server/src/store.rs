//! PostgreSQL ship store backed by Diesel.

use diesel::pg::Pg;
use diesel::prelude::*;
use shipyard_core::{
    NewShip, Predicate, PredicateSet, Ship, ShipOrder, ShipQuery, ShipStore, ShipyardError,
};

use crate::db::{DbConnection, DbPool};
use crate::models::{ShipRecord, ShipValues};
use crate::schema::ships;

type BoxedShips<'a> = ships::BoxedQuery<'a, Pg>;

/// Ship store persisting to the `ships` table.
#[derive(Clone)]
pub struct DieselShipStore {
    pool: DbPool,
}

impl DieselShipStore {
    /// Wrap a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConnection, ShipyardError> {
        self.pool.get().map_err(|err| {
            log::warn!("ship store connection unavailable: {err}");
            ShipyardError::storage(err)
        })
    }
}

fn query_failed(err: diesel::result::Error) -> ShipyardError {
    log::warn!("ship store query failed: {err}");
    ShipyardError::storage(err)
}

/// Escape `LIKE` wildcards so the value matches literally as a substring.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Restrict the ships table to rows matching every predicate.
///
/// Listing and counting both start from this query.
fn filtered(predicates: &PredicateSet) -> BoxedShips<'static> {
    let mut query = ships::table.into_boxed();
    for predicate in predicates.iter() {
        query = match predicate {
            Predicate::NameContains(part) => {
                query.filter(ships::name.like(contains_pattern(part)).escape('\\'))
            }
            Predicate::PlanetContains(part) => {
                query.filter(ships::planet.like(contains_pattern(part)).escape('\\'))
            }
            Predicate::ShipTypeIs(ship_type) => {
                query.filter(ships::ship_type.eq(ship_type.as_str()))
            }
            Predicate::ProdDateFrom(instant) => {
                query.filter(ships::prod_date.ge(instant.naive_utc()))
            }
            Predicate::ProdDateBefore(instant) => {
                query.filter(ships::prod_date.lt(instant.naive_utc()))
            }
            Predicate::IsUsed(is_used) => query.filter(ships::is_used.eq(*is_used)),
            Predicate::SpeedAtLeast(min) => query.filter(ships::speed.ge(*min)),
            Predicate::SpeedAtMost(max) => query.filter(ships::speed.le(*max)),
            Predicate::CrewSizeAtLeast(min) => query.filter(ships::crew_size.ge(*min)),
            Predicate::CrewSizeAtMost(max) => query.filter(ships::crew_size.le(*max)),
            Predicate::RatingAtLeast(min) => query.filter(ships::rating.ge(*min)),
            Predicate::RatingAtMost(max) => query.filter(ships::rating.le(*max)),
        };
    }
    query
}

fn ordered(query: BoxedShips<'static>, order: ShipOrder) -> BoxedShips<'static> {
    match order {
        ShipOrder::Id => query.order(ships::id.asc()),
        ShipOrder::Name => query.order((ships::name.asc(), ships::id.asc())),
        ShipOrder::Planet => query.order((ships::planet.asc(), ships::id.asc())),
        ShipOrder::Date => query.order((ships::prod_date.asc(), ships::id.asc())),
        ShipOrder::Speed => query.order((ships::speed.asc(), ships::id.asc())),
        ShipOrder::CrewSize => query.order((ships::crew_size.asc(), ships::id.asc())),
        ShipOrder::Rating => query.order((ships::rating.asc(), ships::id.asc())),
    }
}

impl ShipStore for DieselShipStore {
    fn insert(&self, ship: &NewShip) -> Result<Ship, ShipyardError> {
        let mut conn = self.conn()?;
        let record: ShipRecord = diesel::insert_into(ships::table)
            .values(ShipValues::from(ship))
            .returning(ShipRecord::as_returning())
            .get_result(&mut conn)
            .map_err(query_failed)?;
        Ship::try_from(record)
    }

    fn fetch(&self, id: i64) -> Result<Option<Ship>, ShipyardError> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .select(ShipRecord::as_select())
            .first(&mut conn)
            .optional()
            .map_err(query_failed)?
            .map(Ship::try_from)
            .transpose()
    }

    fn save(&self, ship: &Ship) -> Result<Ship, ShipyardError> {
        let mut conn = self.conn()?;
        let record: ShipRecord = diesel::update(ships::table.find(ship.id))
            .set(ShipValues::from(ship))
            .returning(ShipRecord::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(query_failed)?
            .ok_or_else(|| ShipyardError::NotFound(format!("Ship {} does not exist", ship.id)))?;
        Ship::try_from(record)
    }

    fn delete(&self, id: i64) -> Result<(), ShipyardError> {
        let mut conn = self.conn()?;
        diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(query_failed)?;
        Ok(())
    }

    fn query(&self, query: &ShipQuery) -> Result<Vec<Ship>, ShipyardError> {
        let mut conn = self.conn()?;
        let offset = i64::try_from(query.page.offset()).unwrap_or(i64::MAX);
        let limit = i64::try_from(query.page.limit()).unwrap_or(i64::MAX);
        let records: Vec<ShipRecord> = ordered(filtered(&query.predicates), query.order)
            .select(ShipRecord::as_select())
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .map_err(query_failed)?;
        records.into_iter().map(Ship::try_from).collect()
    }

    fn count(&self, predicates: &PredicateSet) -> Result<i64, ShipyardError> {
        let mut conn = self.conn()?;
        filtered(predicates)
            .count()
            .get_result(&mut conn)
            .map_err(query_failed)
    }
}
