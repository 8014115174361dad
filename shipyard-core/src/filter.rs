//! Translation of list and count request parameters into typed queries.
//!
//! Request parameters arrive as a string map. They are parsed exactly once
//! into a [`ShipFilter`] (plus ordering and paging for listings), and the
//! filter is lowered into a [`PredicateSet`]. Listing and counting both
//! consume the same predicate set, so the two can never disagree about which
//! ships match.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::{Ship, ShipType};
use crate::error::{Result, ShipyardError};

/// Page number used when `pageNumber` is absent.
pub const DEFAULT_PAGE_NUMBER: u32 = 0;
/// Page size used when `pageSize` is absent.
pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Recognised filter options, each parsed into its target type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipFilter {
    /// Substring the name must contain.
    pub name: Option<String>,
    /// Substring the planet must contain.
    pub planet: Option<String>,
    /// Exact ship type.
    pub ship_type: Option<ShipType>,
    /// Inclusive lower bound on the production date.
    pub after: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the production date.
    pub before: Option<DateTime<Utc>>,
    /// Exact used flag.
    pub is_used: Option<bool>,
    /// Inclusive lower bound on speed.
    pub min_speed: Option<f64>,
    /// Inclusive upper bound on speed.
    pub max_speed: Option<f64>,
    /// Inclusive lower bound on crew size.
    pub min_crew_size: Option<i32>,
    /// Inclusive upper bound on crew size.
    pub max_crew_size: Option<i32>,
    /// Inclusive lower bound on rating.
    pub min_rating: Option<f64>,
    /// Inclusive upper bound on rating.
    pub max_rating: Option<f64>,
}

impl ShipFilter {
    /// Parse the recognised keys of `params`; unknown keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| params.get(key).map(String::as_str);
        Ok(Self {
            name: get("name").map(str::to_string),
            planet: get("planet").map(str::to_string),
            ship_type: get("shipType").map(ShipType::from_str).transpose()?,
            after: get("after").map(|raw| parse_instant("after", raw)).transpose()?,
            before: get("before").map(|raw| parse_instant("before", raw)).transpose()?,
            is_used: get("isUsed").map(parse_flag),
            min_speed: parse_number(params, "minSpeed")?,
            max_speed: parse_number(params, "maxSpeed")?,
            min_crew_size: parse_number(params, "minCrewSize")?,
            max_crew_size: parse_number(params, "maxCrewSize")?,
            min_rating: parse_number(params, "minRating")?,
            max_rating: parse_number(params, "maxRating")?,
        })
    }

    /// Lower this filter into the predicate set shared by list and count.
    pub fn predicates(&self) -> PredicateSet {
        let mut set = PredicateSet::default();
        if let Some(name) = &self.name {
            set.push(Predicate::NameContains(name.clone()));
        }
        if let Some(planet) = &self.planet {
            set.push(Predicate::PlanetContains(planet.clone()));
        }
        if let Some(ship_type) = self.ship_type {
            set.push(Predicate::ShipTypeIs(ship_type));
        }
        if let Some(after) = self.after {
            set.push(Predicate::ProdDateFrom(after));
        }
        if let Some(before) = self.before {
            set.push(Predicate::ProdDateBefore(before));
        }
        if let Some(is_used) = self.is_used {
            set.push(Predicate::IsUsed(is_used));
        }
        if let Some(min) = self.min_speed {
            set.push(Predicate::SpeedAtLeast(min));
        }
        if let Some(max) = self.max_speed {
            set.push(Predicate::SpeedAtMost(max));
        }
        if let Some(min) = self.min_crew_size {
            set.push(Predicate::CrewSizeAtLeast(min));
        }
        if let Some(max) = self.max_crew_size {
            set.push(Predicate::CrewSizeAtMost(max));
        }
        if let Some(min) = self.min_rating {
            set.push(Predicate::RatingAtLeast(min));
        }
        if let Some(max) = self.max_rating {
            set.push(Predicate::RatingAtMost(max));
        }
        set
    }
}

fn parse_instant(key: &str, raw: &str) -> Result<DateTime<Utc>> {
    let millis: i64 = raw
        .parse()
        .map_err(|_| ShipyardError::invalid(format!("{key} must be epoch milliseconds")))?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| ShipyardError::invalid(format!("{key} is out of range")))
}

fn parse_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

fn parse_number<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Result<Option<T>> {
    params
        .get(key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| ShipyardError::invalid(format!("{key} must be a number: {raw}")))
        })
        .transpose()
}

/// A single typed condition on a ship field.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Name contains the substring (case-sensitive).
    NameContains(String),
    /// Planet contains the substring (case-sensitive).
    PlanetContains(String),
    /// Ship type equals the value.
    ShipTypeIs(ShipType),
    /// Production date is at or after the instant.
    ProdDateFrom(DateTime<Utc>),
    /// Production date is strictly before the instant.
    ProdDateBefore(DateTime<Utc>),
    /// Used flag equals the value.
    IsUsed(bool),
    /// Speed is at least the value.
    SpeedAtLeast(f64),
    /// Speed is at most the value.
    SpeedAtMost(f64),
    /// Crew size is at least the value.
    CrewSizeAtLeast(i32),
    /// Crew size is at most the value.
    CrewSizeAtMost(i32),
    /// Rating is at least the value.
    RatingAtLeast(f64),
    /// Rating is at most the value.
    RatingAtMost(f64),
}

impl Predicate {
    /// Evaluate the condition against a ship.
    pub fn matches(&self, ship: &Ship) -> bool {
        match self {
            Predicate::NameContains(part) => ship.name.contains(part.as_str()),
            Predicate::PlanetContains(part) => ship.planet.contains(part.as_str()),
            Predicate::ShipTypeIs(ship_type) => ship.ship_type == *ship_type,
            Predicate::ProdDateFrom(instant) => ship.prod_date >= *instant,
            Predicate::ProdDateBefore(instant) => ship.prod_date < *instant,
            Predicate::IsUsed(is_used) => ship.is_used == *is_used,
            Predicate::SpeedAtLeast(min) => ship.speed >= *min,
            Predicate::SpeedAtMost(max) => ship.speed <= *max,
            Predicate::CrewSizeAtLeast(min) => ship.crew_size >= *min,
            Predicate::CrewSizeAtMost(max) => ship.crew_size <= *max,
            Predicate::RatingAtLeast(min) => ship.rating >= *min,
            Predicate::RatingAtMost(max) => ship.rating <= *max,
        }
    }
}

/// Conjunction of predicates; an empty set matches every ship.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    /// Add a condition to the conjunction.
    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Iterate over the conditions.
    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter()
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether the set has no conditions.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Whether the ship satisfies every condition.
    pub fn matches(&self, ship: &Ship) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(ship))
    }
}

/// Sortable ship fields. Sorting is always ascending with ties broken by id.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ShipOrder {
    /// Order by id.
    #[default]
    Id,
    /// Order by name.
    Name,
    /// Order by planet.
    Planet,
    /// Order by production date.
    Date,
    /// Order by speed.
    Speed,
    /// Order by crew size.
    CrewSize,
    /// Order by rating.
    Rating,
}

impl ShipOrder {
    /// Stored column name of the sort field.
    pub fn field_name(&self) -> &'static str {
        match self {
            ShipOrder::Id => "id",
            ShipOrder::Name => "name",
            ShipOrder::Planet => "planet",
            ShipOrder::Date => "prodDate",
            ShipOrder::Speed => "speed",
            ShipOrder::CrewSize => "crewSize",
            ShipOrder::Rating => "rating",
        }
    }

    /// Compare two ships by this field, falling back to id.
    pub fn compare(&self, left: &Ship, right: &Ship) -> std::cmp::Ordering {
        let primary = match self {
            ShipOrder::Id => left.id.cmp(&right.id),
            ShipOrder::Name => left.name.cmp(&right.name),
            ShipOrder::Planet => left.planet.cmp(&right.planet),
            ShipOrder::Date => left.prod_date.cmp(&right.prod_date),
            ShipOrder::Speed => left.speed.total_cmp(&right.speed),
            ShipOrder::CrewSize => left.crew_size.cmp(&right.crew_size),
            ShipOrder::Rating => left.rating.total_cmp(&right.rating),
        };
        primary.then_with(|| left.id.cmp(&right.id))
    }
}

impl FromStr for ShipOrder {
    type Err = ShipyardError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "ID" => Ok(ShipOrder::Id),
            "NAME" => Ok(ShipOrder::Name),
            "PLANET" => Ok(ShipOrder::Planet),
            "DATE" => Ok(ShipOrder::Date),
            "SPEED" => Ok(ShipOrder::Speed),
            "CREW_SIZE" => Ok(ShipOrder::CrewSize),
            "RATING" => Ok(ShipOrder::Rating),
            other => Err(ShipyardError::invalid(format!("unknown order: {other}"))),
        }
    }
}

/// Page window over an ordered result set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    /// Zero-based page index.
    pub number: u32,
    /// Maximum ships per page.
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Number of ships skipped before the window.
    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }

    /// Maximum number of ships in the window.
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

/// Fully parsed listing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipQuery {
    /// Conditions every listed ship satisfies.
    pub predicates: PredicateSet,
    /// Sort field.
    pub order: ShipOrder,
    /// Page window.
    pub page: Page,
}

impl ShipQuery {
    /// Parse filter, `order`, `pageNumber`, and `pageSize` from `params`.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let filter = ShipFilter::from_params(params)?;
        let order = params
            .get("order")
            .map(|raw| raw.parse::<ShipOrder>())
            .transpose()?
            .unwrap_or_default();
        let page = Page {
            number: parse_number(params, "pageNumber")?.unwrap_or(DEFAULT_PAGE_NUMBER),
            size: parse_number(params, "pageSize")?.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        Ok(Self {
            predicates: filter.predicates(),
            order,
            page,
        })
    }
}
