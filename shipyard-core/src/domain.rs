//! Domain entities for Shipyard.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Result, ShipyardError};

/// Role a ship was built for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    /// Cargo and passenger transport.
    Transport,
    /// Armed military vessel.
    Military,
    /// Trading vessel.
    Merchant,
}

impl ShipType {
    /// Stored and serialized name of the ship type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = ShipyardError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "TRANSPORT" => Ok(ShipType::Transport),
            "MILITARY" => Ok(ShipType::Military),
            "MERCHANT" => Ok(ShipType::Merchant),
            other => Err(ShipyardError::invalid(format!("unknown ship type: {other}"))),
        }
    }
}

/// A ship stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Server-assigned identifier.
    pub id: i64,
    /// Ship name, 1 to 50 characters.
    pub name: String,
    /// Home planet, 1 to 50 characters.
    pub planet: String,
    /// Ship role.
    pub ship_type: ShipType,
    /// Production date, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub prod_date: DateTime<Utc>,
    /// Whether the ship was bought second-hand.
    pub is_used: bool,
    /// Maximum speed as a fraction of light speed.
    pub speed: f64,
    /// Number of crew members.
    pub crew_size: i32,
    /// Derived rating; never accepted from clients.
    pub rating: f64,
}

/// Fully validated ship values that have not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship role.
    pub ship_type: ShipType,
    /// Production date.
    pub prod_date: DateTime<Utc>,
    /// Whether the ship is used.
    pub is_used: bool,
    /// Maximum speed.
    pub speed: f64,
    /// Number of crew members.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl NewShip {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: i64) -> Ship {
        Ship {
            id,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            is_used: self.is_used,
            speed: self.speed,
            crew_size: self.crew_size,
            rating: self.rating,
        }
    }
}

/// Candidate ship submitted for creation.
///
/// `id` and `rating` are not part of the candidate, so any client-supplied
/// values for them are dropped while deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipDraft {
    /// Ship name.
    #[serde(default)]
    pub name: Option<String>,
    /// Home planet.
    #[serde(default)]
    pub planet: Option<String>,
    /// Ship role.
    #[serde(default)]
    pub ship_type: Option<ShipType>,
    /// Production date as epoch milliseconds.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<DateTime<Utc>>,
    /// Whether the ship is used; defaults to false on create.
    #[serde(default, alias = "used")]
    pub is_used: Option<bool>,
    /// Maximum speed.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Number of crew members.
    #[serde(default)]
    pub crew_size: Option<i32>,
}

impl From<Ship> for ShipDraft {
    fn from(ship: Ship) -> Self {
        Self {
            name: Some(ship.name),
            planet: Some(ship.planet),
            ship_type: Some(ship.ship_type),
            prod_date: Some(ship.prod_date),
            is_used: Some(ship.is_used),
            speed: Some(ship.speed),
            crew_size: Some(ship.crew_size),
        }
    }
}

/// Partial update for a stored ship. Absent and `null` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipPatch {
    /// New ship name.
    #[serde(default)]
    pub name: Option<String>,
    /// New home planet.
    #[serde(default)]
    pub planet: Option<String>,
    /// New ship role.
    #[serde(default)]
    pub ship_type: Option<ShipType>,
    /// New production date as epoch milliseconds.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<DateTime<Utc>>,
    /// New used flag.
    #[serde(default, alias = "used")]
    pub is_used: Option<bool>,
    /// New maximum speed.
    #[serde(default)]
    pub speed: Option<f64>,
    /// New crew size.
    #[serde(default)]
    pub crew_size: Option<i32>,
}

impl ShipPatch {
    /// Overwrite every field of `draft` that this patch provides.
    pub fn merge_into(self, mut draft: ShipDraft) -> ShipDraft {
        if self.name.is_some() {
            draft.name = self.name;
        }
        if self.planet.is_some() {
            draft.planet = self.planet;
        }
        if self.ship_type.is_some() {
            draft.ship_type = self.ship_type;
        }
        if self.prod_date.is_some() {
            draft.prod_date = self.prod_date;
        }
        if self.is_used.is_some() {
            draft.is_used = self.is_used;
        }
        if self.speed.is_some() {
            draft.speed = self.speed;
        }
        if self.crew_size.is_some() {
            draft.crew_size = self.crew_size;
        }
        draft
    }
}
