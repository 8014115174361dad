#![deny(missing_docs)]
//! Shipyard core library.
//!
//! This crate contains the ship catalog domain: validation, rating
//! derivation, filter parsing, the storage abstraction, and the service that
//! ties them together. It knows nothing about HTTP or SQL.

pub mod domain;
pub mod error;
pub mod filter;
pub mod memory;
pub mod rating;
pub mod service;
pub mod store;
pub mod validator;

pub use domain::{NewShip, Ship, ShipDraft, ShipPatch, ShipType};
pub use error::{Result, ShipyardError};
pub use filter::{Page, Predicate, PredicateSet, ShipFilter, ShipOrder, ShipQuery};
pub use memory::InMemoryShipStore;
pub use rating::{rating, round_half_even};
pub use service::{ShipService, parse_ship_id};
pub use store::ShipStore;
pub use validator::validate;
