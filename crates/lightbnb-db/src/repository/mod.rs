//! # Repository Module
//!
//! Database repository implementations for LightBnB.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Web server handler                                                    │
//! │       │                                                                 │
//! │       │  db.properties().search(&criteria, 10)                         │
//! │       ▼                                                                 │
//! │  PropertyRepository                                                    │
//! │  ├── search(&self, criteria, limit)                                    │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── insert(&self, property)                                           │
//! │       │                                                                 │
//! │       │  SQL + bound parameters                                        │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Lookup by email/id, registration
//! - [`PropertyRepository`](property::PropertyRepository) - Filtered search, insert
//! - [`ReservationRepository`](reservation::ReservationRepository) - Past stays per guest
//! - [`ReviewRepository`](review::ReviewRepository) - Review insert

use std::future::Future;

use lightbnb_core::{NewProperty, Property};

use crate::error::DbResult;

pub mod property;
pub mod reservation;
pub mod review;
pub mod user;

/// Destination for newly listed properties.
///
/// ## Implementations
/// ```text
/// ┌──────────────────────────┬──────────────────────────────────────────┐
/// │ PropertyRepository       │ INSERT INTO properties ... RETURNING     │
/// │ FixturePropertyStore     │ in-memory map, nothing persisted         │
/// └──────────────────────────┴──────────────────────────────────────────┘
/// ```
/// Handlers depend on this trait so a demo deployment can run without
/// writing listings to the database.
pub trait PropertyStore {
    /// Stores a property and returns it with its assigned id.
    fn add_property(
        &self,
        property: NewProperty,
    ) -> impl Future<Output = DbResult<Property>> + Send;
}
