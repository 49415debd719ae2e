//! # lightbnb-db: Data Access Layer for LightBnB
//!
//! This crate owns every database interaction of the LightBnB rental
//! service. It uses SQLite with sqlx for async operations; query text for
//! property search comes from `lightbnb-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LightBnB Data Flow                               │
//! │                                                                         │
//! │  Route handler (GET /properties?city=van&minimum_rating=4)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    lightbnb-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ PropertyRepo  │    │ 001_initial_ │  │   │
//! │  │   │ DbConfig      │    │ ReservationRe │    │   schema.sql │  │   │
//! │  │   │               │    │ ReviewRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────────────────────────────────────────────┐    │   │
//! │  │   │ fixtures.rs: JSON fixture loading + in-memory store  │    │   │
//! │  │   └───────────────────────────────────────────────────────┘    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./lightbnb.db  (LIGHTBNB_DATABASE_PATH)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repositories (user, property, reservation, review)
//! - [`fixtures`] - JSON fixtures and the fixture-backed property store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lightbnb_core::FilterCriteria;
//! use lightbnb_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let user = db.users().get_by_email("tristanjacobs@gmail.com").await?;
//!
//! let criteria = FilterCriteria {
//!     city: Some("vancouver".to_string()),
//!     minimum_rating: Some(4.0),
//!     ..Default::default()
//! };
//! let listings = db.properties().search(&criteria, 10).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fixtures;
pub mod migrations;
pub mod pool;
pub mod repository;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, DbError, DbResult};
pub use fixtures::{FixturePropertyStore, FixtureSummary, Fixtures};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::property::PropertyRepository;
pub use repository::reservation::ReservationRepository;
pub use repository::review::ReviewRepository;
pub use repository::user::UserRepository;
pub use repository::PropertyStore;
