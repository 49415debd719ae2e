//! # lightbnb-core: Pure Domain Logic for LightBnB
//!
//! Records, validation and the property search query builder, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LightBnB Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Server (consumer)                        │   │
//! │  │    GET /properties ──► search   POST /users ──► add user        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ lightbnb-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  search   │  │ validation│  │   │
//! │  │   │ Property  │  │   Money   │  │ Criteria  │  │   rules   │  │   │
//! │  │   │   User    │  │  (cents)  │  │ SQL + args│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    lightbnb-db (Database Layer)                 │   │
//! │  │         binds parameters, executes, maps rows to records        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (User, Property, Reservation, PropertyReview)
//! - [`money`] - Nightly prices in cents
//! - [`search`] - Filter criteria and the parameterized search query builder
//! - [`error`] - Validation errors
//! - [`validation`] - Input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use lightbnb_core::search::{FilterCriteria, SearchQuery};
//!
//! let criteria = FilterCriteria {
//!     city: Some("van".to_string()),
//!     minimum_rating: Some(4.0),
//!     ..Default::default()
//! };
//!
//! let query = SearchQuery::build(&criteria, 10).unwrap();
//! assert!(query.sql().contains("HAVING"));
//! assert_eq!(query.params().len(), 3); // city, rating, limit
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use search::{FilterCriteria, SearchQuery, SqlValue};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rows returned by searches and reservation listings when no limit is given.
pub const DEFAULT_LIMIT: u32 = 10;

/// Lowest star rating a guest can leave.
pub const MIN_RATING: i64 = 1;

/// Highest star rating a guest can leave.
pub const MAX_RATING: i64 = 5;

/// Upper bound for free-text fields (names, titles, addresses).
pub const MAX_TEXT_LEN: usize = 255;
