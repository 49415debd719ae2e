//! # Error Types
//!
//! Validation errors raised before anything reaches the database.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lightbnb-core (this file)                                             │
//! │  └── ValidationError  - Bad input records or search criteria           │
//! │                                                                         │
//! │  lightbnb-db (separate crate)                                          │
//! │  └── DbError          - Query execution failures                       │
//! │                         (wraps ValidationError)                        │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → web server → HTTP response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., an email without '@').
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A lower bound exceeds its upper bound.
    ///
    /// ## When This Occurs
    /// `minimum_price_per_night: 300, maximum_price_per_night: 100` can
    /// never match a row; rejecting it tells the guest why the search is
    /// empty.
    #[error("{lower} ({min}) must not exceed {upper} ({max})")]
    InvertedRange {
        lower: String,
        upper: String,
        min: i64,
        max: i64,
    },

    /// End date is not after start date.
    #[error("end_date must be after start_date")]
    InvalidDateRange,
}

// =============================================================================
// Unit Tests
// =============================================================================
