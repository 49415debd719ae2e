//! # Validation Module
//!
//! Input validation for records and search parameters.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web server                                                   │
//! │  └── Deserialization of form bodies                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, email shape                             │
//! │  └── Ratings, prices, limits, date ranges                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE (users.email)                                   │
//! │  └── Foreign keys, CHECK (rating BETWEEN 1 AND 5)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{NewProperty, NewReservation, NewReview, NewUser};
use crate::{MAX_RATING, MAX_TEXT_LEN, MIN_RATING};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Validates a user's display name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name)
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one '@' with text on both sides
/// - No whitespace
///
/// ## Example
/// ```rust
/// use lightbnb_core::validation::validate_email;
///
/// assert!(validate_email("tristanjacobs@gmail.com").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_text("email", email)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.trim().chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(invalid("must look like name@domain")),
    }
}

/// Validates a password. Only presence is checked here.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a result-size limit.
///
/// ## Rules
/// - Must be positive; there is no upper bound.
pub fn validate_limit(limit: u32) -> ValidationResult<()> {
    if limit == 0 {
        return Err(ValidationError::MustBePositive {
            field: "limit".to_string(),
        });
    }
    Ok(())
}

/// Validates a row id supplied by a caller.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a price or price threshold (cents or dollars).
///
/// ## Example
/// ```rust
/// use lightbnb_core::validation::validate_price;
///
/// assert!(validate_price("cost_per_night", 0).is_ok());
/// assert!(validate_price("cost_per_night", -1).is_err());
/// ```
pub fn validate_price(field: &str, amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a review rating (1 to 5 stars).
pub fn validate_rating(rating: i64) -> ValidationResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING,
            max: MAX_RATING,
        });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a user before insert.
pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    validate_name(&user.name)?;
    validate_email(&user.email)?;
    validate_password(&user.password)
}

/// Validates a property before insert.
pub fn validate_new_property(property: &NewProperty) -> ValidationResult<()> {
    validate_id("owner_id", property.owner_id)?;
    validate_text("title", &property.title)?;
    validate_price("cost_per_night", property.cost_per_night)?;

    for (field, count) in [
        ("parking_spaces", property.parking_spaces),
        ("number_of_bathrooms", property.number_of_bathrooms),
        ("number_of_bedrooms", property.number_of_bedrooms),
    ] {
        if count < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: field.to_string(),
            });
        }
    }

    validate_text("country", &property.country)?;
    validate_text("street", &property.street)?;
    validate_text("city", &property.city)?;
    validate_text("province", &property.province)?;
    validate_text("post_code", &property.post_code)
}

/// Validates a reservation before insert.
pub fn validate_new_reservation(reservation: &NewReservation) -> ValidationResult<()> {
    validate_id("property_id", reservation.property_id)?;
    validate_id("guest_id", reservation.guest_id)?;

    if reservation.end_date <= reservation.start_date {
        return Err(ValidationError::InvalidDateRange);
    }
    Ok(())
}

/// Validates a review before insert.
pub fn validate_new_review(review: &NewReview) -> ValidationResult<()> {
    validate_id("guest_id", review.guest_id)?;
    validate_id("property_id", review.property_id)?;
    validate_id("reservation_id", review.reservation_id)?;
    validate_rating(review.rating)
}

// =============================================================================
// Unit Tests
// =============================================================================
