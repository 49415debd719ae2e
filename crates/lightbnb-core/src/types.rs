//! # Domain Types
//!
//! Records stored in and returned from the LightBnB database.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Property     │   │  Reservation    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  owner_id       │◄──│  property_id    │       │
//! │  │  name           │   │  city           │   │  guest_id ──────┼──► User
//! │  │  email (unique) │   │  cost_per_night │   │  start_date     │       │
//! │  │  password       │   │  (cents)        │   │  end_date       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                 ▲                                       │
//! │                        ┌────────┴────────┐                              │
//! │                        │ PropertyReview  │                              │
//! │                        │  rating (1-5)   │                              │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  Read models: PropertyListing (Property + average_rating)              │
//! │               GuestReservation (Reservation + Property + rating)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Input vs Stored Records
//! Every table has a `New*` input type without an `id`; the database assigns
//! ids and the repositories hand back the stored record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// User
// =============================================================================

/// A registered user. Owners and guests are both users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Stored as provided by the caller (hashing is the web layer's job).
    pub password: String,
}

/// Input for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub name: String,
    pub password: String,
    pub email: String,
}

// =============================================================================
// Property
// =============================================================================

/// A property listed for rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Property {
    pub id: i64,

    /// User who owns the listing.
    pub owner_id: i64,

    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,

    /// Nightly price in cents (smallest currency unit).
    pub cost_per_night: i64,

    pub parking_spaces: i64,
    pub number_of_bathrooms: i64,
    pub number_of_bedrooms: i64,

    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,

    /// Whether the listing is visible to guests.
    pub active: bool,
}

impl Property {
    /// Returns the nightly price as Money.
    #[inline]
    pub fn nightly_price(&self) -> Money {
        Money::from_cents(self.cost_per_night)
    }
}

/// Input for creating a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProperty {
    pub owner_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_photo_url: String,
    #[serde(default)]
    pub cover_photo_url: String,
    pub cost_per_night: i64,
    #[serde(default)]
    pub parking_spaces: i64,
    #[serde(default)]
    pub number_of_bathrooms: i64,
    #[serde(default)]
    pub number_of_bedrooms: i64,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl NewProperty {
    /// Turns the input into a stored record once an id is known.
    pub fn into_property(self, id: i64) -> Property {
        Property {
            id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            thumbnail_photo_url: self.thumbnail_photo_url,
            cover_photo_url: self.cover_photo_url,
            cost_per_night: self.cost_per_night,
            parking_spaces: self.parking_spaces,
            number_of_bathrooms: self.number_of_bathrooms,
            number_of_bedrooms: self.number_of_bedrooms,
            country: self.country,
            street: self.street,
            city: self.city,
            province: self.province,
            post_code: self.post_code,
            active: self.active,
        }
    }
}

/// A property together with the mean of its review ratings.
///
/// `average_rating` is `None` when the property has no reviews yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PropertyListing {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub property: Property,
    pub average_rating: Option<f64>,
}

// =============================================================================
// Reservation
// =============================================================================

/// A booking of a property by a guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Reservation {
    pub id: i64,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub property_id: i64,
    pub guest_id: i64,
}

impl Reservation {
    /// Number of nights booked.
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Input for creating a reservation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewReservation {
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub property_id: i64,
    pub guest_id: i64,
}

/// A guest's reservation with the reserved property and its rating.
///
/// Column names are prefixed in the query so the reservation and property
/// ids do not collide; the property is carried whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct GuestReservation {
    pub reservation_id: i64,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub guest_id: i64,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub property: Property,
    pub average_rating: Option<f64>,
}

// =============================================================================
// Property Review
// =============================================================================

/// A guest's review of a stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PropertyReview {
    pub id: i64,
    pub guest_id: i64,
    pub property_id: i64,
    pub reservation_id: i64,
    /// 1 to 5 stars.
    pub rating: i64,
    pub message: Option<String>,
}

/// Input for creating a review.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewReview {
    pub guest_id: i64,
    pub property_id: i64,
    pub reservation_id: i64,
    pub rating: i64,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_property() -> NewProperty {
        NewProperty {
            owner_id: 1,
            title: "Speed lamp".to_string(),
            description: "description".to_string(),
            thumbnail_photo_url: "https://example.com/t.jpg".to_string(),
            cover_photo_url: "https://example.com/c.jpg".to_string(),
            cost_per_night: 93061,
            parking_spaces: 6,
            number_of_bathrooms: 4,
            number_of_bedrooms: 8,
            country: "Canada".to_string(),
            street: "536 Namsub Highway".to_string(),
            city: "Sotboske".to_string(),
            province: "Quebec".to_string(),
            post_code: "28142".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_into_property_keeps_fields() {
        let property = sample_new_property().into_property(7);
        assert_eq!(property.id, 7);
        assert_eq!(property.city, "Sotboske");
        assert_eq!(property.nightly_price().cents(), 93061);
    }

    #[test]
    fn test_reservation_nights() {
        let reservation = Reservation {
            id: 1,
            start_date: NaiveDate::from_ymd_opt(2018, 9, 11).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2018, 9, 26).unwrap(),
            property_id: 1,
            guest_id: 1,
        };
        assert_eq!(reservation.nights(), 15);
    }

    #[test]
    fn test_listing_serializes_flat() {
        let listing = PropertyListing {
            property: sample_new_property().into_property(1),
            average_rating: Some(4.5),
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["city"], "Sotboske");
        assert_eq!(json["average_rating"], 4.5);
        assert!(json.get("property").is_none());
    }

    #[test]
    fn test_new_property_defaults() {
        let json = r#"{
            "owner_id": 2,
            "title": "Cabin",
            "cost_per_night": 10000,
            "country": "Canada",
            "street": "1 Lake Rd",
            "city": "Banff",
            "province": "Alberta",
            "post_code": "T1L"
        }"#;
        let property: NewProperty = serde_json::from_str(json).unwrap();
        assert!(property.active);
        assert_eq!(property.parking_spaces, 0);
        assert!(property.description.is_empty());
    }
}
