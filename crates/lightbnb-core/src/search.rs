//! # Property Search
//!
//! Filter criteria and the parameterized query builder behind the property
//! search page.
//!
//! ## Row Predicates vs Aggregate Predicates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 How a Search Becomes SQL                                │
//! │                                                                         │
//! │  FilterCriteria                                                         │
//! │  { city, owner_id, min_price, max_price, minimum_rating }              │
//! │       │                                                                 │
//! │       ├── row predicates (fixed order) ──► WHERE a AND b AND c         │
//! │       │     city      properties.city LIKE ?1 ESCAPE '\'               │
//! │       │     owner_id  properties.owner_id = ?2                         │
//! │       │     min_price properties.cost_per_night / 100 > ?3             │
//! │       │     max_price properties.cost_per_night / 100 < ?4             │
//! │       │                                                                 │
//! │       ├── GROUP BY properties.id                                       │
//! │       │                                                                 │
//! │       ├── aggregate predicate ─────────► HAVING AVG(rating) >= ?5      │
//! │       │                                                                 │
//! │       └── ORDER BY cost_per_night, id  LIMIT ?6                        │
//! │                                                                         │
//! │  Every value is a bound parameter; placeholders are numbered in the    │
//! │  order values are pushed, so `params[n - 1]` always belongs to `?n`.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Case Policy
//! City matching is a case-insensitive substring match (SQLite `LIKE`
//! folds ASCII letters). `%`, `_` and `\` typed by the guest are escaped so
//! they match literally.
//!
//! ## Unreviewed Properties
//! Reviews are LEFT JOINed, so a property without reviews is still listed
//! with `average_rating = NULL`. A `minimum_rating` filter drops it because
//! `NULL >= x` is never true.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::CENTS_PER_DOLLAR;
use crate::validation::{validate_id, validate_limit, validate_price, ValidationResult};

/// Base select: one row per (property, review) pair before grouping.
const SEARCH_SELECT: &str = "SELECT properties.*, AVG(property_reviews.rating) AS average_rating
FROM properties
LEFT JOIN property_reviews ON properties.id = property_reviews.property_id";

/// Joins row predicates. Only ever placed between two predicates.
const PREDICATE_SEPARATOR: &str = "\n  AND ";

/// Expression comparing the stored cents price in whole dollars.
///
/// Integer division truncates the same way
/// [`Money::dollars`](crate::money::Money::dollars) does.
fn price_in_dollars() -> String {
    format!("properties.cost_per_night / {CENTS_PER_DOLLAR}")
}

/// Highest `minimum_rating` that can still match a review average.
const MAX_MINIMUM_RATING: f64 = 5.0;

// =============================================================================
// Filter Criteria
// =============================================================================

/// Optional filters for a property search.
///
/// Every field is optional; `None` means no constraint on that dimension.
///
/// ## Deserializing Form Bodies
/// The search form posts every field, usually as strings and often empty.
/// Deserialization therefore:
/// - ignores keys it does not recognize,
/// - treats `""` (after trimming) as absent,
/// - accepts numbers either as JSON numbers or numeric strings.
///
/// ```rust
/// use lightbnb_core::search::FilterCriteria;
///
/// let criteria: FilterCriteria = serde_json::from_str(
///     r#"{"city": "", "minimum_price_per_night": "100", "page": "2"}"#,
/// ).unwrap();
///
/// assert_eq!(criteria.city, None);
/// assert_eq!(criteria.minimum_price_per_night, Some(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Substring of the property's city.
    #[serde(default, deserialize_with = "form::optional_text")]
    pub city: Option<String>,

    /// Only properties owned by this user.
    #[serde(default, deserialize_with = "form::optional_value")]
    pub owner_id: Option<i64>,

    /// Whole dollars; nightly price must be strictly above it.
    #[serde(default, deserialize_with = "form::optional_value")]
    pub minimum_price_per_night: Option<i64>,

    /// Whole dollars; nightly price must be strictly below it.
    #[serde(default, deserialize_with = "form::optional_value")]
    pub maximum_price_per_night: Option<i64>,

    /// Average review rating must be at least this.
    #[serde(default, deserialize_with = "form::optional_value")]
    pub minimum_rating: Option<f64>,
}

impl FilterCriteria {
    /// Returns true when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.owner_id.is_none()
            && self.minimum_price_per_night.is_none()
            && self.maximum_price_per_night.is_none()
            && self.minimum_rating.is_none()
    }

    /// Rejects criteria that cannot produce a meaningful result.
    ///
    /// ## Rules
    /// - `city` must not be blank (it would match every property)
    /// - `owner_id` must be positive
    /// - price thresholds must not be negative
    /// - `minimum_price_per_night` must not exceed `maximum_price_per_night`
    /// - `minimum_rating` must be within 0 to 5
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(city) = &self.city {
            if city.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "city".to_string(),
                });
            }
        }

        if let Some(owner_id) = self.owner_id {
            validate_id("owner_id", owner_id)?;
        }

        if let Some(min) = self.minimum_price_per_night {
            validate_price("minimum_price_per_night", min)?;
        }

        if let Some(max) = self.maximum_price_per_night {
            validate_price("maximum_price_per_night", max)?;
        }

        if let (Some(min), Some(max)) = (self.minimum_price_per_night, self.maximum_price_per_night) {
            if min > max {
                return Err(ValidationError::InvertedRange {
                    lower: "minimum_price_per_night".to_string(),
                    upper: "maximum_price_per_night".to_string(),
                    min,
                    max,
                });
            }
        }

        if let Some(rating) = self.minimum_rating {
            // NaN fails `contains` as well
            if !(0.0..=MAX_MINIMUM_RATING).contains(&rating) {
                return Err(ValidationError::OutOfRange {
                    field: "minimum_rating".to_string(),
                    min: 0,
                    max: MAX_MINIMUM_RATING as i64,
                });
            }
        }

        Ok(())
    }

    /// Row-level predicates, in the fixed order
    /// city, owner_id, minimum_price_per_night, maximum_price_per_night.
    fn row_predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(4);

        if let Some(city) = &self.city {
            predicates.push(Predicate {
                expr: "properties.city".to_string(),
                comparison: Comparison::Like,
                value: SqlValue::Text(contains_pattern(city)),
            });
        }

        if let Some(owner_id) = self.owner_id {
            predicates.push(Predicate {
                expr: "properties.owner_id".to_string(),
                comparison: Comparison::Equal,
                value: SqlValue::Integer(owner_id),
            });
        }

        if let Some(min) = self.minimum_price_per_night {
            predicates.push(Predicate {
                expr: price_in_dollars(),
                comparison: Comparison::GreaterThan,
                value: SqlValue::Integer(min),
            });
        }

        if let Some(max) = self.maximum_price_per_night {
            predicates.push(Predicate {
                expr: price_in_dollars(),
                comparison: Comparison::LessThan,
                value: SqlValue::Integer(max),
            });
        }

        predicates
    }

    /// Predicate on the grouped average, applied in HAVING.
    fn aggregate_predicate(&self) -> Option<Predicate> {
        self.minimum_rating.map(|rating| Predicate {
            expr: "AVG(property_reviews.rating)".to_string(),
            comparison: Comparison::AtLeast,
            value: SqlValue::Real(rating),
        })
    }
}

/// Builds a `LIKE` pattern matching `value` anywhere, with wildcards escaped.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Bound Values
// =============================================================================

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Equal,
    GreaterThan,
    LessThan,
    AtLeast,
    Like,
}

impl Comparison {
    fn render(self, placeholder: &str) -> String {
        match self {
            Comparison::Equal => format!("= {placeholder}"),
            Comparison::GreaterThan => format!("> {placeholder}"),
            Comparison::LessThan => format!("< {placeholder}"),
            Comparison::AtLeast => format!(">= {placeholder}"),
            Comparison::Like => format!(r"LIKE {placeholder} ESCAPE '\'"),
        }
    }
}

/// One `(condition, parameter)` step.
#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    expr: String,
    comparison: Comparison,
    value: SqlValue,
}

impl Predicate {
    fn render(self, params: &mut Params) -> String {
        let placeholder = params.bind(self.value);
        format!("{} {}", self.expr, self.comparison.render(&placeholder))
    }
}

/// Collects bound values and hands out their placeholders.
#[derive(Debug, Default)]
struct Params(Vec<SqlValue>);

impl Params {
    fn bind(&mut self, value: SqlValue) -> String {
        self.0.push(value);
        format!("?{}", self.0.len())
    }
}

// =============================================================================
// Search Query
// =============================================================================

/// A property search ready to execute: SQL text plus its bound values.
///
/// ## Example
/// ```rust
/// use lightbnb_core::search::{FilterCriteria, SearchQuery, SqlValue};
///
/// let criteria = FilterCriteria {
///     minimum_price_per_night: Some(100),
///     maximum_price_per_night: Some(300),
///     ..Default::default()
/// };
///
/// let query = SearchQuery::build(&criteria, 5).unwrap();
/// assert_eq!(
///     query.params(),
///     &[SqlValue::Integer(100), SqlValue::Integer(300), SqlValue::Integer(5)]
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    sql: String,
    params: Vec<SqlValue>,
    row_predicates: Vec<String>,
    aggregate_predicate: Option<String>,
}

impl SearchQuery {
    /// Validates the criteria and limit, then assembles the query.
    pub fn build(criteria: &FilterCriteria, limit: u32) -> ValidationResult<Self> {
        criteria.validate()?;
        validate_limit(limit)?;

        let mut params = Params::default();

        let row_predicates: Vec<String> = criteria
            .row_predicates()
            .into_iter()
            .map(|predicate| predicate.render(&mut params))
            .collect();

        let mut sql = String::from(SEARCH_SELECT);

        if !row_predicates.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&row_predicates.join(PREDICATE_SEPARATOR));
        }

        sql.push_str("\nGROUP BY properties.id");

        let aggregate_predicate = criteria
            .aggregate_predicate()
            .map(|predicate| predicate.render(&mut params));

        if let Some(having) = &aggregate_predicate {
            sql.push_str("\nHAVING ");
            sql.push_str(having);
        }

        let limit_placeholder = params.bind(SqlValue::Integer(i64::from(limit)));
        sql.push_str("\nORDER BY properties.cost_per_night ASC, properties.id ASC");
        sql.push_str("\nLIMIT ");
        sql.push_str(&limit_placeholder);

        Ok(SearchQuery {
            sql,
            params: params.0,
            row_predicates,
            aggregate_predicate,
        })
    }

    /// The SQL text with `?N` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Values in placeholder order: `params()[n - 1]` binds `?n`.
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Rendered WHERE conditions, in emission order.
    pub fn row_predicates(&self) -> &[String] {
        &self.row_predicates
    }

    /// Rendered HAVING condition, if any.
    pub fn aggregate_predicate(&self) -> Option<&str> {
        self.aggregate_predicate.as_deref()
    }
}

// =============================================================================
// Form Deserialization Helpers
// =============================================================================

mod form {
    use serde::{de, Deserialize, Deserializer};
    use std::fmt::Display;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field<T> {
        Value(T),
        Text(String),
    }

    /// Blank strings become `None`; other strings are trimmed.
    pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    /// Accepts a native value or a string holding one; blank strings become `None`.
    pub fn optional_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        match Option::<Field<T>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Field::Value(value)) => Ok(Some(value)),
            Some(Field::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    Ok(None)
                } else {
                    text.parse().map(Some).map_err(de::Error::custom)
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
