//! # Property Repository
//!
//! Filtered property search and property inserts.
//!
//! ## Search Execution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Search Runs                                    │
//! │                                                                         │
//! │  FilterCriteria + limit                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SearchQuery::build  (lightbnb-core, validates + assembles)            │
//! │       │                                                                 │
//! │       ├── sql:    "... WHERE properties.city LIKE ?1 ... LIMIT ?2"     │
//! │       └── params: [Text("%van%"), Integer(10)]                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  debug! log of sql + params                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bind params in order ──► fetch_all ──► Vec<PropertyListing>           │
//! │                                                                         │
//! │  Any failure returns Err(DbError); nothing is swallowed.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::PropertyStore;
use lightbnb_core::validation::validate_new_property;
use lightbnb_core::{FilterCriteria, NewProperty, Property, PropertyListing, SearchQuery, SqlValue};

/// Repository for property database operations.
#[derive(Debug, Clone)]
pub struct PropertyRepository {
    pool: SqlitePool,
}

impl PropertyRepository {
    /// Creates a new PropertyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PropertyRepository { pool }
    }

    /// Searches properties matching `criteria`, cheapest first.
    ///
    /// ## Arguments
    /// * `criteria` - Optional filters; an empty criteria lists everything
    /// * `limit` - Maximum rows to return (must be positive)
    ///
    /// ## Returns
    /// One [`PropertyListing`] per property, ordered by `cost_per_night`
    /// ascending (then id), each with its average review rating.
    ///
    /// ## Errors
    /// * `DbError::Validation` - Criteria or limit rejected before querying
    /// * any other `DbError` - The query failed to execute
    pub async fn search(
        &self,
        criteria: &FilterCriteria,
        limit: u32,
    ) -> DbResult<Vec<PropertyListing>> {
        let query = SearchQuery::build(criteria, limit)?;

        debug!(
            sql = %query.sql(),
            params = ?query.params(),
            "Searching properties"
        );

        let mut statement = sqlx::query_as::<_, PropertyListing>(query.sql());
        for value in query.params() {
            statement = match value {
                SqlValue::Integer(v) => statement.bind(*v),
                SqlValue::Real(v) => statement.bind(*v),
                SqlValue::Text(v) => statement.bind(v.as_str()),
            };
        }

        let listings = statement.fetch_all(&self.pool).await?;

        debug!(count = listings.len(), "Search returned properties");
        Ok(listings)
    }

    /// Gets a property by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Property>> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(property)
    }

    /// Inserts a new property.
    ///
    /// ## Returns
    /// * `Ok(Property)` - The stored row with its generated id
    /// * `Err(DbError::Validation)` - Missing title/address, negative price
    /// * `Err(DbError::ForeignKeyViolation)` - `owner_id` is not a user
    pub async fn insert(&self, property: &NewProperty) -> DbResult<Property> {
        Self::insert_with(&self.pool, property).await
    }

    /// [`insert`](Self::insert) on any executor, e.g. an open transaction.
    pub async fn insert_with<'e, E>(executor: E, property: &NewProperty) -> DbResult<Property>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        validate_new_property(property)?;

        debug!(owner_id = %property.owner_id, title = %property.title, "Inserting property");

        let created = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                owner_id, title, description,
                thumbnail_photo_url, cover_photo_url,
                cost_per_night, parking_spaces,
                number_of_bathrooms, number_of_bedrooms,
                country, street, city, province, post_code,
                active
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5,
                ?6, ?7,
                ?8, ?9,
                ?10, ?11, ?12, ?13, ?14,
                ?15
            )
            RETURNING *
            "#,
        )
        .bind(property.owner_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.thumbnail_photo_url)
        .bind(&property.cover_photo_url)
        .bind(property.cost_per_night)
        .bind(property.parking_spaces)
        .bind(property.number_of_bathrooms)
        .bind(property.number_of_bedrooms)
        .bind(&property.country)
        .bind(&property.street)
        .bind(&property.city)
        .bind(&property.province)
        .bind(&property.post_code)
        .bind(property.active)
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    /// Counts all properties (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM properties")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

impl PropertyStore for PropertyRepository {
    async fn add_property(&self, property: NewProperty) -> DbResult<Property> {
        self.insert(&property).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
