//! # Fixtures
//!
//! JSON fixture loading, and the fixture-backed property store used when
//! listings should not be persisted.
//!
//! ## Fixture Directory
//! ```text
//! fixtures/
//! ├── users.json              [NewUser, ...]
//! ├── properties.json         [NewProperty, ...]      owner_id → users
//! ├── reservations.json       [NewReservation, ...]   → properties, users
//! └── property_reviews.json   [NewReview, ...]        → reservations
//! ```
//! Rows get ids in file order starting at 1 on an empty database, so
//! references between files are 1-based positions.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::property::PropertyRepository;
use crate::repository::reservation::ReservationRepository;
use crate::repository::review::ReviewRepository;
use crate::repository::user::UserRepository;
use crate::repository::PropertyStore;
use lightbnb_core::validation::validate_new_property;
use lightbnb_core::{NewProperty, NewReservation, NewReview, NewUser, Property};

pub const USERS_FILE: &str = "users.json";
pub const PROPERTIES_FILE: &str = "properties.json";
pub const RESERVATIONS_FILE: &str = "reservations.json";
pub const REVIEWS_FILE: &str = "property_reviews.json";

// =============================================================================
// Fixture Set
// =============================================================================

/// Every fixture file, parsed.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub users: Vec<NewUser>,
    pub properties: Vec<NewProperty>,
    pub reservations: Vec<NewReservation>,
    pub reviews: Vec<NewReview>,
}

/// Rows inserted by [`Fixtures::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureSummary {
    pub users: usize,
    pub properties: usize,
    pub reservations: usize,
    pub reviews: usize,
}

impl Fixtures {
    /// Reads and parses all four fixture files from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> DbResult<Self> {
        let dir = dir.as_ref();
        info!(dir = %dir.display(), "Loading fixtures");

        Ok(Fixtures {
            users: read_json(&dir.join(USERS_FILE))?,
            properties: read_json(&dir.join(PROPERTIES_FILE))?,
            reservations: read_json(&dir.join(RESERVATIONS_FILE))?,
            reviews: read_json(&dir.join(REVIEWS_FILE))?,
        })
    }

    /// Inserts every fixture row, parents before children, in one
    /// transaction.
    ///
    /// Nothing is stored if any row fails; the transaction rolls back when
    /// dropped.
    pub async fn apply(&self, db: &Database) -> DbResult<FixtureSummary> {
        let mut summary = FixtureSummary::default();
        let mut tx = db.pool().begin().await?;

        for user in &self.users {
            UserRepository::insert_with(&mut *tx, user).await?;
            summary.users += 1;
        }
        for property in &self.properties {
            PropertyRepository::insert_with(&mut *tx, property).await?;
            summary.properties += 1;
        }
        for reservation in &self.reservations {
            ReservationRepository::insert_with(&mut *tx, reservation).await?;
            summary.reservations += 1;
        }
        for review in &self.reviews {
            ReviewRepository::insert_with(&mut *tx, review).await?;
            summary.reviews += 1;
        }

        tx.commit().await?;

        info!(
            users = summary.users,
            properties = summary.properties,
            reservations = summary.reservations,
            reviews = summary.reviews,
            "Fixtures applied"
        );
        Ok(summary)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> DbResult<T> {
    debug!(path = %path.display(), "Reading fixture file");

    let raw = std::fs::read_to_string(path)
        .map_err(|e| DbError::Fixture(format!("{}: {}", path.display(), e)))?;

    serde_json::from_str(&raw)
        .map_err(|e| DbError::Fixture(format!("{}: {}", path.display(), e)))
}

// =============================================================================
// Fixture-Backed Property Store
// =============================================================================

/// Keeps added properties in memory instead of the database.
///
/// New ids continue after the highest id held, so a store seeded from
/// `properties.json` hands out `len + 1` next.
#[derive(Debug, Default)]
pub struct FixturePropertyStore {
    properties: RwLock<BTreeMap<i64, Property>>,
}

impl FixturePropertyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `properties` with ids 1, 2, 3, ...
    pub fn from_properties(properties: Vec<NewProperty>) -> Self {
        let properties = properties
            .into_iter()
            .zip(1..)
            .map(|(property, id)| (id, property.into_property(id)))
            .collect();

        FixturePropertyStore {
            properties: RwLock::new(properties),
        }
    }

    /// Parses a `properties.json` array into a store.
    pub fn from_json(json: &str) -> DbResult<Self> {
        let properties: Vec<NewProperty> = serde_json::from_str(json)?;
        Ok(Self::from_properties(properties))
    }

    /// Gets a property by id.
    pub async fn get(&self, id: i64) -> Option<Property> {
        self.properties.read().await.get(&id).cloned()
    }

    /// Number of properties held.
    pub async fn len(&self) -> usize {
        self.properties.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.properties.read().await.is_empty()
    }
}

impl PropertyStore for FixturePropertyStore {
    async fn add_property(&self, property: NewProperty) -> DbResult<Property> {
        validate_new_property(&property)?;

        let mut properties = self.properties.write().await;
        let id = properties.keys().next_back().map_or(1, |last| last + 1);
        let property = property.into_property(id);
        properties.insert(id, property.clone());

        debug!(id = %id, "Added property to fixture store");
        Ok(property)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_property;
    use crate::DbConfig;
    use lightbnb_core::FilterCriteria;

    const FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures");

    #[test]
    fn test_load_dir_parses_all_files() {
        let fixtures = Fixtures::load_dir(FIXTURE_DIR).unwrap();

        assert!(!fixtures.users.is_empty());
        assert!(!fixtures.properties.is_empty());
        assert!(!fixtures.reservations.is_empty());
        assert!(!fixtures.reviews.is_empty());
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let err = Fixtures::load_dir("/definitely/not/here").unwrap_err();
        assert!(matches!(err, DbError::Fixture(msg) if msg.contains(USERS_FILE)));
    }

    #[tokio::test]
    async fn test_apply_fixtures() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let fixtures = Fixtures::load_dir(FIXTURE_DIR).unwrap();

        let summary = fixtures.apply(&db).await.unwrap();

        assert_eq!(summary.users, fixtures.users.len());
        assert_eq!(summary.reviews, fixtures.reviews.len());
        assert_eq!(
            db.properties().count().await.unwrap(),
            fixtures.properties.len() as i64
        );

        let listings = db
            .properties()
            .search(&FilterCriteria::default(), 100)
            .await
            .unwrap();
        assert_eq!(listings.len(), fixtures.properties.len());
    }

    #[tokio::test]
    async fn test_apply_failure_stores_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut fixtures = Fixtures::load_dir(FIXTURE_DIR).unwrap();

        // last review points at a reservation that does not exist
        if let Some(review) = fixtures.reviews.last_mut() {
            review.reservation_id = 999;
        }

        let err = fixtures.apply(&db).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        assert_eq!(db.users().count().await.unwrap(), 0);
        assert_eq!(db.properties().count().await.unwrap(), 0);

        // a later run starts from a clean database
        fixtures.reviews.pop();
        let summary = fixtures.apply(&db).await.unwrap();
        assert_eq!(summary.users, fixtures.users.len());
    }

    #[tokio::test]
    async fn test_store_assigns_next_id() {
        let store = FixturePropertyStore::from_properties(vec![
            sample_property(1, "Vancouver", 10000),
            sample_property(1, "Calgary", 20000),
        ]);
        assert_eq!(store.len().await, 2);

        let added = store
            .add_property(sample_property(2, "Halifax", 9000))
            .await
            .unwrap();

        assert_eq!(added.id, 3);
        assert_eq!(store.get(3).await, Some(added));
        assert_eq!(store.get(1).await.map(|p| p.city), Some("Vancouver".to_string()));
    }

    #[tokio::test]
    async fn test_empty_store_starts_at_one() {
        let store = FixturePropertyStore::new();
        assert!(store.is_empty().await);

        let added = store
            .add_property(sample_property(1, "Banff", 1000))
            .await
            .unwrap();
        assert_eq!(added.id, 1);
    }

    #[tokio::test]
    async fn test_store_validates() {
        let store = FixturePropertyStore::new();

        let mut property = sample_property(1, "Banff", 1000);
        property.title = String::new();

        let err = store.add_property(property).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_from_fixture_json() {
        let json = std::fs::read_to_string(format!("{FIXTURE_DIR}/{PROPERTIES_FILE}")).unwrap();
        let store = FixturePropertyStore::from_json(&json).unwrap();

        let count = store.len().await;
        assert!(count > 0);

        let added = store
            .add_property(sample_property(1, "Banff", 1000))
            .await
            .unwrap();
        assert_eq!(added.id, count as i64 + 1);
    }
}
