//! # Review Repository
//!
//! Property review inserts. Averages are computed by the property and
//! reservation queries, not stored.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use lightbnb_core::validation::validate_new_review;
use lightbnb_core::{NewReview, PropertyReview};

/// Repository for property review operations.
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    /// Creates a new ReviewRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Inserts a review.
    ///
    /// ## Returns
    /// * `Ok(PropertyReview)` - The stored row
    /// * `Err(DbError::Validation)` - Rating outside 1-5
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown guest/property/reservation
    pub async fn insert(&self, review: &NewReview) -> DbResult<PropertyReview> {
        Self::insert_with(&self.pool, review).await
    }

    /// [`insert`](Self::insert) on any executor, e.g. an open transaction.
    pub async fn insert_with<'e, E>(executor: E, review: &NewReview) -> DbResult<PropertyReview>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        validate_new_review(review)?;

        debug!(
            property_id = %review.property_id,
            rating = %review.rating,
            "Inserting review"
        );

        let created = sqlx::query_as::<_, PropertyReview>(
            r#"
            INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating, message)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, guest_id, property_id, reservation_id, rating, message
            "#,
        )
        .bind(review.guest_id)
        .bind(review.property_id)
        .bind(review.reservation_id)
        .bind(review.rating)
        .bind(review.message.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    /// Lists reviews for a property, oldest first.
    pub async fn list_for_property(&self, property_id: i64) -> DbResult<Vec<PropertyReview>> {
        let reviews = sqlx::query_as::<_, PropertyReview>(
            r#"
            SELECT id, guest_id, property_id, reservation_id, rating, message
            FROM property_reviews
            WHERE property_id = ?1
            ORDER BY id
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::testing::seeded_database;
    use lightbnb_core::FilterCriteria;

    #[tokio::test]
    async fn test_insert_review_moves_average() {
        let db = seeded_database().await;

        // property 2 starts with a single 3-star review
        let review = db
            .reviews()
            .insert(&NewReview {
                guest_id: 2,
                property_id: 2,
                reservation_id: 2,
                rating: 5,
                message: Some("Lovely".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(review.rating, 5);
        assert_eq!(db.reviews().list_for_property(2).await.unwrap().len(), 2);

        let criteria = FilterCriteria {
            minimum_rating: Some(4.0),
            ..Default::default()
        };
        let listings = db.properties().search(&criteria, 10).await.unwrap();
        let property_two = listings.iter().find(|l| l.property.id == 2).unwrap();
        assert_eq!(property_two.average_rating, Some(4.0));
    }

    #[tokio::test]
    async fn test_insert_rejects_out_of_range_rating() {
        let db = seeded_database().await;

        let err = db
            .reviews()
            .insert(&NewReview {
                guest_id: 2,
                property_id: 2,
                reservation_id: 2,
                rating: 6,
                message: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
