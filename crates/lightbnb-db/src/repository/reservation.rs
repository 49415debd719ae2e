//! # Reservation Repository
//!
//! A guest's past stays, and reservation inserts.
//!
//! ## "Past" Reservations
//! ```text
//! today = 2024-05-01
//!
//!   2018-09-11 ──── 2018-09-26   ended      ✓ listed
//!   2024-04-20 ──── 2024-05-01   ends today ✗ (end_date < today only)
//!   2024-04-28 ──── 2024-05-03   ongoing    ✗
//!   2099-01-01 ──── 2099-01-10   upcoming   ✗
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use lightbnb_core::validation::{validate_limit, validate_new_reservation};
use lightbnb_core::{GuestReservation, NewReservation, Reservation};

/// Repository for reservation database operations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReservationRepository { pool }
    }

    /// Lists a guest's reservations that ended before today (UTC),
    /// most recent start first.
    ///
    /// ## Arguments
    /// * `guest_id` - The guest's user id
    /// * `limit` - Maximum rows to return (must be positive)
    pub async fn list_past_for_guest(
        &self,
        guest_id: i64,
        limit: u32,
    ) -> DbResult<Vec<GuestReservation>> {
        self.list_ended_before(guest_id, Utc::now().date_naive(), limit)
            .await
    }

    /// Lists a guest's reservations with `end_date < before`.
    ///
    /// Each row carries the reserved property and that property's average
    /// review rating (`None` when it has no reviews).
    pub async fn list_ended_before(
        &self,
        guest_id: i64,
        before: NaiveDate,
        limit: u32,
    ) -> DbResult<Vec<GuestReservation>> {
        validate_limit(limit)?;

        debug!(guest_id = %guest_id, before = %before, limit = %limit, "Listing past reservations");

        let reservations = sqlx::query_as::<_, GuestReservation>(
            r#"
            SELECT
                reservations.id AS reservation_id,
                reservations.start_date,
                reservations.end_date,
                reservations.guest_id,
                properties.*,
                AVG(property_reviews.rating) AS average_rating
            FROM reservations
            JOIN properties ON reservations.property_id = properties.id
            LEFT JOIN property_reviews ON properties.id = property_reviews.property_id
            WHERE reservations.guest_id = ?1
            AND reservations.end_date < ?2
            GROUP BY reservations.id, properties.id
            ORDER BY reservations.start_date DESC
            LIMIT ?3
            "#,
        )
        .bind(guest_id)
        .bind(before)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = reservations.len(), "Listed past reservations");
        Ok(reservations)
    }

    /// Inserts a new reservation.
    ///
    /// ## Returns
    /// * `Ok(Reservation)` - The stored row
    /// * `Err(DbError::Validation)` - End date not after start date
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown property or guest
    pub async fn insert(&self, reservation: &NewReservation) -> DbResult<Reservation> {
        Self::insert_with(&self.pool, reservation).await
    }

    /// [`insert`](Self::insert) on any executor, e.g. an open transaction.
    pub async fn insert_with<'e, E>(
        executor: E,
        reservation: &NewReservation,
    ) -> DbResult<Reservation>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        validate_new_reservation(reservation)?;

        debug!(
            property_id = %reservation.property_id,
            guest_id = %reservation.guest_id,
            "Inserting reservation"
        );

        let created = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (start_date, end_date, property_id, guest_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, start_date, end_date, property_id, guest_id
            "#,
        )
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .bind(reservation.property_id)
        .bind(reservation.guest_id)
        .fetch_one(executor)
        .await?;

        Ok(created)
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

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_list_past_for_guest_excludes_upcoming() {
        let db = seeded_database().await;

        let reservations = db.reservations().list_past_for_guest(2, 10).await.unwrap();

        let ids: Vec<i64> = reservations.iter().map(|r| r.reservation_id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
        assert!(reservations
            .windows(2)
            .all(|w| w[0].start_date >= w[1].start_date));
    }

    #[tokio::test]
    async fn test_list_past_for_guest_limit() {
        let db = seeded_database().await;

        let reservations = db.reservations().list_past_for_guest(2, 2).await.unwrap();
        let ids: Vec<i64> = reservations.iter().map(|r| r.reservation_id).collect();
        assert_eq!(ids, vec![5, 4]);
    }

    #[tokio::test]
    async fn test_list_carries_property_and_rating() {
        let db = seeded_database().await;

        let reservations = db
            .reservations()
            .list_ended_before(2, date(2019, 1, 1), 10)
            .await
            .unwrap();

        assert_eq!(reservations.len(), 1);
        let stay = &reservations[0];
        assert_eq!(stay.reservation_id, 1);
        assert_eq!(stay.start_date, date(2018, 9, 11));
        assert_eq!(stay.property.id, 1);
        assert_eq!(stay.property.city, "Vancouver");
        assert_eq!(stay.average_rating, Some(4.5));
    }

    #[tokio::test]
    async fn test_past_stay_at_unreviewed_property_is_listed() {
        let db = seeded_database().await;

        // property 6 has no reviews
        let created = db
            .reservations()
            .insert(&NewReservation {
                start_date: date(2020, 6, 1),
                end_date: date(2020, 6, 5),
                property_id: 6,
                guest_id: 2,
            })
            .await
            .unwrap();

        let reservations = db.reservations().list_past_for_guest(2, 10).await.unwrap();

        assert_eq!(reservations.len(), 6);
        let stay = &reservations[0];
        assert_eq!(stay.reservation_id, created.id);
        assert_eq!(stay.property.id, 6);
        assert_eq!(stay.average_rating, None);
    }

    #[tokio::test]
    async fn test_end_date_must_be_strictly_before() {
        let db = seeded_database().await;

        // reservation 1 ends 2018-09-26
        let reservations = db
            .reservations()
            .list_ended_before(2, date(2018, 9, 26), 10)
            .await
            .unwrap();
        assert!(reservations.is_empty());
    }

    #[tokio::test]
    async fn test_guest_without_reservations() {
        let db = seeded_database().await;

        let reservations = db.reservations().list_past_for_guest(1, 10).await.unwrap();
        assert!(reservations.is_empty());
    }

    #[tokio::test]
    async fn test_insert_validates_dates() {
        let db = seeded_database().await;

        let err = db
            .reservations()
            .insert(&NewReservation {
                start_date: date(2024, 1, 10),
                end_date: date(2024, 1, 5),
                property_id: 1,
                guest_id: 2,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_insert_unknown_property() {
        let db = seeded_database().await;

        let err = db
            .reservations()
            .insert(&NewReservation {
                start_date: date(2024, 1, 1),
                end_date: date(2024, 1, 5),
                property_id: 999,
                guest_id: 2,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
