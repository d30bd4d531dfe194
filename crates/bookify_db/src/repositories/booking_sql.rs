//! SQL implementation of the booking repository
//!
//! Timestamps are stored as fixed-width RFC 3339 text because `DateTime<Utc>`
//! does not decode through `sqlx::Any`.

use crate::error::DbError;
use crate::repositories::booking::{
    format_timestamp, max_storable, min_storable, parse_timestamp, Booking, BookingFilter, BookingRepository, BookingStatus,
    NewBooking, StatusFilter,
};
use crate::DbClient;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

const SELECT_COLUMNS: &str =
    "SELECT id, business_id, resource_id, scheduled_at, status, client_email, created_at FROM bookings";

/// SQL implementation of the booking repository
#[derive(Debug, Clone)]
pub struct SqlBookingRepository {
    db_client: DbClient,
}

impl SqlBookingRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn booking_from_row(row: &AnyRow) -> Result<Booking, DbError> {
    let status: String = row.try_get("status")?;
    let scheduled_at: String = row.try_get("scheduled_at")?;
    let created_at: String = row.try_get("created_at")?;
    Ok(Booking {
        id: row.try_get("id")?,
        business_id: row.try_get("business_id")?,
        resource_id: row.try_get("resource_id")?,
        scheduled_at: parse_timestamp(&scheduled_at)?,
        status: status.parse()?,
        client_email: row.try_get("client_email")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Renders the WHERE clause of a filter with `$n` placeholders and the values to
/// bind, in placeholder order.
fn filter_clause(filter: &BookingFilter) -> (String, Vec<String>) {
    let mut conditions = vec!["business_id = $1".to_string()];
    let mut binds = vec![filter.business_id.clone()];

    let mut push = |condition: &str, value: String| {
        binds.push(value);
        conditions.push(format!("{} ${}", condition, binds.len()));
    };

    if let Some(resource_id) = &filter.resource_id {
        push("resource_id =", resource_id.clone());
    }
    // Bounds are clamped to four-digit years so that text comparison stays ordered.
    if let Some(from) = filter.scheduled_from {
        push("scheduled_at >=", format_timestamp(from.max(min_storable())));
    }
    if let Some(to) = filter.scheduled_to {
        if to > max_storable() {
            push("scheduled_at <=", format_timestamp(max_storable()));
        } else {
            push("scheduled_at <", format_timestamp(to));
        }
    }
    match filter.status {
        StatusFilter::Any => {}
        StatusFilter::Eq(status) => push("status =", status.as_str().to_string()),
        StatusFilter::Ne(status) => push("status <>", status.as_str().to_string()),
    }

    (conditions.join(" AND "), binds)
}

impl BookingRepository for SqlBookingRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing booking schema");

        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                business_id TEXT NOT NULL,
                resource_id TEXT NOT NULL,
                scheduled_at TEXT NOT NULL,
                status TEXT NOT NULL,
                client_email TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS bookings_business_slot
                ON bookings (business_id, resource_id, scheduled_at)
            "#,
            // At most one occupying booking per business, resource and start.
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS bookings_active_slot
                ON bookings (business_id, resource_id, scheduled_at)
                WHERE status <> 'cancelled'
            "#,
        ];
        for statement in statements {
            self.db_client.execute(statement).await?;
        }

        info!("Booking schema initialized successfully");
        Ok(())
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<Booking, DbError> {
        let booking = booking.into_booking();
        debug!(
            "Creating booking {} for business: {} resource: {} at {}",
            booking.id, booking.business_id, booking.resource_id, booking.scheduled_at
        );

        let query = r#"
            INSERT INTO bookings (id, business_id, resource_id, scheduled_at, status, client_email, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        sqlx::query(query)
            .bind(&booking.id)
            .bind(&booking.business_id)
            .bind(&booking.resource_id)
            .bind(format_timestamp(booking.scheduled_at))
            .bind(booking.status.as_str())
            .bind(&booking.client_email)
            .bind(format_timestamp(booking.created_at))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert booking: {}", e);
                DbError::from_write(
                    e,
                    &format!(
                        "resource {} is already booked at {}",
                        booking.resource_id,
                        format_timestamp(booking.scheduled_at)
                    ),
                )
            })?;

        info!("Booking {} created", booking.id);
        Ok(booking)
    }

    async fn find(&self, filter: &BookingFilter) -> Result<Vec<Booking>, DbError> {
        debug!("Finding bookings with filter: {:?}", filter);

        let (clause, binds) = filter_clause(filter);
        let query = format!("{} WHERE {} ORDER BY scheduled_at", SELECT_COLUMNS, clause);

        let mut statement = sqlx::query(&query);
        for value in binds {
            statement = statement.bind(value);
        }

        let rows = statement
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find bookings: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(booking_from_row).collect()
    }

    async fn find_by_id(
        &self,
        business_id: &str,
        booking_id: &str,
    ) -> Result<Option<Booking>, DbError> {
        let query = format!("{} WHERE business_id = $1 AND id = $2", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(business_id)
            .bind(booking_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find booking {}: {}", booking_id, e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(booking_from_row).transpose()
    }

    async fn update_status(
        &self,
        business_id: &str,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, DbError> {
        debug!("Setting booking {} to {}", booking_id, status);

        let query = r#"
            UPDATE bookings
            SET status = $1
            WHERE business_id = $2 AND id = $3
        "#;

        let result = sqlx::query(query)
            .bind(status.as_str())
            .bind(business_id)
            .bind(booking_id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to update booking {}: {}", booking_id, e);
                DbError::from_write(e, &format!("booking {} would double-book its slot", booking_id))
            })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(business_id, booking_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    async fn repository() -> SqlBookingRepository {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        let repo = SqlBookingRepository::new(client);
        repo.init_schema().await.unwrap();
        repo
    }

    fn new_booking(hour: u32) -> NewBooking {
        NewBooking {
            business_id: "biz-1".to_string(),
            resource_id: "2-1".to_string(),
            scheduled_at: Utc.with_ymd_and_hms(2025, 12, 29, hour, 0, 0).unwrap(),
            client_email: "client@example.com".to_string(),
            status: None,
        }
    }

    #[test]
    fn filter_clause_numbers_placeholders_in_order() {
        let from = Utc.with_ymd_and_hms(2025, 12, 29, 15, 0, 0).unwrap();
        let filter = BookingFilter::for_business("biz-1")
            .resource("2-1")
            .scheduled_between(from, from + Duration::hours(1))
            .status(StatusFilter::Ne(BookingStatus::Cancelled));
        let (clause, binds) = filter_clause(&filter);
        assert_eq!(
            clause,
            "business_id = $1 AND resource_id = $2 AND scheduled_at >= $3 AND scheduled_at < $4 AND status <> $5"
        );
        assert_eq!(
            binds,
            vec![
                "biz-1",
                "2-1",
                "2025-12-29T15:00:00Z",
                "2025-12-29T16:00:00Z",
                "cancelled"
            ]
        );
    }

    #[test]
    fn filter_clause_clamps_bounds_past_year_9999() {
        let from = Utc.with_ymd_and_hms(2025, 12, 29, 15, 0, 0).unwrap();
        let to = from + Duration::minutes(5_000_000_000);
        let filter = BookingFilter::for_business("biz-1").scheduled_between(from, to);
        let (clause, binds) = filter_clause(&filter);
        assert_eq!(
            clause,
            "business_id = $1 AND scheduled_at >= $2 AND scheduled_at <= $3"
        );
        assert_eq!(binds[2], "9999-12-31T23:59:59Z");
    }

    #[tokio::test]
    async fn window_ending_after_year_9999_still_finds_bookings() {
        let repo = repository().await;
        let created = repo.create_booking(new_booking(15)).await.unwrap();

        let from = Utc.with_ymd_and_hms(2025, 12, 29, 14, 0, 0).unwrap();
        let to = from + Duration::minutes(5_000_000_000);
        assert!(format_timestamp(to).starts_with('+'));

        let found = repo
            .find(
                &BookingFilter::for_business("biz-1")
                    .resource("2-1")
                    .scheduled_between(from, to),
            )
            .await
            .unwrap();
        assert_eq!(found, vec![created]);
    }

    #[tokio::test]
    async fn create_and_find_by_window() {
        let repo = repository().await;
        let created = repo.create_booking(new_booking(15)).await.unwrap();
        assert_eq!(created.status, BookingStatus::Pending);

        let from = Utc.with_ymd_and_hms(2025, 12, 29, 15, 0, 0).unwrap();
        let found = repo
            .find(
                &BookingFilter::for_business("biz-1")
                    .resource("2-1")
                    .scheduled_between(from, from + Duration::hours(1))
                    .status(StatusFilter::Ne(BookingStatus::Cancelled)),
            )
            .await
            .unwrap();
        assert_eq!(found, vec![created]);

        let cancelled = repo
            .find(
                &BookingFilter::for_business("biz-1")
                    .resource("2-1")
                    .status(StatusFilter::Eq(BookingStatus::Cancelled)),
            )
            .await
            .unwrap();
        assert!(cancelled.is_empty());
    }

    #[tokio::test]
    async fn unique_index_rejects_double_booking() {
        let repo = repository().await;
        repo.create_booking(new_booking(15)).await.unwrap();
        let err = repo.create_booking(new_booking(15)).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn cancelled_slot_can_be_booked_again() {
        let repo = repository().await;
        let first = repo.create_booking(new_booking(15)).await.unwrap();
        let updated = repo
            .update_status("biz-1", &first.id, BookingStatus::Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Cancelled);

        let second = repo.create_booking(new_booking(15)).await.unwrap();
        assert_ne!(second.id, first.id);
    }

    #[tokio::test]
    async fn update_unknown_booking_returns_none() {
        let repo = repository().await;
        let result = repo
            .update_status("biz-1", "missing", BookingStatus::Cancelled)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn other_business_sees_nothing() {
        let repo = repository().await;
        repo.create_booking(new_booking(9)).await.unwrap();
        let found = repo
            .find(&BookingFilter::for_business("biz-2"))
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
