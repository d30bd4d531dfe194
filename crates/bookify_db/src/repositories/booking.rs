//! Booking records and the repository interface over them.

use crate::error::DbError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a booking. Anything but `Cancelled` occupies its slot.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn occupies_slot(&self) -> bool {
        *self != BookingStatus::Cancelled
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(DbError::DecodeError(format!("unknown booking status '{}'", other))),
        }
    }
}

/// A stored booking of one resource at one point in time.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub business_id: String,
    pub resource_id: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-12-29T15:00:00Z"))]
    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub client_email: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a booking; id and creation time are assigned by the store.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub business_id: String,
    pub resource_id: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-12-29T15:00:00Z"))]
    pub scheduled_at: DateTime<Utc>,
    pub client_email: String,
    /// Defaults to `pending`.
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

impl NewBooking {
    pub fn into_booking(self) -> Booking {
        Booking {
            id: uuid::Uuid::new_v4().to_string(),
            business_id: self.business_id,
            resource_id: self.resource_id,
            scheduled_at: truncate_to_seconds(self.scheduled_at),
            status: self.status.unwrap_or(BookingStatus::Pending),
            client_email: self.client_email,
            created_at: truncate_to_seconds(Utc::now()),
        }
    }
}

/// Status predicate of a [`BookingFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Any,
    Eq(BookingStatus),
    Ne(BookingStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: BookingStatus) -> bool {
        match self {
            StatusFilter::Any => true,
            StatusFilter::Eq(s) => status == *s,
            StatusFilter::Ne(s) => status != *s,
        }
    }
}

/// Query over the bookings of one business.
///
/// `scheduled_from` is inclusive and `scheduled_to` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingFilter {
    pub business_id: String,
    pub resource_id: Option<String>,
    pub scheduled_from: Option<DateTime<Utc>>,
    pub scheduled_to: Option<DateTime<Utc>>,
    pub status: StatusFilter,
}

impl BookingFilter {
    pub fn for_business(business_id: impl Into<String>) -> Self {
        Self {
            business_id: business_id.into(),
            resource_id: None,
            scheduled_from: None,
            scheduled_to: None,
            status: StatusFilter::Any,
        }
    }

    pub fn resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn scheduled_between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.scheduled_from = Some(from);
        self.scheduled_to = Some(to);
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        booking.business_id == self.business_id
            && self
                .resource_id
                .as_ref()
                .map_or(true, |r| *r == booking.resource_id)
            && self.scheduled_from.map_or(true, |from| booking.scheduled_at >= from)
            && self.scheduled_to.map_or(true, |to| booking.scheduled_at < to)
            && self.status.matches(booking.status)
    }
}

/// Stored timestamps carry whole seconds; comparisons must agree with storage.
pub fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.timestamp(), 0).unwrap_or(ts)
}

/// Fixed-width RFC 3339 text so that lexical order equals time order.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// 0000-01-01T00:00:00Z, the earliest instant that formats as four-digit-year text.
const MIN_STORABLE_SECS: i64 = -62_167_219_200;
/// 9999-12-31T23:59:59Z; later years format with a leading `+` and break text ordering.
const MAX_STORABLE_SECS: i64 = 253_402_300_799;

pub fn min_storable() -> DateTime<Utc> {
    DateTime::from_timestamp(MIN_STORABLE_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn max_storable() -> DateTime<Utc> {
    DateTime::from_timestamp(MAX_STORABLE_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether `ts` falls within years 0000-9999, where text order equals time order.
pub fn is_storable(ts: DateTime<Utc>) -> bool {
    (min_storable()..=max_storable()).contains(&ts)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::DecodeError(format!("invalid timestamp '{}': {}", value, e)))
}

/// Storage interface for bookings.
pub trait BookingRepository: Send + Sync {
    /// Create the backing tables and indexes if they don't exist yet.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Store a new booking.
    ///
    /// Fails with [`DbError::Conflict`] when a non-cancelled booking already holds
    /// the same business, resource and start time.
    fn create_booking(
        &self,
        booking: NewBooking,
    ) -> impl std::future::Future<Output = Result<Booking, DbError>> + Send;

    /// All bookings matching the filter, ordered by start time.
    fn find(
        &self,
        filter: &BookingFilter,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, DbError>> + Send;

    fn find_by_id(
        &self,
        business_id: &str,
        booking_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, DbError>> + Send;

    /// Set the status of a booking, returning the updated record or `None` if unknown.
    fn update_status(
        &self,
        business_id: &str,
        booking_id: &str,
        status: BookingStatus,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, DbError>> + Send;
}
