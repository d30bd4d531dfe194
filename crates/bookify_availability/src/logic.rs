// File: crates/bookify_availability/src/logic.rs
use bookify_common::BookifyError;
use bookify_db::repositories::booking::{format_timestamp, is_storable, truncate_to_seconds};
use bookify_db::{
    Booking, BookingFilter, BookingRepository, BookingStatus, DbError, NewBooking, StatusFilter,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

// --- Error Type ---
#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Slot already booked: {0}")]
    Conflict(String),
    #[error("Booking not found: {0}")]
    NotFound(String),
    #[error("Booking store error: {0}")]
    Store(DbError),
}

impl From<DbError> for AvailabilityError {
    fn from(err: DbError) -> Self {
        match err {
            // The unique index lost a race against a concurrent booking.
            DbError::Conflict(msg) => AvailabilityError::Conflict(msg),
            other => AvailabilityError::Store(other),
        }
    }
}

impl From<AvailabilityError> for BookifyError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::Validation(msg) => BookifyError::ValidationError(msg),
            AvailabilityError::Conflict(msg) => BookifyError::ConflictError(msg),
            AvailabilityError::NotFound(msg) => BookifyError::NotFoundError(msg),
            AvailabilityError::Store(db_err) => db_err.into(),
        }
    }
}

// --- Data Structures ---

/// Half-open time range `[start, end)` a requested booking would occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SlotWindow {
    pub fn new(start: DateTime<Utc>, duration_minutes: i64) -> Result<Self, AvailabilityError> {
        if duration_minutes <= 0 {
            return Err(AvailabilityError::Validation(
                "duration_minutes must be positive".to_string(),
            ));
        }
        let start = truncate_to_seconds(start);
        let end = Duration::try_minutes(duration_minutes)
            .and_then(|d| start.checked_add_signed(d))
            .ok_or_else(|| {
                AvailabilityError::Validation(format!(
                    "duration_minutes {} is out of range",
                    duration_minutes
                ))
            })?;
        if !is_storable(start) || !is_storable(end) {
            return Err(AvailabilityError::Validation(format!(
                "slot {} + {} minutes must lie within years 0000-9999",
                format_timestamp(start),
                duration_minutes
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ConflictQuery {
    pub business_id: String,
    #[cfg_attr(feature = "openapi", schema(example = "2-1"))]
    pub resource_id: String,
    /// Requested start, RFC 3339
    #[cfg_attr(feature = "openapi", schema(example = "2025-12-29T15:00:00Z"))]
    pub scheduled_at: DateTime<Utc>,
    /// Falls back to `booking.default_duration_minutes`
    #[cfg_attr(feature = "openapi", schema(example = 60))]
    pub duration_minutes: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConflictResponse {
    pub available: bool,
    pub conflicts: Vec<Booking>,
}

/// Body of `POST /bookings`.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookSlotRequest {
    #[serde(flatten)]
    pub booking: NewBooking,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct BookingsQuery {
    pub business_id: String,
    /// First day, YYYY-MM-DD (UTC)
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-12-29"))]
    pub start_date: String,
    /// Last day, inclusive
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-12-31"))]
    pub end_date: String,
    #[serde(default)]
    pub include_cancelled: bool,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingsResponse {
    pub bookings: Vec<Booking>,
}

// --- Conflict Checking ---

/// Every booking of the resource that is not cancelled and starts inside `window`.
///
/// Only the stored start is compared against the window; an unknown business or
/// resource simply yields no rows.
pub async fn find_conflicts<R: BookingRepository>(
    repo: &R,
    business_id: &str,
    resource_id: &str,
    window: &SlotWindow,
) -> Result<Vec<Booking>, DbError> {
    let filter = BookingFilter::for_business(business_id)
        .resource(resource_id)
        .scheduled_between(window.start, window.end)
        .status(StatusFilter::Ne(BookingStatus::Cancelled));

    let conflicts = repo.find(&filter).await?;
    debug!(
        "Found {} conflicting booking(s) for {}/{} in [{}, {})",
        conflicts.len(),
        business_id,
        resource_id,
        format_timestamp(window.start),
        format_timestamp(window.end)
    );
    Ok(conflicts)
}

pub async fn is_slot_free<R: BookingRepository>(
    repo: &R,
    business_id: &str,
    resource_id: &str,
    window: &SlotWindow,
) -> Result<bool, DbError> {
    Ok(find_conflicts(repo, business_id, resource_id, window)
        .await?
        .is_empty())
}

// --- Booking Administration ---

fn require(value: &str, field: &str) -> Result<(), AvailabilityError> {
    if value.trim().is_empty() {
        return Err(AvailabilityError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

/// Books a slot after checking it is still free.
///
/// The check and the insert are not atomic. The store's unique index only
/// catches a racing booking with the identical start; two concurrent requests
/// whose windows overlap but start at different times (15:00 and 15:30) can
/// both succeed.
pub async fn book_slot<R: BookingRepository>(
    repo: &R,
    booking: NewBooking,
    duration_minutes: i64,
) -> Result<Booking, AvailabilityError> {
    require(&booking.business_id, "businessId")?;
    require(&booking.resource_id, "resourceId")?;
    require(&booking.client_email, "clientEmail")?;
    if booking.status == Some(BookingStatus::Cancelled) {
        return Err(AvailabilityError::Validation(
            "a new booking cannot start out cancelled".to_string(),
        ));
    }

    let window = SlotWindow::new(booking.scheduled_at, duration_minutes)?;
    let conflicts = find_conflicts(repo, &booking.business_id, &booking.resource_id, &window).await?;
    if let Some(existing) = conflicts.first() {
        info!(
            "Rejecting booking of {} at {}: held by {}",
            booking.resource_id,
            format_timestamp(window.start),
            existing.id
        );
        return Err(AvailabilityError::Conflict(format!(
            "resource {} is already booked at {}",
            booking.resource_id,
            format_timestamp(existing.scheduled_at)
        )));
    }

    let created = repo.create_booking(booking).await?;
    info!(
        "Booked {} for business {} at {} ({})",
        created.resource_id,
        created.business_id,
        format_timestamp(created.scheduled_at),
        created.id
    );
    Ok(created)
}

/// Marks a booking cancelled, which frees its slot.
pub async fn cancel_booking<R: BookingRepository>(
    repo: &R,
    business_id: &str,
    booking_id: &str,
) -> Result<Booking, AvailabilityError> {
    match repo
        .update_status(business_id, booking_id, BookingStatus::Cancelled)
        .await?
    {
        Some(booking) => {
            info!("Cancelled booking {} of business {}", booking_id, business_id);
            Ok(booking)
        }
        None => {
            warn!("Cancel requested for unknown booking {}", booking_id);
            Err(AvailabilityError::NotFound(booking_id.to_string()))
        }
    }
}

/// Bookings of a business starting in `[from, to)`, ordered by start time.
pub async fn list_bookings<R: BookingRepository>(
    repo: &R,
    business_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    include_cancelled: bool,
) -> Result<Vec<Booking>, AvailabilityError> {
    if to <= from {
        return Err(AvailabilityError::Validation(
            "end of range must be after its start".to_string(),
        ));
    }
    if !is_storable(from) {
        return Err(AvailabilityError::Validation(
            "start of range must lie within years 0000-9999".to_string(),
        ));
    }
    let status = if include_cancelled {
        StatusFilter::Any
    } else {
        StatusFilter::Ne(BookingStatus::Cancelled)
    };
    let filter = BookingFilter::for_business(business_id)
        .scheduled_between(from, to)
        .status(status);
    Ok(repo.find(&filter).await?)
}

/// Turns inclusive `YYYY-MM-DD` day bounds into a half-open UTC range.
pub fn parse_day_range(
    start_date: &str,
    end_date: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AvailabilityError> {
    let parse = |value: &str, field: &str| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            AvailabilityError::Validation(format!("Invalid {} format (YYYY-MM-DD)", field))
        })
    };
    let start = parse(start_date, "start_date")?;
    let end = parse(end_date, "end_date")?;
    if end < start {
        return Err(AvailabilityError::Validation(
            "end_date must not be before start_date".to_string(),
        ));
    }

    let day_after = end
        .succ_opt()
        .ok_or_else(|| AvailabilityError::Validation("end_date is out of range".to_string()))?;
    Ok((
        start.and_time(chrono::NaiveTime::MIN).and_utc(),
        day_after.and_time(chrono::NaiveTime::MIN).and_utc(),
    ))
}
