// File: crates/bookify_availability/src/handlers.rs
use crate::logic::{
    book_slot, cancel_booking, find_conflicts, list_bookings, parse_day_range, BookSlotRequest,
    BookingsQuery, BookingsResponse, ConflictQuery, ConflictResponse, SlotWindow,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use bookify_common::{log_error, service_unavailable, BookifyError};
use bookify_config::AppConfig;
use bookify_db::{Booking, BookingRepository};
use std::sync::Arc;
use tracing::info;

// Shared state needed by the availability handlers
pub struct AvailabilityState<R> {
    pub config: Arc<AppConfig>,
    pub repo: Arc<R>,
}

impl<R> AvailabilityState<R> {
    fn ensure_enabled(&self) -> Result<(), BookifyError> {
        if self.config.use_availability {
            Ok(())
        } else {
            Err(service_unavailable("Availability service is disabled."))
        }
    }

    fn duration_or_default(&self, requested: Option<i64>) -> i64 {
        requested.unwrap_or(self.config.booking.default_duration_minutes)
    }
}

fn log_store_failure(err: BookifyError) -> BookifyError {
    if matches!(err, BookifyError::ServiceUnavailable(_)) {
        log_error(&err, "Booking store failure");
    }
    err
}

/// Handler listing the bookings that would collide with a requested slot.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability/conflicts",
    params(ConflictQuery),
    responses(
        (status = 200, description = "Conflicting bookings, empty when the slot is free", body = ConflictResponse),
        (status = 400, description = "Invalid duration"),
        (status = 503, description = "Booking store unavailable or service disabled")
    ),
    tag = "Availability"
))]
pub async fn check_conflicts_handler<R: BookingRepository + 'static>(
    State(state): State<Arc<AvailabilityState<R>>>,
    Query(query): Query<ConflictQuery>,
) -> Result<Json<ConflictResponse>, BookifyError> {
    state.ensure_enabled()?;

    let duration = state.duration_or_default(query.duration_minutes);
    let window = SlotWindow::new(query.scheduled_at, duration)?;
    let conflicts = find_conflicts(
        state.repo.as_ref(),
        &query.business_id,
        &query.resource_id,
        &window,
    )
    .await
    .map_err(|e| log_store_failure(e.into()))?;

    Ok(Json(ConflictResponse {
        available: conflicts.is_empty(),
        conflicts,
    }))
}

/// Handler to book a slot for a resource.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings",
    request_body = BookSlotRequest,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Invalid booking request"),
        (status = 409, description = "Slot already booked"),
        (status = 503, description = "Booking store unavailable or service disabled")
    ),
    tag = "Availability"
))]
pub async fn book_slot_handler<R: BookingRepository + 'static>(
    State(state): State<Arc<AvailabilityState<R>>>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<(StatusCode, Json<Booking>), BookifyError> {
    state.ensure_enabled()?;

    let duration = state.duration_or_default(payload.duration_minutes);
    let booking = book_slot(state.repo.as_ref(), payload.booking, duration)
        .await
        .map_err(|e| log_store_failure(e.into()))?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler to mark a booking as cancelled.
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/admin/bookings/{business_id}/{booking_id}/cancel",
    params(
        ("business_id" = String, Path, description = "Owning business"),
        ("booking_id" = String, Path, description = "Booking to cancel")
    ),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 404, description = "Unknown booking"),
        (status = 503, description = "Booking store unavailable or service disabled")
    ),
    tag = "Availability"
))]
pub async fn cancel_booking_handler<R: BookingRepository + 'static>(
    State(state): State<Arc<AvailabilityState<R>>>,
    Path((business_id, booking_id)): Path<(String, String)>,
) -> Result<Json<Booking>, BookifyError> {
    state.ensure_enabled()?;

    info!("Cancelling booking {} of business {}", booking_id, business_id);
    let booking = cancel_booking(state.repo.as_ref(), &business_id, &booking_id)
        .await
        .map_err(|e| log_store_failure(e.into()))?;
    Ok(Json(booking))
}

/// Handler listing the bookings of a business between two days.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/bookings",
    params(BookingsQuery),
    responses(
        (status = 200, description = "Bookings ordered by start time", body = BookingsResponse),
        (status = 400, description = "Invalid date range"),
        (status = 503, description = "Booking store unavailable or service disabled")
    ),
    tag = "Availability"
))]
pub async fn list_bookings_handler<R: BookingRepository + 'static>(
    State(state): State<Arc<AvailabilityState<R>>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<BookingsResponse>, BookifyError> {
    state.ensure_enabled()?;

    let (from, to) = parse_day_range(&query.start_date, &query.end_date)?;
    let bookings = list_bookings(
        state.repo.as_ref(),
        &query.business_id,
        from,
        to,
        query.include_cancelled,
    )
    .await
    .map_err(|e| log_store_failure(e.into()))?;

    Ok(Json(BookingsResponse { bookings }))
}
