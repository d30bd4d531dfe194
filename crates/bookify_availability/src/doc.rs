// File: crates/bookify_availability/src/doc.rs
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    BookSlotRequest, BookingsQuery, BookingsResponse, ConflictQuery, ConflictResponse,
};
use bookify_db::{Booking, BookingStatus, NewBooking};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::check_conflicts_handler,
        crate::handlers::book_slot_handler,
        crate::handlers::cancel_booking_handler,
        crate::handlers::list_bookings_handler
    ),
    components(schemas(
        ConflictQuery,
        ConflictResponse,
        BookSlotRequest,
        BookingsQuery,
        BookingsResponse,
        Booking,
        BookingStatus,
        NewBooking
    )),
    tags((name = "Availability", description = "Slot conflict checks and booking administration"))
)]
pub struct AvailabilityApiDoc;
