// --- File: crates/bookify_availability/src/routes.rs ---

use crate::handlers::{
    book_slot_handler, cancel_booking_handler, check_conflicts_handler, list_bookings_handler,
    AvailabilityState,
};
use axum::{
    routing::{get, patch, post},
    Router,
};
use bookify_config::AppConfig;
use bookify_db::BookingRepository;
use std::sync::Arc;

/// Creates a router containing the conflict check and booking administration routes,
/// backed by the given booking repository.
pub fn routes<R: BookingRepository + 'static>(config: Arc<AppConfig>, repo: Arc<R>) -> Router {
    let availability_state = Arc::new(AvailabilityState { config, repo });

    Router::new()
        .route(
            "/availability/conflicts",
            get(check_conflicts_handler::<R>),
        )
        .route("/bookings", post(book_slot_handler::<R>))
        .route(
            "/admin/bookings/{business_id}/{booking_id}/cancel",
            patch(cancel_booking_handler::<R>),
        )
        .route("/admin/bookings", get(list_bookings_handler::<R>))
        .with_state(availability_state)
}
