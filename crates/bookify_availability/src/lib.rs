// --- File: crates/bookify_availability/src/lib.rs ---
pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;

pub use logic::{
    book_slot, cancel_booking, find_conflicts, is_slot_free, list_bookings, parse_day_range,
    AvailabilityError, SlotWindow,
};
