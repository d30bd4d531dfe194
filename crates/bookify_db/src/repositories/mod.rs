//! Repository modules for database access

pub mod booking;
pub mod booking_memory;
pub mod booking_sql;

pub use booking::{
    Booking, BookingFilter, BookingRepository, BookingStatus, NewBooking, StatusFilter,
};
pub use booking_memory::InMemoryBookingRepository;
pub use booking_sql::SqlBookingRepository;
