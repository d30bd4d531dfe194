//! Booking store for Bookify
//!
//! A database agnostic client on top of SQLx plus the booking repository used by
//! the availability service. SQLite is the default backend; PostgreSQL is
//! available through the `postgres` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use bookify_db::{BookingRepository, DbClient, SqlBookingRepository};
//!
//! async fn setup() -> Result<SqlBookingRepository, bookify_db::DbError> {
//!     let client = DbClient::from_url("sqlite:data/bookify.db").await?;
//!     let repo = SqlBookingRepository::new(client);
//!     repo.init_schema().await?;
//!     Ok(repo)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;

pub use client::DbClient;
pub use error::DbError;
pub use repositories::{
    Booking, BookingFilter, BookingRepository, BookingStatus, InMemoryBookingRepository,
    NewBooking, SqlBookingRepository, StatusFilter,
};
