//! In-memory booking repository for tests and local runs without a database.

use crate::error::DbError;
use crate::repositories::booking::{
    format_timestamp, Booking, BookingFilter, BookingRepository, BookingStatus, NewBooking,
};
use std::sync::{Mutex, MutexGuard};

/// Keeps bookings in a vector and enforces the same uniqueness rule as the SQL schema.
#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    bookings: Mutex<Vec<Booking>>,
    /// When set, every call fails with this message; simulates an unreachable store.
    failure: Option<String>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every operation fails like a dropped connection.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Seed a booking as-is, bypassing the uniqueness check.
    pub fn insert(&self, booking: Booking) -> Result<(), DbError> {
        self.lock()?.push(booking);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Booking>>, DbError> {
        if let Some(message) = &self.failure {
            return Err(DbError::PoolError(message.clone()));
        }
        self.bookings
            .lock()
            .map_err(|_| DbError::Other("booking store lock poisoned".to_string()))
    }
}

fn holds_slot(existing: &Booking, candidate: &Booking) -> bool {
    existing.status.occupies_slot()
        && existing.id != candidate.id
        && existing.business_id == candidate.business_id
        && existing.resource_id == candidate.resource_id
        && existing.scheduled_at == candidate.scheduled_at
}

impl BookingRepository for InMemoryBookingRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        self.lock().map(|_| ())
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<Booking, DbError> {
        let booking = booking.into_booking();
        let mut bookings = self.lock()?;
        if booking.status.occupies_slot() && bookings.iter().any(|b| holds_slot(b, &booking)) {
            return Err(DbError::Conflict(format!(
                "resource {} is already booked at {}",
                booking.resource_id,
                format_timestamp(booking.scheduled_at)
            )));
        }
        bookings.push(booking.clone());
        Ok(booking)
    }

    async fn find(&self, filter: &BookingFilter) -> Result<Vec<Booking>, DbError> {
        let mut found: Vec<Booking> = self
            .lock()?
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        found.sort_by_key(|b| b.scheduled_at);
        Ok(found)
    }

    async fn find_by_id(
        &self,
        business_id: &str,
        booking_id: &str,
    ) -> Result<Option<Booking>, DbError> {
        Ok(self
            .lock()?
            .iter()
            .find(|b| b.business_id == business_id && b.id == booking_id)
            .cloned())
    }

    async fn update_status(
        &self,
        business_id: &str,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, DbError> {
        let mut bookings = self.lock()?;
        let Some(index) = bookings
            .iter()
            .position(|b| b.business_id == business_id && b.id == booking_id)
        else {
            return Ok(None);
        };

        let mut updated = bookings[index].clone();
        updated.status = status;
        if status.occupies_slot() && bookings.iter().any(|b| holds_slot(b, &updated)) {
            return Err(DbError::Conflict(format!(
                "booking {} would double-book its slot",
                booking_id
            )));
        }
        bookings[index] = updated.clone();
        Ok(Some(updated))
    }
}
