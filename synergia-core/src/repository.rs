use async_trait::async_trait;

use crate::booking::{Booking, BookingId, BookingPatch, NewBooking};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Cast to BookingId failed for value \"{value}\": {reason}")]
    InvalidId { value: String, reason: String },
    #[error("{0}")]
    Database(String),
    #[error("Booking store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// All bookings in creation order.
    async fn list(&self) -> StoreResult<Vec<Booking>>;

    async fn create(&self, booking: NewBooking) -> StoreResult<Booking>;

    async fn get(&self, id: BookingId) -> StoreResult<Option<Booking>>;

    /// Returns the booking as stored after the patch, or `None` if the id is unknown.
    async fn update(&self, id: BookingId, patch: BookingPatch) -> StoreResult<Option<Booking>>;

    /// Returns the removed booking, or `None` if the id is unknown.
    async fn delete(&self, id: BookingId) -> StoreResult<Option<Booking>>;

    /// Bookings whose email contains `needle`, ignoring case.
    async fn search_by_email(&self, needle: &str) -> StoreResult<Vec<Booking>>;

    /// Bookings whose event contains `needle`, ignoring case.
    async fn filter_by_event(&self, needle: &str) -> StoreResult<Vec<Booking>>;
}
