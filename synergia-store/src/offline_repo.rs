use async_trait::async_trait;
use synergia_core::{
    Booking, BookingId, BookingPatch, BookingRepository, NewBooking, StoreError, StoreResult,
};

/// Used when no database could be configured at startup. Every call fails.
pub struct OfflineBookingRepository {
    reason: String,
}

impl OfflineBookingRepository {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    fn unavailable<T>(&self) -> StoreResult<T> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

#[async_trait]
impl BookingRepository for OfflineBookingRepository {
    async fn list(&self) -> StoreResult<Vec<Booking>> {
        self.unavailable()
    }

    async fn create(&self, _booking: NewBooking) -> StoreResult<Booking> {
        self.unavailable()
    }

    async fn get(&self, _id: BookingId) -> StoreResult<Option<Booking>> {
        self.unavailable()
    }

    async fn update(&self, _id: BookingId, _patch: BookingPatch) -> StoreResult<Option<Booking>> {
        self.unavailable()
    }

    async fn delete(&self, _id: BookingId) -> StoreResult<Option<Booking>> {
        self.unavailable()
    }

    async fn search_by_email(&self, _needle: &str) -> StoreResult<Vec<Booking>> {
        self.unavailable()
    }

    async fn filter_by_event(&self, _needle: &str) -> StoreResult<Vec<Booking>> {
        self.unavailable()
    }
}
