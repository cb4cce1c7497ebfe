use async_trait::async_trait;
use synergia_core::booking::contains_ignore_case;
use synergia_core::{Booking, BookingId, BookingPatch, BookingRepository, NewBooking, StoreResult};
use tokio::sync::RwLock;

/// In-process booking store. Keeps creation order and matches searches the
/// same way the Postgres store does.
#[derive(Default)]
pub struct MemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_matching<F>(&self, field: F, needle: &str) -> Vec<Booking>
    where
        F: Fn(&Booking) -> &str,
    {
        self.bookings
            .read()
            .await
            .iter()
            .filter(|b| contains_ignore_case(field(b), needle))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn list(&self) -> StoreResult<Vec<Booking>> {
        Ok(self.bookings.read().await.clone())
    }

    async fn create(&self, booking: NewBooking) -> StoreResult<Booking> {
        let booking = booking.into_booking(BookingId::new());
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: BookingId) -> StoreResult<Option<Booking>> {
        Ok(self.bookings.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn update(&self, id: BookingId, patch: BookingPatch) -> StoreResult<Option<Booking>> {
        let mut bookings = self.bookings.write().await;
        Ok(bookings.iter_mut().find(|b| b.id == id).map(|booking| {
            booking.apply(patch);
            booking.clone()
        }))
    }

    async fn delete(&self, id: BookingId) -> StoreResult<Option<Booking>> {
        let mut bookings = self.bookings.write().await;
        Ok(bookings
            .iter()
            .position(|b| b.id == id)
            .map(|idx| bookings.remove(idx)))
    }

    async fn search_by_email(&self, needle: &str) -> StoreResult<Vec<Booking>> {
        Ok(self.find_matching(|b| b.email.as_str(), needle).await)
    }

    async fn filter_by_event(&self, needle: &str) -> StoreResult<Vec<Booking>> {
        Ok(self.find_matching(|b| b.event.as_str(), needle).await)
    }
}
