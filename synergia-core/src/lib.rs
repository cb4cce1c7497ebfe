pub mod booking;
pub mod repository;

pub use booking::{Booking, BookingId, BookingPatch, CreateBookingRequest, NewBooking};
pub use repository::{BookingRepository, StoreError, StoreResult};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
