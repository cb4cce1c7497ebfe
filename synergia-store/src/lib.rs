pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod memory_repo;
pub mod offline_repo;

pub use booking_repo::PgBookingRepository;
pub use database::{open_repository, DbClient};
pub use memory_repo::MemoryBookingRepository;
pub use offline_repo::OfflineBookingRepository;
