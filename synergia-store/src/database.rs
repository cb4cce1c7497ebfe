use std::sync::Arc;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use synergia_core::BookingRepository;
use tracing::{error, info, warn};

use crate::app_config::DatabaseConfig;
use crate::{OfflineBookingRepository, PgBookingRepository};

pub static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str, settings: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = Self::pool_options(settings)
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    /// Builds the pool without opening a connection; connections are
    /// attempted on first use.
    pub fn new_lazy(connection_string: &str, settings: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = Self::pool_options(settings).connect_lazy(connection_string)?;
        Ok(Self { pool })
    }

    fn pool_options(settings: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_seconds))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        MIGRATOR.run(&self.pool).await?;
        info!("Migrations completed successfully.");
        Ok(())
    }
}

/// Opens the booking store once for the process lifetime.
///
/// A failed connection never stops startup: the pool falls back to lazy
/// connects so each request reports its own storage error, and a missing or
/// unusable connection string yields an [`OfflineBookingRepository`].
pub async fn open_repository(settings: &DatabaseConfig) -> Arc<dyn BookingRepository> {
    let Some(url) = settings.url.as_deref() else {
        error!("Database connection error: no connection string configured");
        return Arc::new(OfflineBookingRepository::new("no connection string configured"));
    };

    match DbClient::new(url, settings).await {
        Ok(db) => {
            info!("Connected to database");
            if !settings.run_migrations {
                return Arc::new(PgBookingRepository::new(db.pool));
            }
            match db.migrate().await {
                Ok(()) => Arc::new(PgBookingRepository::new(db.pool)),
                Err(e) => {
                    error!("Database migration error: {}", e);
                    Arc::new(PgBookingRepository::migrating(db.pool))
                }
            }
        }
        Err(e) => {
            error!("Database connection error: {}", e);
            match DbClient::new_lazy(url, settings) {
                Ok(db) => {
                    warn!("Serving requests without a verified database connection");
                    if settings.run_migrations {
                        Arc::new(PgBookingRepository::migrating(db.pool))
                    } else {
                        Arc::new(PgBookingRepository::new(db.pool))
                    }
                }
                Err(e) => Arc::new(OfflineBookingRepository::new(e.to_string())),
            }
        }
    }
}
