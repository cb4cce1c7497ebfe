use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::OnceCell;
use synergia_core::{
    Booking, BookingId, BookingPatch, BookingRepository, NewBooking, StoreError, StoreResult,
};
use uuid::Uuid;

use crate::database::MIGRATOR;

const COLUMNS: &str = "id, name, email, event, ticket_type, created_at";

pub struct PgBookingRepository {
    pool: PgPool,
    schema: OnceCell<()>,
}

impl PgBookingRepository {
    /// For a pool whose schema is already migrated.
    pub fn new(pool: PgPool) -> Self {
        Self { pool, schema: OnceCell::new_with(Some(())) }
    }

    /// Migrations run before the first query and are retried on every call
    /// until they succeed.
    pub fn migrating(pool: PgPool) -> Self {
        Self { pool, schema: OnceCell::new() }
    }

    pub fn schema_ready(&self) -> bool {
        self.schema.initialized()
    }

    async fn ready(&self) -> StoreResult<()> {
        self.schema
            .get_or_try_init(|| async {
                MIGRATOR
                    .run(&self.pool)
                    .await
                    .map_err(|e| StoreError::Database(e.to_string()))
            })
            .await?;
        Ok(())
    }

    /// Literal substring match on `column`; `strpos` keeps `%` and `_` in
    /// the needle from acting as wildcards.
    async fn find_containing(&self, column: &str, needle: &str) -> StoreResult<Vec<Booking>> {
        self.ready().await?;
        let sql = format!(
            "SELECT {COLUMNS} FROM bookings WHERE strpos(lower({column}), lower($1)) > 0 ORDER BY seq"
        );
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(needle)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    name: String,
    email: String,
    event: String,
    ticket_type: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: BookingId(row.id),
            name: row.name,
            email: row.email,
            event: row.event,
            ticket_type: row.ticket_type,
            created_at: row.created_at,
        }
    }
}

fn db_error(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn list(&self) -> StoreResult<Vec<Booking>> {
        self.ready().await?;
        let sql = format!("SELECT {COLUMNS} FROM bookings ORDER BY seq");
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn create(&self, booking: NewBooking) -> StoreResult<Booking> {
        self.ready().await?;
        let sql = format!(
            r#"
            INSERT INTO bookings (name, email, event, ticket_type, created_at)
            VALUES ($1, $2, $3, $4, COALESCE($5, now()))
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(&booking.name)
            .bind(&booking.email)
            .bind(&booking.event)
            .bind(&booking.ticket_type)
            .bind(booking.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.into())
    }

    async fn get(&self, id: BookingId) -> StoreResult<Option<Booking>> {
        self.ready().await?;
        let sql = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Booking::from))
    }

    async fn update(&self, id: BookingId, patch: BookingPatch) -> StoreResult<Option<Booking>> {
        self.ready().await?;
        let (set_ticket_type, ticket_type) = match patch.ticket_type {
            Some(value) => (true, value),
            None => (false, None),
        };

        let sql = format!(
            r#"
            UPDATE bookings SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                event = COALESCE($4, event),
                ticket_type = CASE WHEN $5 THEN $6 ELSE ticket_type END,
                created_at = COALESCE($7, created_at)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id.0)
            .bind(patch.name)
            .bind(patch.email)
            .bind(patch.event)
            .bind(set_ticket_type)
            .bind(ticket_type)
            .bind(patch.created_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Booking::from))
    }

    async fn delete(&self, id: BookingId) -> StoreResult<Option<Booking>> {
        self.ready().await?;
        let sql = format!("DELETE FROM bookings WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Booking::from))
    }

    async fn search_by_email(&self, needle: &str) -> StoreResult<Vec<Booking>> {
        self.find_containing("email", needle).await
    }

    async fn filter_by_event(&self, needle: &str) -> StoreResult<Vec<Booking>> {
        self.find_containing("event", needle).await
    }
}
