//! `PostgreSQL` implementation of [`BookingStore`].
//!
//! # Tables
//!
//! - `bookings(id, member_name, date, start_time, party_size, status, created_at)`
//! - `amenities(id, name)`
//! - `booking_amenities(booking_id, amenity_id)`
//!
//! # Admission
//!
//! `create_booking` runs entirely inside one transaction:
//!
//! 1. `pg_advisory_xact_lock` keyed on the slot (released at commit/rollback)
//! 2. Read the active party total for the slot and apply the capacity guard
//! 3. Insert the booking row
//! 4. Resolve amenity names and insert the links
//! 5. Commit
//!
//! Two requests for the same slot serialize on step 1, so the total read in
//! step 2 always includes every committed competitor. Requests for different
//! slots take different locks and never wait on each other.
//!
//! Amenity names are ordered with the database's default collation.

use crate::config::PostgresConfig;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use slotbook_core::booking_store::BookingStore;
use slotbook_core::capacity::CapacityGuard;
use slotbook_core::error::BookingError;
use slotbook_core::types::{
    Booking, BookingId, BookingStatus, MemberName, NewBooking, PartySize, Slot, StartTime,
};
use sqlx::{PgConnection, PgPool};
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use uuid::Uuid;

/// Histogram: duration of the admission transaction in seconds.
pub const CREATE_TRANSACTION_SECONDS: &str = "slotbook_create_transaction_seconds";

const SLOT_TOTAL_SQL: &str = "
    SELECT COALESCE(SUM(party_size), 0)::BIGINT
    FROM bookings
    WHERE date = $1
      AND start_time = $2
      AND status = 'active'
";

const LIST_SQL: &str = r#"
    SELECT
        b.id,
        b.member_name,
        b.date,
        b.start_time,
        b.party_size,
        b.status,
        b.created_at,
        COALESCE(
            ARRAY_AGG(a.name ORDER BY a.name)
                FILTER (WHERE a.name IS NOT NULL),
            '{}'
        ) AS amenities
    FROM bookings b
    LEFT JOIN booking_amenities ba ON ba.booking_id = b.id
    LEFT JOIN amenities a ON a.id = ba.amenity_id
    GROUP BY b.id
    ORDER BY b.date, b.start_time, b.created_at, b.id
"#;

/// One row of the listing query.
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    member_name: String,
    date: NaiveDate,
    start_time: NaiveTime,
    party_size: i32,
    status: String,
    created_at: DateTime<Utc>,
    amenities: Vec<String>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = BookingError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let member_name = MemberName::new(row.member_name).ok_or_else(|| {
            BookingError::persistence(format!("Booking {} has an empty member name", row.id))
        })?;
        let party_size = u32::try_from(row.party_size)
            .ok()
            .and_then(PartySize::new)
            .ok_or_else(|| {
                BookingError::persistence(format!(
                    "Booking {} has invalid party size {}",
                    row.id, row.party_size
                ))
            })?;
        let status = BookingStatus::parse(&row.status).ok_or_else(|| {
            BookingError::persistence(format!(
                "Booking {} has unknown status {}",
                row.id, row.status
            ))
        })?;

        Ok(Self {
            id: BookingId::from_uuid(row.id),
            member_name,
            date: row.date,
            start_time: StartTime::new(row.start_time),
            party_size,
            status,
            amenities: row.amenities,
            created_at: row.created_at,
        })
    }
}

/// `PostgreSQL`-backed booking store.
///
/// # Example
///
/// ```no_run
/// use slotbook_postgres::{PostgresBookingStore, PostgresConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = PostgresBookingStore::connect(&PostgresConfig::with_url("postgres://localhost/slotbook")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Connect a new pool using `config`.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the URL is invalid or the database is unreachable.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, BookingError> {
        let options = config
            .connect_options()
            .map_err(|e| BookingError::persistence(format!("Invalid database URL: {e}")))?;
        let pool = config
            .pool_options()
            .connect_with(options)
            .await
            .map_err(|e| BookingError::persistence(format!("Failed to connect to database: {e}")))?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn slot_total_on(conn: &mut PgConnection, slot: Slot) -> Result<u64, BookingError> {
        let (total,): (i64,) = sqlx::query_as(SLOT_TOTAL_SQL)
            .bind(slot.date)
            .bind(slot.start_time.as_naive())
            .fetch_one(conn)
            .await
            .map_err(|e| BookingError::persistence(format!("Failed to read slot total: {e}")))?;

        u64::try_from(total)
            .map_err(|_| BookingError::persistence(format!("Negative party total {total} for {slot}")))
    }

    #[tracing::instrument(skip(self, booking, guard), fields(slot = %booking.slot, party_size = booking.party_size.get()))]
    async fn create(&self, booking: NewBooking, guard: CapacityGuard) -> Result<Booking, BookingError> {
        let started = Instant::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BookingError::persistence(format!("Failed to start transaction: {e}")))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(booking.slot.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| BookingError::persistence(format!("Failed to lock slot: {e}")))?;

        let current_total = Self::slot_total_on(&mut tx, booking.slot).await?;
        if let Err(rejection) = guard.check(current_total, booking.party_size) {
            // Nothing written; the lock goes with the connection either way
            if let Err(e) = tx.rollback().await {
                tracing::warn!(error = %e, "Failed to roll back rejected booking");
            }
            tracing::debug!(current_total, "Slot full under lock");
            return Err(rejection);
        }

        let party_size = i32::try_from(booking.party_size.get())
            .map_err(|_| BookingError::persistence("Party size exceeds column range"))?;

        let (id, created_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO bookings (member_name, date, start_time, party_size, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, created_at",
        )
        .bind(booking.member_name.as_str())
        .bind(booking.slot.date)
        .bind(booking.slot.start_time.as_naive())
        .bind(party_size)
        .bind(BookingStatus::Active.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| BookingError::persistence(format!("Failed to insert booking: {e}")))?;

        let resolved: Vec<(Uuid, String)> = if booking.amenity_names.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as("SELECT id, name FROM amenities WHERE name = ANY($1) ORDER BY name")
            .bind(&booking.amenity_names)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| BookingError::persistence(format!("Failed to resolve amenities: {e}")))?
        };

        if !resolved.is_empty() {
            let amenity_ids: Vec<Uuid> = resolved.iter().map(|(amenity_id, _)| *amenity_id).collect();
            sqlx::query(
                "INSERT INTO booking_amenities (booking_id, amenity_id)
                 SELECT $1, UNNEST($2::uuid[])",
            )
            .bind(id)
            .bind(&amenity_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| BookingError::persistence(format!("Failed to link amenities: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| BookingError::persistence(format!("Failed to commit booking: {e}")))?;

        metrics::histogram!(CREATE_TRANSACTION_SECONDS).record(started.elapsed().as_secs_f64());

        Ok(Booking {
            id: BookingId::from_uuid(id),
            member_name: booking.member_name,
            date: booking.slot.date,
            start_time: booking.slot.start_time,
            party_size: booking.party_size,
            status: BookingStatus::Active,
            amenities: resolved.into_iter().map(|(_, name)| name).collect(),
            created_at,
        })
    }

    async fn list(&self) -> Result<Vec<Booking>, BookingError> {
        let rows: Vec<BookingRow> = sqlx::query_as(LIST_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BookingError::persistence(format!("Failed to list bookings: {e}")))?;

        rows.into_iter().map(Booking::try_from).collect()
    }
}

impl BookingStore for PostgresBookingStore {
    fn slot_total(
        &self,
        slot: Slot,
    ) -> Pin<Box<dyn Future<Output = Result<u64, BookingError>> + Send + '_>> {
        Box::pin(async move {
            let mut conn = self
                .pool
                .acquire()
                .await
                .map_err(|e| BookingError::persistence(format!("Failed to acquire connection: {e}")))?;
            Self::slot_total_on(&mut conn, slot).await
        })
    }

    fn create_booking(
        &self,
        booking: NewBooking,
        guard: CapacityGuard,
    ) -> Pin<Box<dyn Future<Output = Result<Booking, BookingError>> + Send + '_>> {
        Box::pin(self.create(booking, guard))
    }

    fn list_bookings(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Booking>, BookingError>> + Send + '_>> {
        Box::pin(self.list())
    }
}
