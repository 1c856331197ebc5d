//! SQLite store for fare history and the notification ledger.

use crate::entry::{NotificationEntry, PriceHistoryEntry};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use farewatch_core::Money;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Append-only store owning the `price_history` and `notifications`
/// tables. No other component writes persisted state.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open the database at `url`, creating it if missing, and run
    /// migrations.
    ///
    /// A single connection is enough: checks run strictly one at a time.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS price_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                observed_at TEXT NOT NULL,
                travel_date TEXT NOT NULL,
                origin TEXT NOT NULL,
                destination TEXT NOT NULL,
                departure_time TEXT NOT NULL,
                arrival_time TEXT NOT NULL,
                train_number TEXT NOT NULL,
                duration TEXT NOT NULL DEFAULT '',
                price_cents INTEGER NOT NULL,
                route_label TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sent_at TEXT NOT NULL,
                travel_date TEXT NOT NULL,
                route_label TEXT NOT NULL,
                train_number TEXT NOT NULL,
                price_cents INTEGER NOT NULL,
                message TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_recent_notifications
            ON notifications(travel_date, route_label, train_number, sent_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append one fare observation.
    pub async fn record_observation(&self, entry: &PriceHistoryEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO price_history
            (observed_at, travel_date, origin, destination, departure_time,
             arrival_time, train_number, duration, price_cents, route_label)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.observed_at)
        .bind(entry.travel_date)
        .bind(&entry.origin)
        .bind(&entry.destination)
        .bind(entry.departure_time)
        .bind(entry.arrival_time)
        .bind(&entry.train_number)
        .bind(&entry.duration)
        .bind(entry.price.0)
        .bind(&entry.route_label)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append one delivered notification.
    ///
    /// Call only after the transport confirmed delivery.
    pub async fn record_notification(&self, entry: &NotificationEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO notifications
            (sent_at, travel_date, route_label, train_number, price_cents, message)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.sent_at)
        .bind(entry.travel_date)
        .bind(&entry.route_label)
        .bind(&entry.train_number)
        .bind(entry.price.0)
        .bind(&entry.message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// True iff a notification for the exact (travel date, route label,
    /// train number) triple was sent within the last `within_hours` hours.
    ///
    /// Keyed on the triple, not on price: a second, cheaper fare for the
    /// same train inside the window is still suppressed. Timestamps are
    /// compared in their stored form; both sides are written by the same
    /// encoder.
    pub async fn has_recent_notification(
        &self,
        travel_date: NaiveDate,
        route_label: &str,
        train_number: &str,
        within_hours: i64,
    ) -> Result<bool, StoreError> {
        let cutoff = Utc::now() - Duration::hours(within_hours);
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE travel_date = ? AND route_label = ? AND train_number = ?
              AND sent_at > ?
            "#,
        )
        .bind(travel_date)
        .bind(route_label)
        .bind(train_number)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Number of fare observations on file.
    pub async fn observation_count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM price_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of notifications on file.
    pub async fn notification_count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Most recent observations, newest first.
    pub async fn recent_observations(
        &self,
        limit: i64,
    ) -> Result<Vec<PriceHistoryEntry>, StoreError> {
        type Row = (
            i64,
            DateTime<Utc>,
            NaiveDate,
            String,
            String,
            NaiveTime,
            NaiveTime,
            String,
            String,
            i64,
            String,
        );
        let rows = sqlx::query_as::<_, Row>(
            r#"
            SELECT id, observed_at, travel_date, origin, destination,
                   departure_time, arrival_time, train_number, duration,
                   price_cents, route_label
            FROM price_history
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    id,
                    observed_at,
                    travel_date,
                    origin,
                    destination,
                    departure_time,
                    arrival_time,
                    train_number,
                    duration,
                    price_cents,
                    route_label,
                )| PriceHistoryEntry {
                    id,
                    observed_at,
                    travel_date,
                    origin,
                    destination,
                    departure_time,
                    arrival_time,
                    train_number,
                    duration,
                    price: Money(price_cents),
                    route_label,
                },
            )
            .collect())
    }
}
