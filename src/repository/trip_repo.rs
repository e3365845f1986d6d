//! Trip Repository
//!
//! SQLite-backed implementation for Trip CRUD operations.
//! Dates are stored as UTC milliseconds, activities as a JSON array.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Trip};
use super::db::{connected, SharedConnection};
use super::traits::Repository;

const TRIP_COLUMNS: &str =
    "id, name, destination, start_date, end_date, purpose, activities, created_at, updated_at";

/// SQLite implementation of Trip repository
pub struct TripRepository {
    conn: SharedConnection,
}

impl TripRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Trip> for TripRepository {
    async fn create(&self, entity: &Trip) -> DomainResult<Trip> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let now = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO trips (name, destination, start_date, end_date, purpose, activities, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                entity.name,
                entity.destination,
                entity.start_date.timestamp_millis(),
                entity.end_date.timestamp_millis(),
                entity.purpose,
                serde_json::to_string(&entity.activities)?,
                now,
                now
            ],
        )?;

        let mut trip = entity.clone();
        trip.id = conn.last_insert_rowid() as u32;
        trip.created_at = Some(now);
        trip.updated_at = Some(now);
        Ok(trip)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Trip>> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let raw = conn
            .query_row(
                &format!("SELECT {} FROM trips WHERE id = ?", TRIP_COLUMNS),
                params![id],
                TripRow::from_row,
            )
            .optional()?;
        raw.map(TripRow::into_trip).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Trip>> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM trips ORDER BY start_date ASC, id ASC",
            TRIP_COLUMNS
        ))?;
        let mut rows = stmt.query([])?;

        let mut trips = Vec::new();
        while let Some(row) = rows.next()? {
            trips.push(TripRow::from_row(row)?.into_trip()?);
        }
        Ok(trips)
    }

    async fn update(&self, entity: &Trip) -> DomainResult<Trip> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let now = chrono::Utc::now().timestamp_millis();
        let changed = conn.execute(
            "UPDATE trips SET name = ?, destination = ?, start_date = ?, end_date = ?, purpose = ?, activities = ?, updated_at = ? WHERE id = ?",
            params![
                entity.name,
                entity.destination,
                entity.start_date.timestamp_millis(),
                entity.end_date.timestamp_millis(),
                entity.purpose,
                serde_json::to_string(&entity.activities)?,
                now,
                entity.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Trip {}", entity.id)));
        }

        let mut trip = entity.clone();
        trip.updated_at = Some(now);
        Ok(trip)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;
        conn.execute("DELETE FROM trips WHERE id = ?", params![id])?;
        Ok(())
    }
}

/// Raw column values; decoding dates and JSON happens outside rusqlite
struct TripRow {
    id: u32,
    name: String,
    destination: String,
    start_date: i64,
    end_date: i64,
    purpose: String,
    activities: String,
    created_at: Option<i64>,
    updated_at: Option<i64>,
}

impl TripRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            destination: row.get(2)?,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
            purpose: row.get(5)?,
            activities: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_trip(self) -> DomainResult<Trip> {
        Ok(Trip {
            id: self.id,
            name: self.name,
            destination: self.destination,
            start_date: from_millis(self.start_date)?,
            end_date: from_millis(self.end_date)?,
            purpose: self.purpose,
            activities: serde_json::from_str(&self.activities)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn from_millis(ms: i64) -> DomainResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| DomainError::Internal(format!("Invalid stored timestamp {}", ms)))
}
