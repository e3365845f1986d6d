//! Item Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Item CRUD operations.
//! Trip-scoped operations are in item_trip.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Item};
use super::super::db::{connected, SharedConnection};
use super::super::traits::Repository;

pub(super) const ITEM_COLUMNS: &str =
    "id, trip_id, name, category_id, is_packed, quantity, is_custom";

/// SQLite implementation of Item repository
pub struct ItemRepository {
    pub(super) conn: SharedConnection,
}

impl ItemRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

/// Insert one item and return it with its new ID
pub(super) fn insert_item(conn: &Connection, entity: &Item) -> DomainResult<Item> {
    conn.execute(
        "INSERT INTO items (trip_id, name, category_id, is_packed, quantity, is_custom, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            entity.trip_id,
            entity.name,
            entity.category_id,
            entity.is_packed,
            entity.quantity,
            entity.is_custom,
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    let mut item = entity.clone();
    item.id = conn.last_insert_rowid() as u32;
    Ok(item)
}

pub(super) fn find_item(conn: &Connection, id: u32) -> DomainResult<Option<Item>> {
    let item = conn
        .query_row(
            &format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS),
            params![id],
            row_to_item,
        )
        .optional()?;
    Ok(item)
}

#[async_trait]
impl Repository<Item> for ItemRepository {
    async fn create(&self, entity: &Item) -> DomainResult<Item> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;
        insert_item(conn, entity)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Item>> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;
        find_item(conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items ORDER BY trip_id ASC, id ASC",
            ITEM_COLUMNS
        ))?;
        let mut rows = stmt.query([])?;

        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(row_to_item(row)?);
        }
        Ok(items)
    }

    async fn update(&self, entity: &Item) -> DomainResult<Item> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let changed = conn.execute(
            "UPDATE items SET trip_id = ?, name = ?, category_id = ?, is_packed = ?, quantity = ?, is_custom = ?, updated_at = ? WHERE id = ?",
            params![
                entity.trip_id,
                entity.name,
                entity.category_id,
                entity.is_packed,
                entity.quantity,
                entity.is_custom,
                chrono::Utc::now().timestamp_millis(),
                entity.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Item {}", entity.id)));
        }

        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;
        conn.execute("DELETE FROM items WHERE id = ?", params![id])?;
        Ok(())
    }
}

/// Convert a database row to Item
pub(super) fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        trip_id: row.get(1)?,
        name: row.get(2)?,
        category_id: row.get(3)?,
        is_packed: row.get(4)?,
        quantity: row.get(5)?,
        is_custom: row.get(6)?,
    })
}
