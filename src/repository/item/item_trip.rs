//! Trip-scoped Item Operations

use async_trait::async_trait;
use rusqlite::params;

use crate::domain::{DomainError, DomainResult, Item};
use super::super::db::connected;
use super::super::traits::TripItemOperations;
use super::item_repo::{find_item, insert_item, row_to_item, ItemRepository, ITEM_COLUMNS};

#[async_trait]
impl TripItemOperations for ItemRepository {
    async fn list_by_trip(&self, trip_id: u32) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items WHERE trip_id = ? ORDER BY id ASC",
            ITEM_COLUMNS
        ))?;
        let mut rows = stmt.query(params![trip_id])?;

        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(row_to_item(row)?);
        }
        Ok(items)
    }

    async fn create_many(&self, items: &[Item]) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let tx = conn.unchecked_transaction()?;
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            created.push(insert_item(&tx, item)?);
        }
        tx.commit()?;

        log::debug!("Inserted {} items", created.len());
        Ok(created)
    }

    async fn set_packed(&self, id: u32, packed: bool) -> DomainResult<Item> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let changed = conn.execute(
            "UPDATE items SET is_packed = ?, updated_at = ? WHERE id = ?",
            params![packed, chrono::Utc::now().timestamp_millis(), id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Item {}", id)));
        }

        find_item(conn, id)?.ok_or_else(|| DomainError::NotFound(format!("Item {}", id)))
    }

    async fn set_all_packed(&self, trip_id: u32, packed: bool) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let changed = conn.execute(
            "UPDATE items SET is_packed = ?, updated_at = ? WHERE trip_id = ? AND is_packed != ?",
            params![packed, chrono::Utc::now().timestamp_millis(), trip_id, packed],
        )?;
        Ok(changed)
    }

    async fn delete_by_trip(&self, trip_id: u32) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;
        let removed = conn.execute("DELETE FROM items WHERE trip_id = ?", params![trip_id])?;
        Ok(removed)
    }

    async fn delete_generated(&self, trip_id: u32) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;
        let removed = conn.execute(
            "DELETE FROM items WHERE trip_id = ? AND is_custom = 0",
            params![trip_id],
        )?;
        Ok(removed)
    }

    async fn replace_generated(&self, trip_id: u32, items: &[Item]) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        // Dropping the transaction on error rolls the delete back too
        let tx = conn.unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM items WHERE trip_id = ? AND is_custom = 0",
            params![trip_id],
        )?;
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            created.push(insert_item(&tx, item)?);
        }
        tx.commit()?;

        log::debug!(
            "Replaced {} generated items of trip {} with {}",
            removed,
            trip_id,
            created.len()
        );
        Ok(created)
    }
}
