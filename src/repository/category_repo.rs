//! Category Repository
//!
//! SQLite-backed implementation for Category CRUD operations.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{Category, DomainError, DomainResult};
use super::db::{connected, SharedConnection};
use super::traits::Repository;

/// SQLite implementation of Category repository
pub struct CategoryRepository {
    conn: SharedConnection,
}

impl CategoryRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

/// Names are unique; surface the constraint as a Conflict
fn map_unique(e: rusqlite::Error, name: &str) -> DomainError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DomainError::Conflict(format!("Category '{}' already exists", name))
        }
        other => other.into(),
    }
}

#[async_trait]
impl Repository<Category> for CategoryRepository {
    async fn create(&self, entity: &Category) -> DomainResult<Category> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        conn.execute("INSERT INTO categories (name) VALUES (?)", params![entity.name])
            .map_err(|e| map_unique(e, &entity.name))?;

        let mut category = entity.clone();
        category.id = conn.last_insert_rowid() as u32;
        Ok(category)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Category>> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let category = conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?",
                params![id],
                row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    async fn list(&self) -> DomainResult<Vec<Category>> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id")?;
        let mut rows = stmt.query([])?;

        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(row_to_category(row)?);
        }
        Ok(categories)
    }

    async fn update(&self, entity: &Category) -> DomainResult<Category> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let changed = conn
            .execute(
                "UPDATE categories SET name = ? WHERE id = ?",
                params![entity.name, entity.id],
            )
            .map_err(|e| map_unique(e, &entity.name))?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Category {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connected(&guard)?;

        let in_use: i64 = conn.query_row(
            "SELECT COUNT(*) FROM items WHERE category_id = ?",
            params![id],
            |row| row.get(0),
        )?;
        if in_use > 0 {
            return Err(DomainError::Conflict(format!(
                "Category {} is used by {} items",
                id, in_use
            )));
        }

        conn.execute("DELETE FROM categories WHERE id = ?", params![id])?;
        Ok(())
    }
}

fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
