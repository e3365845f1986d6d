//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations.

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{default_categories, DomainError, DomainResult};

/// Connection shared by all SQLite repositories (None until initialized)
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
    pub path: PathBuf,
}

impl DbState {
    pub fn new(path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            path,
        }
    }

    /// Handle for repositories
    pub fn shared(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    pub async fn is_initialized(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

/// Borrow the connection out of a locked guard
pub(crate) fn connected(guard: &Option<Connection>) -> DomainResult<&Connection> {
    guard
        .as_ref()
        .ok_or_else(|| DomainError::Internal("Database not initialized".to_string()))
}

/// Open (or create) the database at `db_path` and run migrations
///
/// `:memory:` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let in_memory = db_path == Path::new(":memory:");
    let conn = if in_memory {
        Connection::open_in_memory()?
    } else {
        Connection::open(db_path)?
    };

    if !in_memory {
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        log::debug!("SQLite journal mode: {}", mode);
    }
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    run_migrations(&conn)?;
    log::info!("Database ready at {}", db_path.display());

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );
        CREATE TABLE IF NOT EXISTS trips (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            destination TEXT NOT NULL DEFAULT '',
            start_date INTEGER NOT NULL,
            end_date INTEGER NOT NULL,
            purpose TEXT NOT NULL DEFAULT '',
            activities TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER,
            updated_at INTEGER
        );
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            trip_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            is_packed INTEGER NOT NULL DEFAULT 0,
            quantity INTEGER NOT NULL DEFAULT 1,
            is_custom INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_items_trip ON items(trip_id);",
    )?;

    // Added after the first release: last-modified stamp on items
    if !column_exists(conn, "items", "updated_at")? {
        conn.execute("ALTER TABLE items ADD COLUMN updated_at INTEGER", [])
            .map_err(|e| DomainError::Internal(format!("Failed to add updated_at: {}", e)))?;
    }

    for category in default_categories() {
        conn.execute(
            "INSERT OR IGNORE INTO categories (id, name) VALUES (?, ?)",
            params![category.id, category.name],
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_in_memory() {
        let state = init_db(Path::new(":memory:")).await.expect("init failed");
        assert!(state.is_initialized().await);

        let guard = state.conn.lock().await;
        let conn = connected(&guard).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count as usize, default_categories().len());
        assert!(column_exists(conn, "items", "updated_at").unwrap());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let state = init_db(Path::new(":memory:")).await.unwrap();
        let guard = state.conn.lock().await;
        let conn = connected(&guard).unwrap();
        run_migrations(conn).expect("second run failed");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count as usize, default_categories().len());
    }

    #[tokio::test]
    async fn test_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trips.db");
        let state = init_db(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(state.path, path);
    }

    #[tokio::test]
    async fn test_uninitialized_state() {
        let state = DbState::new(PathBuf::from("unused.db"));
        assert!(!state.is_initialized().await);
        let guard = state.conn.lock().await;
        assert!(matches!(connected(&guard), Err(DomainError::Internal(_))));
    }
}
