//! Trip Pack Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - packing: Template tables and the packing-list generator
//! - repository: Data access abstractions and implementations
//! - commands: Application operations over an injected `AppState`

use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod packing;
pub mod repository;
pub mod commands;

use config::AppConfig;
use domain::{Category, DomainError, DomainResult, Trip};
use repository::{
    init_db, CategoryRepository, DbState, InMemoryCategoryRepository, InMemoryItemRepository,
    InMemoryTripRepository, ItemRepository, Repository, TripItemOperations, TripRepository,
};

/// Application state shared across commands
///
/// Repositories are trait objects so callers can pick SQLite or in-memory
/// storage when building the state.
#[derive(Clone)]
pub struct AppState {
    pub trip_repo: Arc<dyn Repository<Trip>>,
    pub item_repo: Arc<dyn TripItemOperations>,
    pub category_repo: Arc<dyn Repository<Category>>,
}

impl AppState {
    pub fn new(
        trip_repo: Arc<dyn Repository<Trip>>,
        item_repo: Arc<dyn TripItemOperations>,
        category_repo: Arc<dyn Repository<Category>>,
    ) -> Self {
        Self {
            trip_repo,
            item_repo,
            category_repo,
        }
    }

    /// SQLite-backed state sharing one connection
    pub fn from_db(db_state: &DbState) -> Self {
        Self::new(
            Arc::new(TripRepository::new(db_state.shared())),
            Arc::new(ItemRepository::new(db_state.shared())),
            Arc::new(CategoryRepository::new(db_state.shared())),
        )
    }

    /// Non-persistent state
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryTripRepository::new()),
            Arc::new(InMemoryItemRepository::new()),
            Arc::new(InMemoryCategoryRepository::new()),
        )
    }
}

/// Initialize logging and storage from `config`
///
/// A logger that is already installed (or misconfigured) is reported and
/// skipped; storage failures are returned.
pub async fn setup(config: &AppConfig) -> DomainResult<AppState> {
    if config.log.enabled {
        match config.logger_options() {
            Ok(options) => {
                if let Err(e) = rolling_logger::init_with_options(options) {
                    log::warn!("Rolling logger not installed: {}", e);
                }
            }
            Err(e) => log::warn!("Invalid log settings: {}", e),
        }
    }

    let db_path = config.db_path();
    if db_path != std::path::Path::new(":memory:") {
        std::fs::create_dir_all(&config.data_dir).map_err(|e| {
            DomainError::Internal(format!(
                "Failed to create data dir {}: {}",
                config.data_dir.display(),
                e
            ))
        })?;
    }

    match init_db(&db_path).await {
        Ok(db_state) => {
            let _ = rolling_logger::info("DB init success");
            Ok(AppState::from_db(&db_state))
        }
        Err(e) => {
            log::error!("DB init failed: {}", e);
            Err(e)
        }
    }
}
