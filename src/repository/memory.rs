//! In-memory repositories
//!
//! Same contracts as the SQLite repositories, backed by ordered maps.
//! Used by tests and by callers that do not need persistence.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{default_categories, Category, DomainError, DomainResult, Entity, Item, Trip};
use super::traits::{Repository, TripItemOperations};

/// Rows keyed by ID with an auto-increment counter
struct Table<T> {
    next_id: u32,
    rows: BTreeMap<u32, T>,
}

impl<T: Entity<Id = u32>> Table<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    fn seeded(rows: Vec<T>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.next_id = table.next_id.max(row.id() + 1);
            table.rows.insert(row.id(), row);
        }
        table
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn replace(&mut self, entity: &T, kind: &str) -> DomainResult<()> {
        match self.rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("{} {}", kind, entity.id()))),
        }
    }
}

pub struct InMemoryTripRepository {
    table: Mutex<Table<Trip>>,
}

impl InMemoryTripRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table::new()),
        }
    }
}

impl Default for InMemoryTripRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository<Trip> for InMemoryTripRepository {
    async fn create(&self, entity: &Trip) -> DomainResult<Trip> {
        let mut table = self.table.lock().await;
        let now = chrono::Utc::now().timestamp_millis();
        let mut trip = entity.clone();
        trip.id = table.allocate();
        trip.created_at = Some(now);
        trip.updated_at = Some(now);
        table.rows.insert(trip.id, trip.clone());
        Ok(trip)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Trip>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Trip>> {
        let table = self.table.lock().await;
        let mut trips: Vec<Trip> = table.rows.values().cloned().collect();
        trips.sort_by_key(|t| (t.start_date, t.id));
        Ok(trips)
    }

    async fn update(&self, entity: &Trip) -> DomainResult<Trip> {
        let mut trip = entity.clone();
        trip.updated_at = Some(chrono::Utc::now().timestamp_millis());
        self.table.lock().await.replace(&trip, "Trip")?;
        Ok(trip)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        self.table.lock().await.rows.remove(&id);
        Ok(())
    }
}

pub struct InMemoryItemRepository {
    table: Mutex<Table<Item>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table::new()),
        }
    }
}

impl Default for InMemoryItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository<Item> for InMemoryItemRepository {
    async fn create(&self, entity: &Item) -> DomainResult<Item> {
        let mut table = self.table.lock().await;
        let mut item = entity.clone();
        item.id = table.allocate();
        table.rows.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Item>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Item>> {
        let table = self.table.lock().await;
        let mut items: Vec<Item> = table.rows.values().cloned().collect();
        items.sort_by_key(|i| (i.trip_id, i.id));
        Ok(items)
    }

    async fn update(&self, entity: &Item) -> DomainResult<Item> {
        self.table.lock().await.replace(entity, "Item")?;
        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        self.table.lock().await.rows.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TripItemOperations for InMemoryItemRepository {
    async fn list_by_trip(&self, trip_id: u32) -> DomainResult<Vec<Item>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|i| i.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn create_many(&self, items: &[Item]) -> DomainResult<Vec<Item>> {
        let mut table = self.table.lock().await;
        let mut created = Vec::with_capacity(items.len());
        for entity in items {
            let mut item = entity.clone();
            item.id = table.allocate();
            table.rows.insert(item.id, item.clone());
            created.push(item);
        }
        Ok(created)
    }

    async fn set_packed(&self, id: u32, packed: bool) -> DomainResult<Item> {
        let mut table = self.table.lock().await;
        let item = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound(format!("Item {}", id)))?;
        item.is_packed = packed;
        Ok(item.clone())
    }

    async fn set_all_packed(&self, trip_id: u32, packed: bool) -> DomainResult<usize> {
        let mut table = self.table.lock().await;
        let mut changed = 0;
        for item in table.rows.values_mut() {
            if item.trip_id == trip_id && item.is_packed != packed {
                item.is_packed = packed;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete_by_trip(&self, trip_id: u32) -> DomainResult<usize> {
        let mut table = self.table.lock().await;
        let before = table.rows.len();
        table.rows.retain(|_, i| i.trip_id != trip_id);
        Ok(before - table.rows.len())
    }

    async fn delete_generated(&self, trip_id: u32) -> DomainResult<usize> {
        let mut table = self.table.lock().await;
        let before = table.rows.len();
        table.rows.retain(|_, i| i.trip_id != trip_id || i.is_custom);
        Ok(before - table.rows.len())
    }

    async fn replace_generated(&self, trip_id: u32, items: &[Item]) -> DomainResult<Vec<Item>> {
        let mut table = self.table.lock().await;
        table.rows.retain(|_, i| i.trip_id != trip_id || i.is_custom);
        let mut created = Vec::with_capacity(items.len());
        for entity in items {
            let mut item = entity.clone();
            item.id = table.allocate();
            table.rows.insert(item.id, item.clone());
            created.push(item);
        }
        Ok(created)
    }
}

pub struct InMemoryCategoryRepository {
    table: Mutex<Table<Category>>,
}

impl InMemoryCategoryRepository {
    /// Starts with the default categories, like a freshly migrated database
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table::seeded(default_categories())),
        }
    }
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository<Category> for InMemoryCategoryRepository {
    async fn create(&self, entity: &Category) -> DomainResult<Category> {
        let mut table = self.table.lock().await;
        if table.rows.values().any(|c| c.name == entity.name) {
            return Err(DomainError::Conflict(format!(
                "Category '{}' already exists",
                entity.name
            )));
        }
        let mut category = entity.clone();
        category.id = table.allocate();
        table.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Category>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Category>> {
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn update(&self, entity: &Category) -> DomainResult<Category> {
        let mut table = self.table.lock().await;
        if table
            .rows
            .values()
            .any(|c| c.name == entity.name && c.id != entity.id)
        {
            return Err(DomainError::Conflict(format!(
                "Category '{}' already exists",
                entity.name
            )));
        }
        table.replace(entity, "Category")?;
        Ok(entity.clone())
    }

    /// Does not check item references; nothing links the two fakes
    async fn delete(&self, id: u32) -> DomainResult<()> {
        self.table.lock().await.rows.remove(&id);
        Ok(())
    }
}
