//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{Entity, DomainResult, Item};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity, returning it with its assigned ID
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity (`NotFound` if it does not exist)
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Item operations scoped to a trip
#[async_trait]
pub trait TripItemOperations: Repository<Item> {
    /// Items of a trip in insertion order
    async fn list_by_trip(&self, trip_id: u32) -> DomainResult<Vec<Item>>;

    /// Insert a batch, all or nothing
    async fn create_many(&self, items: &[Item]) -> DomainResult<Vec<Item>>;

    /// Set the packed flag of one item
    async fn set_packed(&self, id: u32, packed: bool) -> DomainResult<Item>;

    /// Set the packed flag of every item in a trip, returning how many changed
    async fn set_all_packed(&self, trip_id: u32, packed: bool) -> DomainResult<usize>;

    /// Remove every item of a trip
    async fn delete_by_trip(&self, trip_id: u32) -> DomainResult<usize>;

    /// Remove the generated (non-custom) items of a trip
    async fn delete_generated(&self, trip_id: u32) -> DomainResult<usize>;

    /// Swap a trip's generated items for `items`, all or nothing
    ///
    /// Returns the inserted items with their IDs. Custom items are untouched.
    async fn replace_generated(&self, trip_id: u32, items: &[Item]) -> DomainResult<Vec<Item>>;
}
