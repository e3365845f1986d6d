//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod item;
mod trip_repo;
mod category_repo;
mod memory;


pub use traits::{Repository, TripItemOperations};
pub use db::{init_db, DbState, SharedConnection};
pub use item::ItemRepository;
pub use trip_repo::TripRepository;
pub use category_repo::CategoryRepository;
pub use memory::{InMemoryCategoryRepository, InMemoryItemRepository, InMemoryTripRepository};
