//! Item Repository Module
//!
//! - item_repo: Core CRUD operations
//! - item_trip: Trip-scoped operations (batch insert, packed state, cleanup)

mod item_repo;
mod item_trip;

pub use item_repo::ItemRepository;
