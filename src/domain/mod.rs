//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO storage dependencies beyond error conversions.

mod entity;
mod item;
pub mod category;
mod trip;
mod template;
mod weather;
mod summary;

pub use entity::{Entity, DomainError, DomainResult};
pub use item::Item;
pub use category::{Category, default_categories};
pub use trip::{Trip, NewTrip, duration_days};
pub use template::{Conditions, DurationRange, TemplateItem, TripContext, normalize_key};
pub use weather::WeatherBucket;
pub use summary::{CategoryGroup, PackingProgress, group_by_category};
