//! Category Entity
//!
//! Categories group packing items in the list view.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

pub const ESSENTIALS: u32 = 1;
pub const CLOTHING: u32 = 2;
pub const TOILETRIES: u32 = 3;
pub const ELECTRONICS: u32 = 4;
pub const DOCUMENTS: u32 = 5;
pub const WEATHER_GEAR: u32 = 6;
pub const ACTIVITY_GEAR: u32 = 7;
pub const WORK: u32 = 8;
pub const MISCELLANEOUS: u32 = 9;

/// A packing category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

impl Category {
    pub fn new(id: u32, name: String) -> Self {
        Self { id, name }
    }
}

impl Entity for Category {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Seed categories, referenced by id from the template tables
pub fn default_categories() -> Vec<Category> {
    [
        (ESSENTIALS, "Essentials"),
        (CLOTHING, "Clothing"),
        (TOILETRIES, "Toiletries"),
        (ELECTRONICS, "Electronics"),
        (DOCUMENTS, "Documents"),
        (WEATHER_GEAR, "Weather Gear"),
        (ACTIVITY_GEAR, "Activity Gear"),
        (WORK, "Work"),
        (MISCELLANEOUS, "Miscellaneous"),
    ]
    .into_iter()
    .map(|(id, name)| Category::new(id, name.to_string()))
    .collect()
}
