//! Item Entity
//!
//! A single line of a trip's packing list.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A packing item belonging to one trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier (0 until stored)
    pub id: u32,
    /// Owning trip
    pub trip_id: u32,
    /// Display name, unique within a generated list
    pub name: String,
    /// Category this item is grouped under
    pub category_id: u32,
    /// Packed status
    pub is_packed: bool,
    pub quantity: u32,
    /// Added by the user rather than generated
    pub is_custom: bool,
}

impl Item {
    /// Create an unsaved generated item
    pub fn generated(trip_id: u32, name: String, category_id: u32, quantity: u32) -> Self {
        Self {
            id: 0,
            trip_id,
            name,
            category_id,
            is_packed: false,
            quantity,
            is_custom: false,
        }
    }

    /// Create an unsaved user-added item
    pub fn custom(trip_id: u32, name: String, category_id: u32, quantity: u32) -> Self {
        Self {
            is_custom: true,
            ..Self::generated(trip_id, name, category_id, quantity)
        }
    }

    /// Whether the user may delete this item
    pub fn is_removable(&self) -> bool {
        self.is_custom
    }
}

impl Entity for Item {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}
