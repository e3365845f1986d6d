//! Read models for the packing-list view

use serde::{Deserialize, Serialize};
use super::category::Category;
use super::item::Item;

/// Packed vs total item count for one trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingProgress {
    pub trip_id: u32,
    pub packed: usize,
    pub total: usize,
}

impl PackingProgress {
    pub fn from_items(trip_id: u32, items: &[Item]) -> Self {
        Self {
            trip_id,
            packed: items.iter().filter(|i| i.is_packed).count(),
            total: items.len(),
        }
    }

    /// Whole percent packed, rounded down; 0 for an empty list
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.packed * 100 / self.total) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.packed == self.total
    }
}

/// Items of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub items: Vec<Item>,
}

/// Group items by category, in category order
///
/// Empty categories are left out. Items pointing at an unknown category are
/// collected at the end, one group per missing id.
pub fn group_by_category(categories: &[Category], items: Vec<Item>) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = categories
        .iter()
        .map(|c| CategoryGroup {
            category: c.clone(),
            items: Vec::new(),
        })
        .collect();

    for item in items {
        match groups.iter_mut().find(|g| g.category.id == item.category_id) {
            Some(group) => group.items.push(item),
            None => {
                groups.push(CategoryGroup {
                    category: Category::new(item.category_id, "Other".to_string()),
                    items: vec![item],
                });
            }
        }
    }

    groups.retain(|g| !g.items.is_empty());
    groups
}
