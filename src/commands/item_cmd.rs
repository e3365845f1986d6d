//! Commands for packing-list items

use crate::domain::{
    group_by_category, CategoryGroup, DomainError, DomainResult, Item, PackingProgress,
};
use crate::repository::{Repository, TripItemOperations};
use crate::AppState;

fn clean_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidInput("Item name cannot be empty".into()));
    }
    Ok(name.to_string())
}

fn check_quantity(quantity: u32) -> DomainResult<u32> {
    if quantity == 0 {
        return Err(DomainError::InvalidInput("Quantity must be at least 1".into()));
    }
    Ok(quantity)
}

async fn require_category(state: &AppState, id: u32) -> Result<(), String> {
    state
        .category_repo
        .find_by_id(id)
        .await
        .map_err(|e| e.to_string())?
        .map(|_| ())
        .ok_or_else(|| DomainError::InvalidInput(format!("Unknown category {}", id)).to_string())
}

async fn require_item(state: &AppState, id: u32) -> Result<Item, String> {
    state
        .item_repo
        .find_by_id(id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| DomainError::NotFound(format!("Item {}", id)).to_string())
}

/// List a trip's items
pub async fn list_items(state: &AppState, trip_id: u32) -> Result<Vec<Item>, String> {
    state
        .item_repo
        .list_by_trip(trip_id)
        .await
        .map_err(|e| e.to_string())
}

/// List a trip's items grouped by category
pub async fn list_items_by_category(
    state: &AppState,
    trip_id: u32,
) -> Result<Vec<CategoryGroup>, String> {
    let categories = state.category_repo.list().await.map_err(|e| e.to_string())?;
    let items = list_items(state, trip_id).await?;
    Ok(group_by_category(&categories, items))
}

/// Add a user item to a trip
pub async fn add_custom_item(
    state: &AppState,
    trip_id: u32,
    name: String,
    category_id: u32,
    quantity: Option<u32>,
) -> Result<Item, String> {
    let name = clean_name(&name).map_err(|e| e.to_string())?;
    let quantity = check_quantity(quantity.unwrap_or(1)).map_err(|e| e.to_string())?;

    state
        .trip_repo
        .find_by_id(trip_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| DomainError::NotFound(format!("Trip {}", trip_id)).to_string())?;
    require_category(state, category_id).await?;

    let item = Item::custom(trip_id, name, category_id, quantity);
    state.item_repo.create(&item).await.map_err(|e| e.to_string())
}

/// Update item
pub async fn update_item(
    state: &AppState,
    id: u32,
    name: Option<String>,
    category_id: Option<u32>,
    quantity: Option<u32>,
) -> Result<Item, String> {
    // First get existing item
    let existing = require_item(state, id).await?;

    let name = match name {
        Some(n) => clean_name(&n).map_err(|e| e.to_string())?,
        None => existing.name.clone(),
    };
    let quantity = match quantity {
        Some(q) => check_quantity(q).map_err(|e| e.to_string())?,
        None => existing.quantity,
    };
    if let Some(category_id) = category_id {
        require_category(state, category_id).await?;
    }

    let updated = Item {
        name,
        quantity,
        category_id: category_id.unwrap_or(existing.category_id),
        ..existing
    };

    state.item_repo.update(&updated).await.map_err(|e| e.to_string())
}

/// Toggle item packed status
pub async fn toggle_item(state: &AppState, id: u32) -> Result<Item, String> {
    let item = require_item(state, id).await?;
    state
        .item_repo
        .set_packed(id, !item.is_packed)
        .await
        .map_err(|e| e.to_string())
}

/// Delete a user-added item; generated items stay on the list
pub async fn delete_item(state: &AppState, id: u32) -> Result<(), String> {
    let item = require_item(state, id).await?;
    if !item.is_removable() {
        return Err(DomainError::InvalidInput(format!(
            "Item '{}' was generated and cannot be deleted",
            item.name
        ))
        .to_string());
    }
    state.item_repo.delete(id).await.map_err(|e| e.to_string())
}

/// Mark every item of a trip unpacked
pub async fn reset_packed(state: &AppState, trip_id: u32) -> Result<usize, String> {
    state
        .item_repo
        .set_all_packed(trip_id, false)
        .await
        .map_err(|e| e.to_string())
}

/// Packed vs total for a trip
pub async fn packing_progress(state: &AppState, trip_id: u32) -> Result<PackingProgress, String> {
    let items = list_items(state, trip_id).await?;
    Ok(PackingProgress::from_items(trip_id, &items))
}
