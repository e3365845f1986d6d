//! Commands for Trip CRUD + list generation

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{normalize_key, DomainError, Item, NewTrip, Trip};
use crate::packing::PackingListGenerator;
use crate::repository::{Repository, TripItemOperations};
use crate::AppState;

/// A trip with its packing list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPackingList {
    pub trip: Trip,
    pub items: Vec<Item>,
}

/// Fields to change on a trip; `None` keeps the current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripUpdate {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub purpose: Option<String>,
    pub activities: Option<Vec<String>>,
}

async fn require_trip(state: &AppState, id: u32) -> Result<Trip, String> {
    state
        .trip_repo
        .find_by_id(id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| DomainError::NotFound(format!("Trip {}", id)).to_string())
}

/// Create a trip and generate its packing list
pub async fn create_trip(state: &AppState, input: NewTrip) -> Result<TripPackingList, String> {
    input.validate().map_err(|e| e.to_string())?;

    let trip = state
        .trip_repo
        .create(&input.to_trip())
        .await
        .map_err(|e| e.to_string())?;

    let generated = PackingListGenerator::standard().generate_for_trip(&trip, &input.temperatures);
    let items = match state.item_repo.create_many(&generated).await {
        Ok(items) => items,
        Err(e) => {
            // Do not leave a trip without its list behind
            if let Err(cleanup) = state.trip_repo.delete(trip.id).await {
                log::error!("Failed to remove trip {} after list error: {}", trip.id, cleanup);
            }
            return Err(e.to_string());
        }
    };

    log::info!(
        "Created trip {} '{}' with {} packing items",
        trip.id,
        trip.name,
        items.len()
    );
    Ok(TripPackingList { trip, items })
}

/// List all trips, earliest first
pub async fn list_trips(state: &AppState) -> Result<Vec<Trip>, String> {
    state.trip_repo.list().await.map_err(|e| e.to_string())
}

/// Get trip by ID
pub async fn get_trip(state: &AppState, id: u32) -> Result<Option<Trip>, String> {
    state.trip_repo.find_by_id(id).await.map_err(|e| e.to_string())
}

/// Update trip details
///
/// The packing list is left alone; call `generate_trip_items` to rebuild it.
pub async fn update_trip(state: &AppState, id: u32, changes: TripUpdate) -> Result<Trip, String> {
    let existing = require_trip(state, id).await?;

    let updated = Trip {
        id: existing.id,
        name: changes.name.map(|n| n.trim().to_string()).unwrap_or(existing.name),
        destination: changes
            .destination
            .map(|d| d.trim().to_string())
            .unwrap_or(existing.destination),
        start_date: changes.start_date.unwrap_or(existing.start_date),
        end_date: changes.end_date.unwrap_or(existing.end_date),
        purpose: changes.purpose.unwrap_or(existing.purpose),
        activities: changes.activities.unwrap_or(existing.activities),
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    };

    if updated.name.is_empty() {
        return Err(DomainError::InvalidInput("Trip name cannot be empty".into()).to_string());
    }
    if updated.end_date < updated.start_date {
        return Err(
            DomainError::InvalidInput("Trip end date is before its start date".into()).to_string(),
        );
    }

    state.trip_repo.update(&updated).await.map_err(|e| e.to_string())
}

/// Delete a trip and all of its items
pub async fn delete_trip(state: &AppState, id: u32) -> Result<(), String> {
    require_trip(state, id).await?;

    let removed = state
        .item_repo
        .delete_by_trip(id)
        .await
        .map_err(|e| e.to_string())?;
    state.trip_repo.delete(id).await.map_err(|e| e.to_string())?;

    log::info!("Deleted trip {} and {} items", id, removed);
    Ok(())
}

/// Rebuild the generated part of a trip's list
///
/// Custom items are kept, and a generated item whose name a custom item
/// already uses is left out. A regenerated item keeps its packed state if
/// an item of the same name was packed before. The swap is atomic: on
/// failure the previous list is unchanged.
pub async fn generate_trip_items(
    state: &AppState,
    trip_id: u32,
    temperatures: Vec<f64>,
) -> Result<Vec<Item>, String> {
    let trip = require_trip(state, trip_id).await?;

    let existing = state
        .item_repo
        .list_by_trip(trip_id)
        .await
        .map_err(|e| e.to_string())?;
    let mut packed: HashSet<String> = HashSet::new();
    let mut custom: HashSet<String> = HashSet::new();
    for item in existing {
        if item.is_custom {
            custom.insert(normalize_key(&item.name));
        } else if item.is_packed {
            packed.insert(item.name);
        }
    }

    let mut generated = PackingListGenerator::standard().generate_for_trip(&trip, &temperatures);
    generated.retain(|item| !custom.contains(&normalize_key(&item.name)));
    for item in &mut generated {
        item.is_packed = packed.contains(&item.name);
    }

    let created = state
        .item_repo
        .replace_generated(trip_id, &generated)
        .await
        .map_err(|e| e.to_string())?;

    log::info!(
        "Regenerated trip {}: {} generated items, {} custom kept",
        trip_id,
        created.len(),
        custom.len()
    );
    state
        .item_repo
        .list_by_trip(trip_id)
        .await
        .map_err(|e| e.to_string())
}
