//! Command Tests
//!
//! Exercise the command layer against in-memory repositories.

use chrono::{DateTime, TimeZone, Utc};

use super::*;
use crate::domain::{category, Item, NewTrip};
use crate::repository::init_db;
use crate::AppState;

fn date(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
}

fn berlin_business() -> NewTrip {
    NewTrip {
        name: "Berlin summit".to_string(),
        destination: "Berlin".to_string(),
        start_date: date(1, 1),
        end_date: date(1, 8),
        purpose: "business".to_string(),
        activities: vec![],
        temperatures: vec![5.0],
    }
}

fn find<'a>(items: &'a [Item], name: &str) -> &'a Item {
    items.iter().find(|i| i.name == name).expect("item missing")
}

#[tokio::test]
async fn test_create_trip_generates_items() {
    let state = AppState::in_memory();

    let created = create_trip(&state, berlin_business()).await.expect("create failed");
    assert!(created.trip.id > 0);
    assert!(!created.items.is_empty());
    assert!(created.items.iter().all(|i| i.id > 0 && i.trip_id == created.trip.id));
    assert_eq!(find(&created.items, "T-shirts").quantity, 7);
    find(&created.items, "Winter Jacket");
    find(&created.items, "Laptop");

    let listed = list_items(&state, created.trip.id).await.unwrap();
    assert_eq!(listed, created.items);
}

#[tokio::test]
async fn test_create_trip_rejects_bad_input() {
    let state = AppState::in_memory();

    let mut input = berlin_business();
    input.end_date = date(1, 1);
    input.start_date = date(1, 5);
    let err = create_trip(&state, input).await.unwrap_err();
    assert!(err.starts_with("Invalid input"));

    let mut input = berlin_business();
    input.name = String::new();
    assert!(create_trip(&state, input).await.is_err());
    assert!(list_trips(&state).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_and_progress() {
    let state = AppState::in_memory();
    let created = create_trip(&state, berlin_business()).await.unwrap();
    let trip_id = created.trip.id;
    let first = created.items[0].id;

    let toggled = toggle_item(&state, first).await.unwrap();
    assert!(toggled.is_packed);

    let progress = packing_progress(&state, trip_id).await.unwrap();
    assert_eq!(progress.packed, 1);
    assert_eq!(progress.total, created.items.len());

    let toggled = toggle_item(&state, first).await.unwrap();
    assert!(!toggled.is_packed);

    let err = toggle_item(&state, 9999).await.unwrap_err();
    assert!(err.starts_with("Not found"));
}

#[tokio::test]
async fn test_reset_packed() {
    let state = AppState::in_memory();
    let created = create_trip(&state, berlin_business()).await.unwrap();
    for item in created.items.iter().take(3) {
        toggle_item(&state, item.id).await.unwrap();
    }

    assert_eq!(reset_packed(&state, created.trip.id).await.unwrap(), 3);
    let progress = packing_progress(&state, created.trip.id).await.unwrap();
    assert_eq!(progress.packed, 0);
}

#[tokio::test]
async fn test_custom_items_can_be_deleted_generated_cannot() {
    let state = AppState::in_memory();
    let created = create_trip(&state, berlin_business()).await.unwrap();
    let trip_id = created.trip.id;

    let custom = add_custom_item(&state, trip_id, "  Kindle ".to_string(), category::ELECTRONICS, None)
        .await
        .expect("add failed");
    assert!(custom.is_custom);
    assert_eq!(custom.name, "Kindle");
    assert_eq!(custom.quantity, 1);

    let generated = find(&created.items, "Wallet").id;
    let err = delete_item(&state, generated).await.unwrap_err();
    assert!(err.contains("cannot be deleted"));

    delete_item(&state, custom.id).await.expect("delete failed");
    let items = list_items(&state, trip_id).await.unwrap();
    assert_eq!(items.len(), created.items.len());
}

#[tokio::test]
async fn test_add_custom_item_validation() {
    let state = AppState::in_memory();
    let created = create_trip(&state, berlin_business()).await.unwrap();
    let trip_id = created.trip.id;

    assert!(add_custom_item(&state, trip_id, " ".to_string(), 1, None).await.is_err());
    assert!(add_custom_item(&state, trip_id, "Pen".to_string(), 1, Some(0)).await.is_err());
    assert!(add_custom_item(&state, trip_id, "Pen".to_string(), 777, None).await.is_err());
    assert!(add_custom_item(&state, 4242, "Pen".to_string(), 1, None).await.is_err());
}

#[tokio::test]
async fn test_update_item() {
    let state = AppState::in_memory();
    let created = create_trip(&state, berlin_business()).await.unwrap();
    let socks = find(&created.items, "Socks").clone();

    let updated = update_item(&state, socks.id, None, None, Some(5)).await.unwrap();
    assert_eq!(updated.quantity, 5);
    assert_eq!(updated.name, "Socks");
    assert!(!updated.is_custom);

    let updated = update_item(&state, socks.id, Some("Wool socks".to_string()), Some(category::WEATHER_GEAR), None)
        .await
        .unwrap();
    assert_eq!(updated.name, "Wool socks");
    assert_eq!(updated.category_id, category::WEATHER_GEAR);
    assert_eq!(updated.quantity, 5);

    assert!(update_item(&state, socks.id, None, None, Some(0)).await.is_err());
    assert!(update_item(&state, socks.id, None, Some(555), None).await.is_err());
}

#[tokio::test]
async fn test_regenerate_keeps_custom_and_packed_state() {
    let state = AppState::in_memory();
    let created = create_trip(&state, berlin_business()).await.unwrap();
    let trip_id = created.trip.id;

    toggle_item(&state, find(&created.items, "Wallet").id).await.unwrap();
    add_custom_item(&state, trip_id, "Kindle".to_string(), category::ELECTRONICS, None)
        .await
        .unwrap();

    // Forecast changed from cold to hot
    let items = generate_trip_items(&state, trip_id, vec![30.0]).await.unwrap();

    assert!(find(&items, "Wallet").is_packed);
    assert!(!find(&items, "Phone").is_packed);
    assert!(find(&items, "Kindle").is_custom);
    assert!(items.iter().any(|i| i.name == "Sunscreen"));
    assert!(!items.iter().any(|i| i.name == "Winter Jacket"));
    assert_eq!(items.iter().filter(|i| i.name == "Wallet").count(), 1);
}

#[tokio::test]
async fn test_generate_for_missing_trip() {
    let state = AppState::in_memory();
    let err = generate_trip_items(&state, 12, vec![]).await.unwrap_err();
    assert!(err.starts_with("Not found"));
}

#[tokio::test]
async fn test_update_trip() {
    let state = AppState::in_memory();
    let created = create_trip(&state, berlin_business()).await.unwrap();
    let id = created.trip.id;

    let changes = TripUpdate {
        name: Some("Berlin again".to_string()),
        activities: Some(vec!["running".to_string()]),
        ..TripUpdate::default()
    };
    let updated = update_trip(&state, id, changes).await.unwrap();
    assert_eq!(updated.name, "Berlin again");
    assert_eq!(updated.destination, "Berlin");
    assert_eq!(updated.activities, vec!["running"]);

    let bad = TripUpdate {
        end_date: Some(date(1, 1) - chrono::Duration::days(3)),
        ..TripUpdate::default()
    };
    assert!(update_trip(&state, id, bad).await.is_err());
    assert!(update_trip(&state, 999, TripUpdate::default()).await.is_err());

    let fetched = get_trip(&state, id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Berlin again");
}

#[tokio::test]
async fn test_delete_trip_removes_items() {
    let state = AppState::in_memory();
    let created = create_trip(&state, berlin_business()).await.unwrap();
    let id = created.trip.id;

    delete_trip(&state, id).await.expect("delete failed");
    assert!(get_trip(&state, id).await.unwrap().is_none());
    assert!(list_items(&state, id).await.unwrap().is_empty());
    assert!(delete_trip(&state, id).await.is_err());
}

#[tokio::test]
async fn test_items_grouped_by_category() {
    let state = AppState::in_memory();
    let created = create_trip(&state, berlin_business()).await.unwrap();

    let groups = list_items_by_category(&state, created.trip.id).await.unwrap();
    let total: usize = groups.iter().map(|g| g.items.len()).sum();
    assert_eq!(total, created.items.len());

    let clothing = groups
        .iter()
        .find(|g| g.category.id == category::CLOTHING)
        .expect("clothing group");
    assert!(clothing.items.iter().any(|i| i.name == "T-shirts"));
    assert!(groups.windows(2).all(|w| w[0].category.id < w[1].category.id));
}

#[tokio::test]
async fn test_categories() {
    let state = AppState::in_memory();

    let created = create_category(&state, " Baby ".to_string()).await.unwrap();
    assert_eq!(created.name, "Baby");
    assert!(create_category(&state, "Baby".to_string()).await.is_err());
    assert!(create_category(&state, "".to_string()).await.is_err());

    let categories = list_categories(&state).await.unwrap();
    assert!(categories.iter().any(|c| c.name == "Baby"));
    assert!(categories.iter().any(|c| c.name == "Essentials"));
}

#[tokio::test]
async fn test_commands_on_sqlite() {
    let db_state = init_db(std::path::Path::new(":memory:")).await.unwrap();
    let state = AppState::from_db(&db_state);

    let mut input = berlin_business();
    input.activities = vec!["swimming".to_string()];
    input.temperatures = vec![28.0];
    let created = create_trip(&state, input).await.unwrap();
    find(&created.items, "Swim Cap");

    let stored = get_trip(&state, created.trip.id).await.unwrap().unwrap();
    assert_eq!(stored.activities, vec!["swimming"]);

    let items = generate_trip_items(&state, created.trip.id, vec![5.0]).await.unwrap();
    assert!(items.iter().any(|i| i.name == "Gloves"));
    assert!(items.iter().any(|i| i.name == "Goggles"));
}

#[tokio::test]
async fn test_failed_regeneration_keeps_previous_list() {
    let db_state = init_db(std::path::Path::new(":memory:")).await.unwrap();
    let state = AppState::from_db(&db_state);
    let created = create_trip(&state, berlin_business()).await.unwrap();
    let trip_id = created.trip.id;
    add_custom_item(&state, trip_id, "Kindle".to_string(), category::ELECTRONICS, None)
        .await
        .unwrap();
    let before = list_items(&state, trip_id).await.unwrap();

    {
        let guard = db_state.conn.lock().await;
        let conn = guard.as_ref().expect("DB not initialized");
        conn.execute_batch(
            "CREATE TRIGGER reject_sunscreen BEFORE INSERT ON items WHEN NEW.name = 'Sunscreen'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();
    }

    // Hot weather brings Sunscreen, which storage now rejects
    assert!(generate_trip_items(&state, trip_id, vec![30.0]).await.is_err());

    let after = list_items(&state, trip_id).await.unwrap();
    assert_eq!(after, before);
    find(&after, "Winter Jacket");
}

#[tokio::test]
async fn test_regeneration_skips_names_of_custom_items() {
    let state = AppState::in_memory();
    let created = create_trip(&state, berlin_business()).await.unwrap();
    let trip_id = created.trip.id;

    let custom = add_custom_item(&state, trip_id, "sunscreen".to_string(), category::TOILETRIES, Some(3))
        .await
        .unwrap();

    let items = generate_trip_items(&state, trip_id, vec![30.0]).await.unwrap();
    let matching: Vec<&Item> = items
        .iter()
        .filter(|i| i.name.eq_ignore_ascii_case("sunscreen"))
        .collect();
    assert_eq!(matching, vec![&custom]);
    find(&items, "Sun Hat");
}
