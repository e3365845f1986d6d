//! Static template tables
//!
//! Built once and shared read-only. Table order matters: the generator
//! applies essentials, clothing, weather, purpose, then activities, and a
//! later table overrides an earlier item with the same name.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::domain::category::{
    ACTIVITY_GEAR, CLOTHING, DOCUMENTS, ELECTRONICS, ESSENTIALS, MISCELLANEOUS, TOILETRIES,
    WEATHER_GEAR, WORK,
};
use crate::domain::TemplateItem;

pub const MAX_SHIRTS: i64 = 7;
pub const MAX_UNDERWEAR: i64 = 8;
pub const MAX_SOCKS: i64 = 8;

/// The rule tables the generator draws from
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    pub essentials: Vec<TemplateItem>,
    pub weather: Vec<TemplateItem>,
    pub purpose: Vec<TemplateItem>,
    pub activities: Vec<TemplateItem>,
}

impl TemplateSet {
    /// Built-in tables
    pub fn standard() -> &'static TemplateSet {
        static STANDARD: OnceLock<TemplateSet> = OnceLock::new();
        STANDARD.get_or_init(build_standard)
    }

    /// Purpose keys some template responds to
    pub fn known_purposes(&self) -> BTreeSet<String> {
        self.purpose
            .iter()
            .filter_map(|t| t.conditions.as_ref()?.purpose.clone())
            .flatten()
            .collect()
    }

    /// Activity keys some template responds to
    pub fn known_activities(&self) -> BTreeSet<String> {
        self.activities
            .iter()
            .filter_map(|t| t.conditions.as_ref()?.activities.clone())
            .flatten()
            .collect()
    }
}

/// Clothing scaled to trip length
///
/// Durations below one day are treated as one day so a same-day trip still
/// gets a single change of clothes.
pub fn clothing_for(duration_days: i64) -> Vec<TemplateItem> {
    let days = duration_days.max(1);
    let pants = (days + 1) / 2;
    vec![
        TemplateItem::new("T-shirts", CLOTHING, to_quantity(days.min(MAX_SHIRTS))),
        TemplateItem::new("Underwear", CLOTHING, to_quantity((days + 1).min(MAX_UNDERWEAR))),
        TemplateItem::new("Socks", CLOTHING, to_quantity((days + 1).min(MAX_SOCKS))),
        TemplateItem::new("Pants", CLOTHING, to_quantity(pants)),
    ]
}

fn to_quantity(n: i64) -> u32 {
    u32::try_from(n.max(1)).unwrap_or(u32::MAX)
}

fn build_standard() -> TemplateSet {
    let essentials = vec![
        TemplateItem::new("Passport/ID", DOCUMENTS, 1),
        TemplateItem::new("Phone Charger", ELECTRONICS, 1),
        TemplateItem::new("Wallet", ESSENTIALS, 1),
        TemplateItem::new("Phone", ELECTRONICS, 1),
        TemplateItem::new("Toothbrush", TOILETRIES, 1),
        TemplateItem::new("Toothpaste", TOILETRIES, 1),
        TemplateItem::new("Travel Laundry Kit", TOILETRIES, 1).when_duration(Some(8), None),
    ];

    let weather = vec![
        // cold
        TemplateItem::new("Sweater", CLOTHING, 2).when_weather(&["cold"]),
        TemplateItem::new("Winter Jacket", WEATHER_GEAR, 1).when_weather(&["cold"]),
        TemplateItem::new("Thermal Underwear", CLOTHING, 2).when_weather(&["cold"]),
        TemplateItem::new("Gloves", WEATHER_GEAR, 1).when_weather(&["cold"]),
        TemplateItem::new("Scarf", WEATHER_GEAR, 1).when_weather(&["cold"]),
        TemplateItem::new("Hat", WEATHER_GEAR, 1).when_weather(&["cold"]),
        // warm
        TemplateItem::new("Light Jacket", WEATHER_GEAR, 1).when_weather(&["warm"]),
        TemplateItem::new("Long-sleeve Shirts", CLOTHING, 2).when_weather(&["warm"]),
        TemplateItem::new("Umbrella", WEATHER_GEAR, 1).when_weather(&["warm"]),
        // hot
        TemplateItem::new("Sunscreen", TOILETRIES, 1).when_weather(&["hot"]),
        TemplateItem::new("Sunglasses", WEATHER_GEAR, 1).when_weather(&["hot"]),
        TemplateItem::new("Shorts", CLOTHING, 3).when_weather(&["hot"]),
        TemplateItem::new("Sun Hat", WEATHER_GEAR, 1).when_weather(&["hot"]),
        TemplateItem::new("Sandals", CLOTHING, 1).when_weather(&["hot"]),
        TemplateItem::new("Water Bottle", MISCELLANEOUS, 1).when_weather(&["hot"]),
    ];

    let purpose = vec![
        TemplateItem::new("Laptop", WORK, 1).when_purpose(&["business"]),
        TemplateItem::new("Laptop Charger", WORK, 1).when_purpose(&["business"]),
        TemplateItem::new("Business Cards", WORK, 1).when_purpose(&["business"]),
        TemplateItem::new("Formal Attire", CLOTHING, 2).when_purpose(&["business"]),
        TemplateItem::new("Notebook", WORK, 1).when_purpose(&["business"]),
        TemplateItem::new("Phone Charger", ELECTRONICS, 2).when_purpose(&["business"]),
        TemplateItem::new("Camera", ELECTRONICS, 1).when_purpose(&["vacation"]),
        TemplateItem::new("Travel Guide", MISCELLANEOUS, 1).when_purpose(&["vacation"]),
        TemplateItem::new("Day Backpack", MISCELLANEOUS, 1).when_purpose(&["vacation"]),
        TemplateItem::new("Snacks", MISCELLANEOUS, 1).when_purpose(&["family"]),
        TemplateItem::new("Travel Games", MISCELLANEOUS, 1).when_purpose(&["family"]),
        TemplateItem::new("Wet Wipes", TOILETRIES, 1).when_purpose(&["family"]),
        TemplateItem::new("First Aid Kit", ESSENTIALS, 1).when_purpose(&["family", "adventure"]),
        TemplateItem::new("Multi-tool", ACTIVITY_GEAR, 1).when_purpose(&["adventure"]),
        TemplateItem::new("Headlamp", ACTIVITY_GEAR, 1).when_purpose(&["adventure"]),
    ];

    let activities = vec![
        TemplateItem::new("Swimwear", CLOTHING, 1).when_activity(&["swimming"]),
        TemplateItem::new("Goggles", ACTIVITY_GEAR, 1).when_activity(&["swimming"]),
        TemplateItem::new("Swim Cap", ACTIVITY_GEAR, 1).when_activity(&["swimming"]),
        TemplateItem::new("Hiking Boots", CLOTHING, 1).when_activity(&["hiking"]),
        TemplateItem::new("Backpack", ACTIVITY_GEAR, 1).when_activity(&["hiking"]),
        TemplateItem::new("Water Bottle", ACTIVITY_GEAR, 2).when_activity(&["hiking"]),
        TemplateItem::new("First Aid Kit", ACTIVITY_GEAR, 1).when_activity(&["hiking", "camping"]),
        TemplateItem::new("Ski Jacket", CLOTHING, 1).when_activity(&["skiing"]),
        TemplateItem::new("Ski Pants", CLOTHING, 1).when_activity(&["skiing"]),
        TemplateItem::new("Ski Goggles", ACTIVITY_GEAR, 1).when_activity(&["skiing"]),
        TemplateItem::new("Thermal Socks", CLOTHING, 3).when_activity(&["skiing"]),
        TemplateItem::new("Tent", ACTIVITY_GEAR, 1).when_activity(&["camping"]),
        TemplateItem::new("Sleeping Bag", ACTIVITY_GEAR, 1).when_activity(&["camping"]),
        TemplateItem::new("Flashlight", ACTIVITY_GEAR, 1).when_activity(&["camping"]),
        TemplateItem::new("Insect Repellent", TOILETRIES, 1).when_activity(&["camping", "hiking"]),
        TemplateItem::new("Beach Towel", ACTIVITY_GEAR, 1).when_activity(&["beach"]),
        TemplateItem::new("Sunscreen", TOILETRIES, 2).when_activity(&["beach"]),
        TemplateItem::new("Flip-flops", CLOTHING, 1).when_activity(&["beach"]),
        TemplateItem::new("Camera", ELECTRONICS, 1).when_activity(&["photography"]),
        TemplateItem::new("Extra Memory Cards", ELECTRONICS, 2).when_activity(&["photography"]),
        TemplateItem::new("Tripod", ACTIVITY_GEAR, 1).when_activity(&["photography"]),
        TemplateItem::new("Running Shoes", CLOTHING, 1).when_activity(&["running"]),
        TemplateItem::new("Sports Clothes", CLOTHING, 2).when_activity(&["running"]),
        TemplateItem::new("Dress Shoes", CLOTHING, 1).when_activity(&["dining"]),
        TemplateItem::new("Evening Outfit", CLOTHING, 1).when_activity(&["dining"]),
    ];

    TemplateSet {
        essentials,
        weather,
        purpose,
        activities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clothing_caps() {
        for days in 0..=60 {
            let clothing = clothing_for(days);
            let qty = |name: &str| clothing.iter().find(|t| t.name == name).unwrap().quantity as i64;
            let effective = days.max(1);
            assert!(qty("T-shirts") <= MAX_SHIRTS);
            assert!(qty("Underwear") <= MAX_UNDERWEAR);
            assert!(qty("Socks") <= MAX_SOCKS);
            assert_eq!(qty("Pants"), (effective + 1) / 2);
        }
    }

    #[test]
    fn test_clothing_for_one_week() {
        let clothing = clothing_for(7);
        let quantities: Vec<(&str, u32)> =
            clothing.iter().map(|t| (t.name.as_str(), t.quantity)).collect();
        assert_eq!(
            quantities,
            vec![("T-shirts", 7), ("Underwear", 8), ("Socks", 8), ("Pants", 4)]
        );
    }

    #[test]
    fn test_non_positive_duration_clamps_to_one_day() {
        assert_eq!(clothing_for(0), clothing_for(1));
        assert_eq!(clothing_for(-3), clothing_for(1));
        assert!(clothing_for(-3).iter().all(|t| t.quantity >= 1));
    }

    #[test]
    fn test_known_keys() {
        let set = TemplateSet::standard();
        let purposes = set.known_purposes();
        assert!(purposes.contains("business"));
        assert!(purposes.contains("adventure"));
        let activities = set.known_activities();
        assert!(activities.contains("swimming"));
        assert!(activities.contains("dining"));
        assert!(!activities.contains("business"));
    }

    #[test]
    fn test_table_names_unique_within_each_table() {
        let set = TemplateSet::standard();
        for table in [&set.essentials, &set.weather] {
            let mut names: Vec<&str> = table.iter().map(|t| t.name.as_str()).collect();
            let total = names.len();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), total);
        }
    }
}
