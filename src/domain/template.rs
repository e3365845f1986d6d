//! Template Item
//!
//! A static rule mapping trip attributes to a suggested packing item.
//! A template with no conditions always applies; otherwise every condition
//! present must hold.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use super::weather::WeatherBucket;

/// Inclusive bounds on trip duration in days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl DurationRange {
    pub fn contains(&self, days: i64) -> bool {
        self.min.map_or(true, |min| days >= min) && self.max.map_or(true, |max| days <= max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    #[serde(
        default,
        deserialize_with = "normalized_keys",
        skip_serializing_if = "Option::is_none"
    )]
    pub weather: Option<BTreeSet<String>>,
    #[serde(
        default,
        deserialize_with = "normalized_keys",
        skip_serializing_if = "Option::is_none"
    )]
    pub activities: Option<BTreeSet<String>>,
    #[serde(
        default,
        deserialize_with = "normalized_keys",
        skip_serializing_if = "Option::is_none"
    )]
    pub purpose: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationRange>,
}

impl Conditions {
    pub fn matches(&self, ctx: &TripContext) -> bool {
        if let Some(weather) = &self.weather {
            match ctx.weather {
                Some(bucket) if weather.contains(bucket.as_str()) => {}
                _ => return false,
            }
        }
        if let Some(purpose) = &self.purpose {
            if !purpose.contains(&ctx.purpose) {
                return false;
            }
        }
        if let Some(activities) = &self.activities {
            if !ctx.activities.iter().any(|a| activities.contains(a)) {
                return false;
            }
        }
        if let Some(duration) = &self.duration {
            if !duration.contains(ctx.duration_days) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    pub name: String,
    pub category_id: u32,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
}

impl TemplateItem {
    pub fn new(name: &str, category_id: u32, quantity: u32) -> Self {
        Self {
            name: name.to_string(),
            category_id,
            quantity,
            conditions: None,
        }
    }

    pub fn when_weather(mut self, buckets: &[&str]) -> Self {
        self.conditions_mut().weather = Some(to_set(buckets));
        self
    }

    pub fn when_purpose(mut self, purposes: &[&str]) -> Self {
        self.conditions_mut().purpose = Some(to_set(purposes));
        self
    }

    pub fn when_activity(mut self, activities: &[&str]) -> Self {
        self.conditions_mut().activities = Some(to_set(activities));
        self
    }

    pub fn when_duration(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.conditions_mut().duration = Some(DurationRange { min, max });
        self
    }

    pub fn matches(&self, ctx: &TripContext) -> bool {
        self.conditions.as_ref().map_or(true, |c| c.matches(ctx))
    }

    /// Whether this template is tied to the given activity key
    pub fn is_for_activity(&self, key: &str) -> bool {
        self.conditions
            .as_ref()
            .and_then(|c| c.activities.as_ref())
            .map_or(false, |set| set.contains(key))
    }

    fn conditions_mut(&mut self) -> &mut Conditions {
        self.conditions.get_or_insert_with(Conditions::default)
    }
}

fn to_set(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|k| normalize_key(k)).collect()
}

/// Condition sets read from JSON compare like ones built in code
fn normalized_keys<'de, D>(deserializer: D) -> Result<Option<BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let keys = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(keys.map(|keys| keys.iter().map(|k| normalize_key(k)).collect()))
}

/// Keys compare trimmed and lower-cased
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Trip attributes that template conditions are evaluated against
#[derive(Debug, Clone, PartialEq)]
pub struct TripContext {
    pub duration_days: i64,
    pub weather: Option<WeatherBucket>,
    pub purpose: String,
    pub activities: Vec<String>,
}

impl TripContext {
    pub fn new(
        duration_days: i64,
        weather: Option<WeatherBucket>,
        purpose: &str,
        activities: &[String],
    ) -> Self {
        let mut keys: Vec<String> = Vec::with_capacity(activities.len());
        for key in activities.iter().map(|a| normalize_key(a)) {
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
        Self {
            duration_days,
            weather,
            purpose: normalize_key(purpose),
            activities: keys,
        }
    }

    /// Same trip, narrowed to a single activity
    pub fn for_activity(&self, key: &str) -> Self {
        Self {
            activities: vec![key.to_string()],
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(weather: Option<WeatherBucket>, purpose: &str, activities: &[&str], days: i64) -> TripContext {
        let activities: Vec<String> = activities.iter().map(|a| a.to_string()).collect();
        TripContext::new(days, weather, purpose, &activities)
    }

    #[test]
    fn test_unconditional_template_always_matches() {
        let item = TemplateItem::new("Wallet", 1, 1);
        assert!(item.matches(&ctx(None, "", &[], 0)));
    }

    #[test]
    fn test_weather_condition_needs_a_bucket() {
        let item = TemplateItem::new("Gloves", 6, 1).when_weather(&["cold"]);
        assert!(item.matches(&ctx(Some(WeatherBucket::Cold), "", &[], 3)));
        assert!(!item.matches(&ctx(Some(WeatherBucket::Hot), "", &[], 3)));
        assert!(!item.matches(&ctx(None, "", &[], 3)));
    }

    #[test]
    fn test_purpose_and_activity_keys_are_normalized() {
        let item = TemplateItem::new("Laptop", 8, 1).when_purpose(&["Business"]);
        assert!(item.matches(&ctx(None, "  BUSINESS ", &[], 3)));

        let item = TemplateItem::new("Goggles", 7, 1).when_activity(&["swimming"]);
        assert!(item.matches(&ctx(None, "", &["hiking", "Swimming"], 3)));
        assert!(!item.matches(&ctx(None, "", &["hiking"], 3)));
        assert!(item.is_for_activity("swimming"));
    }

    #[test]
    fn test_duration_bounds_are_inclusive() {
        let item = TemplateItem::new("Laundry Kit", 3, 1).when_duration(Some(8), Some(30));
        assert!(!item.matches(&ctx(None, "", &[], 7)));
        assert!(item.matches(&ctx(None, "", &[], 8)));
        assert!(item.matches(&ctx(None, "", &[], 30)));
        assert!(!item.matches(&ctx(None, "", &[], 31)));
    }

    #[test]
    fn test_all_conditions_must_hold() {
        let item = TemplateItem::new("Ski Wax", 7, 1)
            .when_activity(&["skiing"])
            .when_weather(&["cold"]);
        assert!(item.matches(&ctx(Some(WeatherBucket::Cold), "", &["skiing"], 2)));
        assert!(!item.matches(&ctx(Some(WeatherBucket::Warm), "", &["skiing"], 2)));
    }

    #[test]
    fn test_context_dedups_activities_in_order() {
        let c = ctx(None, "", &["Hiking", "swimming", "hiking", " "], 1);
        assert_eq!(c.activities, vec!["hiking", "swimming"]);
        assert_eq!(c.for_activity("swimming").activities, vec!["swimming"]);
    }

    #[test]
    fn test_template_from_json() {
        let json = r#"{"name":"Gloves","categoryId":6,"quantity":1,"conditions":{"weather":["cold"]}}"#;
        let item: TemplateItem = serde_json::from_str(json).unwrap();
        assert_eq!(item, TemplateItem::new("Gloves", 6, 1).when_weather(&["cold"]));
    }

    #[test]
    fn test_json_condition_keys_are_normalized() {
        let json = r#"{"name":"Laptop","categoryId":8,"quantity":1,"conditions":{"purpose":[" Business"],"activities":["Hiking"]}}"#;
        let item: TemplateItem = serde_json::from_str(json).unwrap();
        assert!(item.matches(&ctx(None, "business", &["hiking"], 3)));
        assert!(item.is_for_activity("hiking"));
        let built = TemplateItem::new("Laptop", 8, 1)
            .when_purpose(&["business"])
            .when_activity(&["hiking"]);
        assert_eq!(item, built);
    }
}
