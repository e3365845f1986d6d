//! Packing List Generator
//!
//! Derives a packing list from trip attributes by filtering the template
//! tables. Pure and deterministic: no I/O, no randomness.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{duration_days, Item, TemplateItem, Trip, TripContext, WeatherBucket};
use super::templates::{clothing_for, TemplateSet};

/// Items keyed by name: position of first insertion, values of the last
#[derive(Debug, Default)]
struct OrderedItems {
    index: HashMap<String, usize>,
    items: Vec<Item>,
}

impl OrderedItems {
    fn insert(&mut self, item: Item) {
        match self.index.get(&item.name) {
            Some(&pos) => self.items[pos] = item,
            None => {
                self.index.insert(item.name.clone(), self.items.len());
                self.items.push(item);
            }
        }
    }

    fn into_vec(self) -> Vec<Item> {
        self.items
    }
}

pub struct PackingListGenerator<'a> {
    templates: &'a TemplateSet,
}

impl PackingListGenerator<'static> {
    /// Generator over the built-in tables
    pub fn standard() -> Self {
        Self::new(TemplateSet::standard())
    }
}

impl<'a> PackingListGenerator<'a> {
    pub fn new(templates: &'a TemplateSet) -> Self {
        Self { templates }
    }

    /// Build the list for a trip
    ///
    /// Unknown purpose or activity keys contribute nothing. Empty
    /// `temperatures` means no weather items. Every returned item has
    /// `id == 0`; storage assigns real ids.
    pub fn generate(
        &self,
        trip_id: u32,
        purpose: &str,
        activities: &[String],
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        temperatures: &[f64],
    ) -> Vec<Item> {
        let days = duration_days(start_date, end_date);
        let weather = WeatherBucket::from_temperatures(temperatures);
        let ctx = TripContext::new(days, weather, purpose, activities);

        log::debug!(
            "Generating packing list for trip {}: {} days, weather {:?}, purpose '{}', activities {:?}",
            trip_id,
            days,
            weather.map(|w| w.as_str()),
            ctx.purpose,
            ctx.activities
        );

        let mut list = OrderedItems::default();
        let mut add = |template: &TemplateItem| {
            list.insert(Item::generated(
                trip_id,
                template.name.clone(),
                template.category_id,
                template.quantity,
            ));
        };

        self.templates
            .essentials
            .iter()
            .filter(|t| t.matches(&ctx))
            .for_each(&mut add);

        clothing_for(days).iter().for_each(&mut add);

        self.templates
            .weather
            .iter()
            .filter(|t| t.matches(&ctx))
            .for_each(&mut add);

        let purpose_items: Vec<&TemplateItem> =
            self.templates.purpose.iter().filter(|t| t.matches(&ctx)).collect();
        if purpose_items.is_empty() && !ctx.purpose.is_empty() {
            log::debug!("No purpose templates for '{}', skipping", ctx.purpose);
        }
        purpose_items.into_iter().for_each(&mut add);

        // Activities are unioned in the order the caller listed them
        for key in &ctx.activities {
            let single = ctx.for_activity(key);
            let mut matched = false;
            for template in &self.templates.activities {
                if template.is_for_activity(key) && template.matches(&single) {
                    add(template);
                    matched = true;
                }
            }
            if !matched {
                log::debug!("No activity templates for '{}', skipping", key);
            }
        }

        list.into_vec()
    }

    /// Build the list for a stored trip
    pub fn generate_for_trip(&self, trip: &Trip, temperatures: &[f64]) -> Vec<Item> {
        self.generate(
            trip.id,
            &trip.purpose,
            &trip.activities,
            trip.start_date,
            trip.end_date,
            temperatures,
        )
    }
}

/// Generate a packing list from the built-in tables
pub fn generate_packing_list(
    trip_id: u32,
    purpose: &str,
    activities: &[String],
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    temperatures: &[f64],
) -> Vec<Item> {
    PackingListGenerator::standard().generate(
        trip_id,
        purpose,
        activities,
        start_date,
        end_date,
        temperatures,
    )
}
