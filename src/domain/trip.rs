//! Trip Entity
//!
//! A user-defined travel record: where, when, why, and what the traveller
//! plans to do there.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::entity::{DomainError, DomainResult, Entity};

const NANOS_PER_DAY: i64 = 86_400_000_000_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: u32,
    pub name: String,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Purpose key, e.g. "business" or "vacation"
    pub purpose: String,
    /// Planned activity keys, e.g. "hiking"
    pub activities: Vec<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Trip {
    /// Whole days covered by the trip, rounding partial days up
    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }
}

impl Entity for Trip {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// `ceil((end - start) / 1 day)`; zero or negative when the range is empty or reversed
pub fn duration_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let span = end - start;
    // Nanoseconds overflow past ~292 years; milliseconds are enough there
    let (amount, per_day) = match span.num_nanoseconds() {
        Some(nanos) => (nanos, NANOS_PER_DAY),
        None => (span.num_milliseconds(), MILLIS_PER_DAY),
    };
    // Ceiling division that also holds for negative spans
    let days = amount.div_euclid(per_day);
    if amount.rem_euclid(per_day) > 0 {
        days + 1
    } else {
        days
    }
}

/// Trip creation input
///
/// `temperatures` are forecast samples for the destination; they only feed
/// list generation and are not stored with the trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub name: String,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub purpose: String,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub temperatures: Vec<f64>,
}

impl NewTrip {
    /// Check the fields the creation flow requires
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("Trip name cannot be empty".into()));
        }
        if self.end_date < self.start_date {
            return Err(DomainError::InvalidInput(
                "Trip end date is before its start date".into(),
            ));
        }
        Ok(())
    }

    /// Build the unsaved trip record
    pub fn to_trip(&self) -> Trip {
        Trip {
            id: 0,
            name: self.name.trim().to_string(),
            destination: self.destination.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            purpose: self.purpose.clone(),
            activities: self.activities.clone(),
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn new_trip(start: DateTime<Utc>, end: DateTime<Utc>) -> NewTrip {
        NewTrip {
            name: "Berlin".to_string(),
            destination: "Berlin, DE".to_string(),
            start_date: start,
            end_date: end,
            purpose: "business".to_string(),
            activities: vec![],
            temperatures: vec![5.0],
        }
    }

    #[test]
    fn test_whole_day_duration() {
        assert_eq!(duration_days(at(1, 0), at(8, 0)), 7);
        assert_eq!(duration_days(at(1, 0), at(1, 0)), 0);
    }

    #[test]
    fn test_partial_days_round_up() {
        assert_eq!(duration_days(at(1, 0), at(1, 1)), 1);
        assert_eq!(duration_days(at(1, 10), at(3, 9)), 2);
    }

    #[test]
    fn test_sub_second_remainder_rounds_up() {
        let end = at(9, 0) + chrono::Duration::milliseconds(500);
        assert_eq!(duration_days(at(1, 0), end), 9);
        assert_eq!(duration_days(at(1, 0), at(1, 0) + chrono::Duration::nanoseconds(1)), 1);
        assert_eq!(duration_days(end, at(1, 0)), -8);
    }

    #[test]
    fn test_reversed_range_is_negative() {
        assert_eq!(duration_days(at(8, 0), at(1, 0)), -7);
        assert_eq!(duration_days(at(2, 0), at(1, 12)), 0);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut trip = new_trip(at(1, 0), at(2, 0));
        trip.name = "   ".to_string();
        assert!(matches!(trip.validate(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_reversed_dates() {
        let trip = new_trip(at(5, 0), at(2, 0));
        assert!(matches!(trip.validate(), Err(DomainError::InvalidInput(_))));
        assert!(new_trip(at(2, 0), at(2, 0)).validate().is_ok());
    }

    #[test]
    fn test_to_trip_trims_text() {
        let mut input = new_trip(at(1, 0), at(3, 0));
        input.name = "  Berlin  ".to_string();
        let trip = input.to_trip();
        assert_eq!(trip.id, 0);
        assert_eq!(trip.name, "Berlin");
        assert_eq!(trip.duration_days(), 2);
    }
}
