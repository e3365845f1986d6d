//! Weather bucket derived from forecast temperatures (degrees Celsius)

use serde::{Deserialize, Serialize};

/// Mean below this is cold
pub const COLD_BELOW: f64 = 10.0;
/// Mean at or above this is hot
pub const HOT_FROM: f64 = 22.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherBucket {
    Cold,
    Warm,
    Hot,
}

impl WeatherBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherBucket::Cold => "cold",
            WeatherBucket::Warm => "warm",
            WeatherBucket::Hot => "hot",
        }
    }

    pub fn from_mean(mean: f64) -> Self {
        if mean < COLD_BELOW {
            WeatherBucket::Cold
        } else if mean < HOT_FROM {
            WeatherBucket::Warm
        } else {
            WeatherBucket::Hot
        }
    }

    /// Bucket for the arithmetic mean of the samples
    ///
    /// Returns `None` when there are no samples or the mean is not finite,
    /// meaning no weather condition applies. A single NaN or infinite
    /// sample invalidates the whole forecast.
    pub fn from_temperatures(temperatures: &[f64]) -> Option<Self> {
        if temperatures.is_empty() {
            return None;
        }
        let mean = temperatures.iter().sum::<f64>() / temperatures.len() as f64;
        if !mean.is_finite() {
            return None;
        }
        Some(Self::from_mean(mean))
    }
}
