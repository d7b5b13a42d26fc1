//! Forecast entities
//!
//! A forecast is transient: fetched fresh from the provider for every view
//! and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A value with its display unit, as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitValue {
    /// Numeric value
    pub value: f64,
    /// Display unit, e.g. "C" or "F"
    pub unit: String,
    /// Provider unit-type code
    pub unit_type: i32,
}

impl std::fmt::Display for UnitValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// Daily minimum/maximum temperature pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    /// Daily minimum
    pub minimum: UnitValue,
    /// Daily maximum
    pub maximum: UnitValue,
}

impl Temperature {
    /// Spread between the daily maximum and minimum
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.maximum.value - self.minimum.value
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.minimum, self.maximum)
    }
}

/// Conditions for one half of a forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPart {
    /// Provider icon code
    pub icon: u8,
    /// Short condition phrase, e.g. "Partly sunny"
    pub icon_phrase: String,
    /// Whether any precipitation is expected
    pub has_precipitation: bool,
    /// Precipitation type, e.g. "Rain", when expected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_type: Option<String>,
    /// Precipitation intensity, e.g. "Light", when expected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_intensity: Option<String>,
}

/// Forecast for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Forecast date
    pub date: DateTime<Utc>,
    /// Forecast date in epoch seconds
    pub epoch_date: i64,
    /// Daily temperature range
    pub temperature: Temperature,
    /// Daytime conditions
    pub day: DayPart,
    /// Nighttime conditions
    pub night: DayPart,
    /// Data sources the provider consulted
    pub sources: Vec<String>,
    /// Provider mobile web link
    pub mobile_link: String,
    /// Provider web link
    pub link: String,
}

/// Provider-supplied summary covering the multi-day forecast window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    /// Start of the validity window
    pub effective_date: DateTime<Utc>,
    /// Start of the validity window in epoch seconds
    pub effective_epoch: i64,
    /// Severity level (1 = highest)
    pub severity: u8,
    /// Free-text summary
    pub text: String,
    /// Category tag, e.g. "rain"
    pub category: String,
    /// End of the validity window
    pub end_date: DateTime<Utc>,
    /// End of the validity window in epoch seconds
    pub end_epoch: i64,
    /// Provider mobile web link
    pub mobile_link: String,
    /// Provider web link
    pub link: String,
}

/// Multi-day forecast for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    /// Summary headline for the window
    pub headline: Headline,
    /// One entry per forecast day, in date order
    pub daily_forecasts: Vec<DailyForecast>,
}
