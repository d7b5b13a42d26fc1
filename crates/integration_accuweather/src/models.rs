//! Wire models for the AccuWeather API
//!
//! Field names follow the provider's PascalCase JSON. Records convert into
//! the domain entities; provider timestamps use the
//! `yyyy-MM-dd'T'HH:mm:ssZ` format, parsed leniently.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use domain::{
    City, DailyForecast, DayPart, GeoPosition, Headline, LocationKey, Temperature, UnitValue,
    WeatherForecast,
};

use crate::client::WeatherError;

/// Parse a provider timestamp to `DateTime<Utc>`
///
/// The provider mostly emits RFC 3339 offsets ("+03:00"), but the documented
/// format is `yyyy-MM-dd'T'HH:mm:ssZ`, which also covers "+0300".
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, WeatherError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(dt.with_timezone(&Utc));
    }

    Err(WeatherError::ParseError(format!(
        "Invalid datetime format: {s}"
    )))
}

/// A city record from `/locations/v1/cities/search`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CityRecord {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "LocalizedName")]
    pub localized_name: String,
    #[serde(rename = "GeoPosition")]
    pub geo_position: Option<GeoPositionRecord>,
    #[serde(rename = "Country")]
    pub country: Option<NamedRecord>,
    #[serde(rename = "AdministrativeArea")]
    pub administrative_area: Option<NamedRecord>,
}

/// Latitude/longitude pair as the provider reports it
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct GeoPositionRecord {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// Wrapper for records that only carry a localized name
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedRecord {
    #[serde(rename = "LocalizedName")]
    pub localized_name: String,
}

impl TryFrom<CityRecord> for City {
    type Error = WeatherError;

    fn try_from(record: CityRecord) -> Result<Self, Self::Error> {
        let id = LocationKey::parse(&record.key)
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        // An out-of-range position is dropped rather than failing the whole
        // search result.
        let position = record
            .geo_position
            .and_then(|p| GeoPosition::new(p.latitude, p.longitude).ok());

        Ok(Self {
            id,
            name: record.localized_name,
            position,
            country: record.country.map(|c| c.localized_name),
            area: record.administrative_area.map(|a| a.localized_name),
        })
    }
}

/// Response body of `/forecasts/v1/daily/5day/{locationKey}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(rename = "Headline")]
    pub headline: HeadlineRecord,
    #[serde(rename = "DailyForecasts")]
    pub daily_forecasts: Vec<DailyForecastRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HeadlineRecord {
    #[serde(rename = "EffectiveDate")]
    pub effective_date: String,
    #[serde(rename = "EffectiveEpochDate")]
    pub effective_epoch_date: i64,
    #[serde(rename = "Severity")]
    pub severity: u8,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "EndDate")]
    pub end_date: String,
    #[serde(rename = "EndEpochDate")]
    pub end_epoch_date: i64,
    #[serde(rename = "MobileLink")]
    pub mobile_link: String,
    #[serde(rename = "Link")]
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DailyForecastRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "EpochDate")]
    pub epoch_date: i64,
    #[serde(rename = "Temperature")]
    pub temperature: TemperatureRecord,
    #[serde(rename = "Day")]
    pub day: DayPartRecord,
    #[serde(rename = "Night")]
    pub night: DayPartRecord,
    #[serde(rename = "Sources")]
    pub sources: Vec<String>,
    #[serde(rename = "MobileLink")]
    pub mobile_link: String,
    #[serde(rename = "Link")]
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TemperatureRecord {
    #[serde(rename = "Minimum")]
    pub minimum: UnitValueRecord,
    #[serde(rename = "Maximum")]
    pub maximum: UnitValueRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UnitValueRecord {
    #[serde(rename = "Value")]
    pub value: f64,
    #[serde(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "UnitType")]
    pub unit_type: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DayPartRecord {
    #[serde(rename = "Icon")]
    pub icon: u8,
    #[serde(rename = "IconPhrase")]
    pub icon_phrase: String,
    #[serde(rename = "HasPrecipitation")]
    pub has_precipitation: bool,
    #[serde(rename = "PrecipitationType")]
    pub precipitation_type: Option<String>,
    #[serde(rename = "PrecipitationIntensity")]
    pub precipitation_intensity: Option<String>,
}

impl From<UnitValueRecord> for UnitValue {
    fn from(record: UnitValueRecord) -> Self {
        Self {
            value: record.value,
            unit: record.unit,
            unit_type: record.unit_type,
        }
    }
}

impl From<TemperatureRecord> for Temperature {
    fn from(record: TemperatureRecord) -> Self {
        Self {
            minimum: record.minimum.into(),
            maximum: record.maximum.into(),
        }
    }
}

impl From<DayPartRecord> for DayPart {
    fn from(record: DayPartRecord) -> Self {
        Self {
            icon: record.icon,
            icon_phrase: record.icon_phrase,
            has_precipitation: record.has_precipitation,
            precipitation_type: record.precipitation_type,
            precipitation_intensity: record.precipitation_intensity,
        }
    }
}

impl TryFrom<DailyForecastRecord> for DailyForecast {
    type Error = WeatherError;

    fn try_from(record: DailyForecastRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_datetime(&record.date)?,
            epoch_date: record.epoch_date,
            temperature: record.temperature.into(),
            day: record.day.into(),
            night: record.night.into(),
            sources: record.sources,
            mobile_link: record.mobile_link,
            link: record.link,
        })
    }
}

impl TryFrom<HeadlineRecord> for Headline {
    type Error = WeatherError;

    fn try_from(record: HeadlineRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            effective_date: parse_datetime(&record.effective_date)?,
            effective_epoch: record.effective_epoch_date,
            severity: record.severity,
            text: record.text,
            category: record.category,
            end_date: parse_datetime(&record.end_date)?,
            end_epoch: record.end_epoch_date,
            mobile_link: record.mobile_link,
            link: record.link,
        })
    }
}

impl TryFrom<ForecastResponse> for WeatherForecast {
    type Error = WeatherError;

    fn try_from(response: ForecastResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            headline: response.headline.try_into()?,
            daily_forecasts: response
                .daily_forecasts
                .into_iter()
                .map(DailyForecast::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}
