//! AccuWeather client
//!
//! HTTP client for the AccuWeather locations and forecasts endpoints.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use domain::{City, LocationKey, WeatherForecast};

use crate::models::{CityRecord, ForecastResponse};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuWeatherConfig {
    /// AccuWeather API base URL (default: <https://dataservice.accuweather.com>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Static API credential sent as a bearer token with every request
    #[serde(default)]
    pub api_key: String,

    /// Response language, e.g. "en-us" (provider default when unset)
    #[serde(default)]
    pub language: Option<String>,

    /// Connection timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://dataservice.accuweather.com".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for AccuWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            language: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Weather client trait for provider lookups
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Search cities matching the given text
    async fn search_city(&self, query: &str) -> Result<Vec<City>, WeatherError>;

    /// Fetch the 5-day daily forecast for a location key
    ///
    /// Returns `None` when the provider has no data for the key.
    async fn daily_forecast(
        &self,
        location_key: &LocationKey,
    ) -> Result<Option<WeatherForecast>, WeatherError>;
}

/// AccuWeather HTTP client implementation
#[derive(Debug)]
pub struct AccuWeatherClient {
    client: reqwest::Client,
    config: AccuWeatherConfig,
}

impl AccuWeatherClient {
    /// Create a new AccuWeather client with the given configuration
    ///
    /// The API credential is installed as a default header so every request
    /// carries it.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized or the
    /// credential is not a valid header value.
    pub fn new(config: AccuWeatherConfig) -> Result<Self, WeatherError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Build the URL for a city search request
    fn build_search_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}/locations/v1/cities/search?q={}",
            self.config.base_url,
            urlencode(query)
        );
        if let Some(language) = &self.config.language {
            url.push_str("&language=");
            url.push_str(language);
        }
        url
    }

    /// Build the URL for a 5-day forecast request
    fn build_forecast_url(&self, location_key: &LocationKey) -> String {
        let mut url = format!(
            "{}/forecasts/v1/daily/5day/{}",
            self.config.base_url,
            location_key.as_str()
        );
        if let Some(language) = &self.config.language {
            url.push_str("?language=");
            url.push_str(language);
        }
        url
    }

    /// Map a non-success status to the matching error
    fn status_error(status: reqwest::StatusCode) -> WeatherError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            WeatherError::RateLimitExceeded
        } else if status.is_server_error() {
            WeatherError::ServiceUnavailable(format!("HTTP {status}"))
        } else {
            WeatherError::RequestFailed(format!("HTTP {status}"))
        }
    }
}

/// Percent-encode the characters that matter for a query value
fn urlencode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            },
            b' ' => encoded.push_str("%20"),
            other => {
                encoded.push('%');
                encoded.push_str(&format!("{other:02X}"));
            },
        }
    }
    encoded
}

#[async_trait]
impl WeatherClient for AccuWeatherClient {
    #[instrument(skip(self), fields(query = %query))]
    async fn search_city(&self, query: &str) -> Result<Vec<City>, WeatherError> {
        let url = self.build_search_url(query);
        debug!(url = %url, "Searching cities");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status));
        }

        let records: Vec<CityRecord> = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let cities = records
            .into_iter()
            .map(City::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = cities.len(), "City search complete");
        Ok(cities)
    }

    #[instrument(skip(self), fields(location_key = %location_key))]
    async fn daily_forecast(
        &self,
        location_key: &LocationKey,
    ) -> Result<Option<WeatherForecast>, WeatherError> {
        let url = self.build_forecast_url(location_key);
        debug!(url = %url, "Fetching 5-day forecast");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!("Provider has no forecast for this key");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::status_error(status));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let forecast = WeatherForecast::try_from(body)?;
        debug!(days = forecast.daily_forecasts.len(), "Forecast retrieved");
        Ok(Some(forecast))
    }
}
