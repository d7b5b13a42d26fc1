//! Weather provider adapter - Implements `WeatherProviderPort` using
//! `integration_accuweather`

use application::error::ApplicationError;
use application::ports::WeatherProviderPort;
use async_trait::async_trait;
use domain::{City, LocationKey, WeatherForecast};
use integration_accuweather::{AccuWeatherClient, AccuWeatherConfig, WeatherClient, WeatherError};
use tracing::{debug, instrument};

/// Adapter for the AccuWeather provider
pub struct WeatherProviderAdapter {
    client: AccuWeatherClient,
}

impl std::fmt::Debug for WeatherProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherProviderAdapter")
            .field("client", &"AccuWeatherClient")
            .finish()
    }
}

impl WeatherProviderAdapter {
    /// Create an adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: AccuWeatherConfig) -> Result<Self, ApplicationError> {
        let client = AccuWeatherClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }

    /// Map an integration error to an application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e) => ApplicationError::Network(e),
            WeatherError::RequestFailed(e) | WeatherError::ServiceUnavailable(e) => {
                ApplicationError::Protocol(e)
            },
            WeatherError::ParseError(e) => ApplicationError::Internal(e),
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }
}

#[async_trait]
impl WeatherProviderPort for WeatherProviderAdapter {
    #[instrument(skip(self), fields(query = %query))]
    async fn search_city(&self, query: &str) -> Result<Vec<City>, ApplicationError> {
        let result = self
            .client
            .search_city(query)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(cities) => {
                debug!(count = cities.len(), "Retrieved city search results");
            },
            Err(e) => {
                debug!(error = %e, "City search failed");
            },
        }

        result
    }

    #[instrument(skip(self), fields(location_key = %location_key))]
    async fn fetch_forecast(
        &self,
        location_key: &LocationKey,
    ) -> Result<Option<WeatherForecast>, ApplicationError> {
        let result = self
            .client
            .daily_forecast(location_key)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(Some(forecast)) => {
                debug!(days = forecast.daily_forecasts.len(), "Retrieved forecast");
            },
            Ok(None) => {
                debug!("Provider has no forecast for this key");
            },
            Err(e) => {
                debug!(error = %e, "Forecast fetch failed");
            },
        }

        result
    }
}
