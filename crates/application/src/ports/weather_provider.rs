//! Weather provider port
//!
//! Defines the interface for the remote, read-only weather service.

use async_trait::async_trait;
use domain::{City, LocationKey, WeatherForecast};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for remote weather provider operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherProviderPort: Send + Sync {
    /// Search cities matching the given text
    ///
    /// Returns whatever the provider returns, including an empty list.
    /// Failures propagate unchanged; there is no retry or local fallback.
    async fn search_city(&self, query: &str) -> Result<Vec<City>, ApplicationError>;

    /// Fetch the multi-day forecast for a location key
    ///
    /// Returns `None` when the provider has no data for the key. Results
    /// are never cached; every call hits the provider.
    async fn fetch_forecast(
        &self,
        location_key: &LocationKey,
    ) -> Result<Option<WeatherForecast>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn WeatherProviderPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn WeatherProviderPort>();
    }
}
