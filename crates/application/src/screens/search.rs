//! Search screen model
//!
//! Holds the free-text query and reduces provider searches into a
//! [`ViewState`]. Query edits never trigger a search on their own; a search
//! runs only on explicit confirmation, and only once the query is long
//! enough.

use std::sync::{Arc, Mutex};

use domain::City;
use tokio::sync::watch;
use tracing::debug;

use crate::repository::WeatherRepository;
use crate::view_state::ViewState;

/// Screen model for city search
pub struct SearchModel {
    repository: Arc<WeatherRepository>,
    state: watch::Sender<ViewState<Vec<City>>>,
    query: Mutex<String>,
}

impl std::fmt::Debug for SearchModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchModel").finish_non_exhaustive()
    }
}

impl SearchModel {
    /// Queries shorter than this are silently ignored
    pub const MIN_QUERY_LENGTH: usize = 3;

    /// Create a search model in the `Idle` state
    #[must_use]
    pub fn new(repository: Arc<WeatherRepository>) -> Self {
        let (state, _rx) = watch::channel(ViewState::Idle);
        Self {
            repository,
            state,
            query: Mutex::new(String::new()),
        }
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState<Vec<City>>> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> ViewState<Vec<City>> {
        self.state.borrow().clone()
    }

    /// Store a query edit without searching
    pub fn set_query(&self, query: impl Into<String>) {
        #[allow(clippy::unwrap_used)]
        let mut stored = self.query.lock().unwrap();
        *stored = query.into();
    }

    /// The stored query
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn query(&self) -> String {
        self.query.lock().unwrap().clone()
    }

    /// Confirm the stored query
    ///
    /// Does nothing (no state change, no remote call) while the query is
    /// shorter than [`Self::MIN_QUERY_LENGTH`] characters.
    pub async fn trigger(&self) {
        let query = self.query();
        if query.chars().count() >= Self::MIN_QUERY_LENGTH {
            self.search(&query).await;
        } else {
            debug!(query = %query, "Query below minimum length, ignoring");
        }
    }

    /// Run a search for the given text
    pub async fn search(&self, query: &str) {
        self.state.send_replace(ViewState::Loading);

        let next = match self.repository.search_city(query).await {
            Ok(cities) if cities.is_empty() => ViewState::NoResults,
            Ok(cities) => ViewState::Success(cities),
            Err(err) => ViewState::failed(err),
        };
        self.state.send_replace(next);
    }

    /// Re-run the stored query, or fall back to `Idle` when it is too short
    pub async fn retry(&self) {
        let query = self.query();
        if query.chars().count() >= Self::MIN_QUERY_LENGTH {
            self.search(&query).await;
        } else {
            self.state.send_replace(ViewState::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::{LocationKey, WeatherForecast};
    use tokio::sync::Semaphore;

    use crate::error::ApplicationError;
    use crate::ports::{MockWeatherProviderPort, WeatherProviderPort};
    use crate::testing::{city, FakeCityStore};

    fn model_with_provider(provider: impl WeatherProviderPort + 'static) -> SearchModel {
        SearchModel::new(Arc::new(WeatherRepository::new(
            Arc::new(provider),
            Arc::new(FakeCityStore::new()),
        )))
    }

    /// Provider whose search blocks until the test releases it
    struct GatedProvider {
        gate: Arc<Semaphore>,
        result: Vec<City>,
    }

    #[async_trait]
    impl WeatherProviderPort for GatedProvider {
        async fn search_city(&self, _query: &str) -> Result<Vec<City>, ApplicationError> {
            #[allow(clippy::unwrap_used)]
            let _permit = self.gate.acquire().await.unwrap();
            Ok(self.result.clone())
        }

        async fn fetch_forecast(
            &self,
            _location_key: &LocationKey,
        ) -> Result<Option<WeatherForecast>, ApplicationError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn state_is_idle_initially() {
        let model = model_with_provider(MockWeatherProviderPort::new());
        assert_eq!(model.state(), ViewState::Idle);
    }

    #[tokio::test]
    async fn set_query_updates_query_without_searching() {
        // No expectations on the mock: any provider call would panic.
        let model = model_with_provider(MockWeatherProviderPort::new());
        model.set_query("Test");
        assert_eq!(model.query(), "Test");
        assert_eq!(model.state(), ViewState::Idle);
    }

    #[tokio::test]
    async fn trigger_ignores_short_query() {
        let model = model_with_provider(MockWeatherProviderPort::new());
        model.set_query("Te");
        model.trigger().await;
        assert_eq!(model.state(), ViewState::Idle);
    }

    #[tokio::test]
    async fn trigger_searches_at_minimum_length() {
        let mut provider = MockWeatherProviderPort::new();
        provider
            .expect_search_city()
            .withf(|query| query == "Tes")
            .returning(|_| Ok(vec![city("1", "Teston")]));

        let model = model_with_provider(provider);
        model.set_query("Tes");
        model.trigger().await;

        let state = model.state();
        assert!(state.is_success());
        assert_eq!(state.data().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn transitions_through_loading_to_success() {
        let gate = Arc::new(Semaphore::new(0));
        let model = Arc::new(model_with_provider(GatedProvider {
            gate: Arc::clone(&gate),
            result: vec![city("324505", "Kyiv")],
        }));
        let mut rx = model.subscribe();

        let searching = tokio::spawn({
            let model = Arc::clone(&model);
            async move {
                model.set_query("Kyiv");
                model.trigger().await;
            }
        });

        // Loading must be observable while the provider is still working.
        rx.wait_for(|state| matches!(state, ViewState::Loading))
            .await
            .unwrap();

        gate.add_permits(1);
        searching.await.unwrap();

        let state = model.state();
        assert_eq!(
            state.data().map(|cities| cities[0].name.clone()),
            Some("Kyiv".to_string())
        );
    }

    #[tokio::test]
    async fn empty_result_is_no_results_not_error() {
        let mut provider = MockWeatherProviderPort::new();
        provider.expect_search_city().returning(|_| Ok(Vec::new()));

        let model = model_with_provider(provider);
        model.set_query("Xyzzy");
        model.trigger().await;

        assert_eq!(model.state(), ViewState::NoResults);
    }

    #[tokio::test]
    async fn provider_failure_becomes_error_state() {
        let mut provider = MockWeatherProviderPort::new();
        provider
            .expect_search_city()
            .returning(|_| Err(ApplicationError::Network("x".to_string())));

        let model = model_with_provider(provider);
        model.set_query("Kyiv");
        model.trigger().await;

        let state = model.state();
        assert!(state.is_error());
        assert_eq!(
            state.cause().map(ToString::to_string),
            Some("Network error: x".to_string())
        );
    }

    #[tokio::test]
    async fn retry_reruns_last_query() {
        let mut provider = MockWeatherProviderPort::new();
        provider
            .expect_search_city()
            .times(2)
            .returning(|_| Ok(vec![city("324505", "Kyiv")]));

        let model = model_with_provider(provider);
        model.set_query("Kyiv");
        model.trigger().await;
        model.retry().await;

        assert!(model.state().is_success());
    }

    #[tokio::test]
    async fn retry_with_short_query_reverts_to_idle() {
        let mut provider = MockWeatherProviderPort::new();
        provider
            .expect_search_city()
            .returning(|_| Err(ApplicationError::Network("x".to_string())));

        let model = model_with_provider(provider);
        model.set_query("Kyiv");
        model.trigger().await;
        assert!(model.state().is_error());

        model.set_query("Ky");
        model.retry().await;
        assert_eq!(model.state(), ViewState::Idle);
    }
}
