//! Detail (forecast) screen model
//!
//! Follows the persisted selection: whenever the selection cell or the
//! favorites listing emits, the model re-resolves the selected city and
//! fetches a fresh forecast for it. Forecasts are never cached.

use std::sync::{Arc, Mutex};

use domain::{City, DomainError, LocationKey, WeatherForecast};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::ports::SelectionStorePort;
use crate::repository::WeatherRepository;
use crate::view_state::ViewState;

/// Screen model for the forecast screen
pub struct DetailModel {
    inner: Arc<DetailInner>,
    subscription: JoinHandle<()>,
}

struct DetailInner {
    repository: Arc<WeatherRepository>,
    state: watch::Sender<ViewState<WeatherForecast>>,
    city: Mutex<Option<City>>,
}

impl std::fmt::Debug for DetailModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailModel").finish_non_exhaustive()
    }
}

impl DetailModel {
    /// Create the model and start following the selection
    ///
    /// The subscription lives until the model is dropped or the watched
    /// stores go away.
    #[must_use]
    pub fn new(
        repository: Arc<WeatherRepository>,
        selection: Arc<dyn SelectionStorePort>,
    ) -> Self {
        let (state, _rx) = watch::channel(ViewState::Loading);
        let inner = Arc::new(DetailInner {
            repository: Arc::clone(&repository),
            state,
            city: Mutex::new(None),
        });

        let subscription = tokio::spawn({
            let inner = Arc::clone(&inner);
            let mut selection_rx = selection.watch();
            let mut cities_rx = repository.watch_cities();
            async move {
                loop {
                    let selected = selection_rx.borrow_and_update().clone();
                    cities_rx.mark_unchanged();
                    inner.refresh(selected).await;

                    tokio::select! {
                        changed = selection_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        },
                        changed = cities_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        },
                    }
                }
                debug!("Detail subscription ended");
            }
        });

        Self {
            inner,
            subscription,
        }
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState<WeatherForecast>> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> ViewState<WeatherForecast> {
        self.inner.state.borrow().clone()
    }

    /// The city whose forecast is currently shown, if any
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn city(&self) -> Option<City> {
        self.inner.city.lock().unwrap().clone()
    }

    /// Re-fetch the forecast of the loaded city, or revert to `Idle`
    pub async fn retry(&self) {
        let city = self.city();
        match city {
            Some(city) => self.inner.load_forecast(&city.id).await,
            None => {
                self.inner.state.send_replace(ViewState::Idle);
            },
        }
    }
}

impl Drop for DetailModel {
    fn drop(&mut self) {
        self.subscription.abort();
    }
}

impl DetailInner {
    /// Re-run the reduction for the given selection
    async fn refresh(&self, selected: Option<LocationKey>) {
        let Some(id) = selected else {
            self.set_city(None);
            self.state.send_replace(ViewState::Idle);
            return;
        };

        match self.repository.get_city(&id).await {
            Ok(Some(city)) => {
                self.set_city(Some(city));
                self.load_forecast(&id).await;
            },
            Ok(None) => {
                self.set_city(None);
                self.state.send_replace(ViewState::NoResults);
            },
            Err(err) => {
                self.state.send_replace(ViewState::failed(err));
            },
        }
    }

    async fn load_forecast(&self, id: &LocationKey) {
        self.state.send_replace(ViewState::Loading);

        let next = match self.repository.fetch_forecast(id).await {
            Ok(Some(forecast)) => ViewState::Success(forecast),
            Ok(None) => {
                ViewState::failed(DomainError::not_found("Forecast", id.as_str()).into())
            },
            Err(err) => ViewState::failed(err),
        };
        self.state.send_replace(next);
    }

    fn set_city(&self, city: Option<City>) {
        #[allow(clippy::unwrap_used)]
        let mut stored = self.city.lock().unwrap();
        *stored = city;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::error::ApplicationError;
    use crate::ports::{MockWeatherProviderPort, SelectionStorePort};
    use crate::testing::{city, forecast, FakeCityStore, FakeSelectionStore};

    async fn wait_for<T: Clone + Send + Sync + 'static>(
        rx: &mut watch::Receiver<T>,
        pred: impl FnMut(&T) -> bool,
    ) -> T {
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
            .await
            .expect("state change timed out")
            .expect("state channel closed")
            .clone()
    }

    fn repository(
        provider: MockWeatherProviderPort,
        store: Arc<FakeCityStore>,
    ) -> Arc<WeatherRepository> {
        Arc::new(WeatherRepository::new(Arc::new(provider), store))
    }

    #[tokio::test]
    async fn idle_when_nothing_selected() {
        let repo = repository(MockWeatherProviderPort::new(), Arc::new(FakeCityStore::new()));
        let selection = Arc::new(FakeSelectionStore::new());
        let model = DetailModel::new(repo, selection);

        let mut rx = model.subscribe();
        let state = wait_for(&mut rx, |s| !matches!(s, ViewState::Loading)).await;
        assert_eq!(state, ViewState::Idle);
        assert!(model.city().is_none());
    }

    #[tokio::test]
    async fn no_results_when_selection_missing_from_favorites() {
        let repo = repository(MockWeatherProviderPort::new(), Arc::new(FakeCityStore::new()));
        let selection = Arc::new(FakeSelectionStore::with_selection(
            domain::LocationKey::parse("324505").unwrap(),
        ));
        let model = DetailModel::new(repo, selection);

        let mut rx = model.subscribe();
        let state = wait_for(&mut rx, |s| matches!(s, ViewState::NoResults)).await;
        assert_eq!(state, ViewState::NoResults);
    }

    #[tokio::test]
    async fn fetches_forecast_for_selected_favorite() {
        let kyiv = city("324505", "Kyiv");
        let store = Arc::new(FakeCityStore::with_cities(vec![kyiv.clone()]));

        let mut provider = MockWeatherProviderPort::new();
        provider
            .expect_fetch_forecast()
            .withf(|key| key.as_str() == "324505")
            .returning(|_| Ok(Some(forecast("Sunny spell"))));

        let selection = Arc::new(FakeSelectionStore::with_selection(kyiv.id.clone()));
        let model = DetailModel::new(repository(provider, store), selection);

        let mut rx = model.subscribe();
        let state = wait_for(&mut rx, ViewState::is_success).await;
        assert_eq!(
            state.data().map(|f| f.headline.text.clone()),
            Some("Sunny spell".to_string())
        );
        assert_eq!(model.city().map(|c| c.name), Some("Kyiv".to_string()));
    }

    #[tokio::test]
    async fn missing_forecast_becomes_error() {
        let kyiv = city("324505", "Kyiv");
        let store = Arc::new(FakeCityStore::with_cities(vec![kyiv.clone()]));

        let mut provider = MockWeatherProviderPort::new();
        provider.expect_fetch_forecast().returning(|_| Ok(None));

        let selection = Arc::new(FakeSelectionStore::with_selection(kyiv.id.clone()));
        let model = DetailModel::new(repository(provider, store), selection);

        let mut rx = model.subscribe();
        let state = wait_for(&mut rx, ViewState::is_error).await;
        assert_eq!(
            state.cause().map(ToString::to_string),
            Some("Forecast not found: 324505".to_string())
        );
    }

    #[tokio::test]
    async fn provider_failure_becomes_error() {
        let kyiv = city("324505", "Kyiv");
        let store = Arc::new(FakeCityStore::with_cities(vec![kyiv.clone()]));

        let mut provider = MockWeatherProviderPort::new();
        provider
            .expect_fetch_forecast()
            .returning(|_| Err(ApplicationError::Network("connection reset".to_string())));

        let selection = Arc::new(FakeSelectionStore::with_selection(kyiv.id.clone()));
        let model = DetailModel::new(repository(provider, store), selection);

        let mut rx = model.subscribe();
        let state = wait_for(&mut rx, ViewState::is_error).await;
        assert_eq!(
            state.cause().map(ToString::to_string),
            Some("Network error: connection reset".to_string())
        );
    }

    #[tokio::test]
    async fn selection_change_retriggers_fetch() {
        let kyiv = city("324505", "Kyiv");
        let store = Arc::new(FakeCityStore::with_cities(vec![kyiv.clone()]));

        let mut provider = MockWeatherProviderPort::new();
        provider
            .expect_fetch_forecast()
            .returning(|_| Ok(Some(forecast("Sunny spell"))));

        let selection = Arc::new(FakeSelectionStore::new());
        let model = DetailModel::new(
            repository(provider, store),
            Arc::clone(&selection) as Arc<dyn SelectionStorePort>,
        );

        let mut rx = model.subscribe();
        wait_for(&mut rx, |s| matches!(s, ViewState::Idle)).await;

        selection.save(Some(&kyiv.id)).await.unwrap();
        let state = wait_for(&mut rx, ViewState::is_success).await;
        assert!(state.is_success());
    }

    #[tokio::test]
    async fn retry_refetches_loaded_city() {
        let kyiv = city("324505", "Kyiv");
        let store = Arc::new(FakeCityStore::with_cities(vec![kyiv.clone()]));

        let mut provider = MockWeatherProviderPort::new();
        let mut calls = 0u32;
        provider.expect_fetch_forecast().returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(ApplicationError::Network("flaky".to_string()))
            } else {
                Ok(Some(forecast("Second time lucky")))
            }
        });

        let selection = Arc::new(FakeSelectionStore::with_selection(kyiv.id.clone()));
        let model = DetailModel::new(repository(provider, store), selection);

        let mut rx = model.subscribe();
        wait_for(&mut rx, ViewState::is_error).await;

        model.retry().await;
        let state = wait_for(&mut rx, ViewState::is_success).await;
        assert_eq!(
            state.data().map(|f| f.headline.text.clone()),
            Some("Second time lucky".to_string())
        );
    }

    #[tokio::test]
    async fn retry_without_city_reverts_to_idle() {
        let repo = repository(MockWeatherProviderPort::new(), Arc::new(FakeCityStore::new()));
        let selection = Arc::new(FakeSelectionStore::new());
        let model = DetailModel::new(repo, selection);

        let mut rx = model.subscribe();
        wait_for(&mut rx, |s| matches!(s, ViewState::Idle)).await;

        model.retry().await;
        assert_eq!(model.state(), ViewState::Idle);
    }
}
