//! Weather repository facade
//!
//! Unifies the remote provider and the local favorites store behind one
//! interface. Methods neither retry nor fall back: every failure surfaces
//! to the caller as-is.

use std::sync::Arc;

use domain::{City, LocationKey, WeatherForecast};
use tokio::sync::watch;
use tracing::debug;

use crate::error::ApplicationError;
use crate::ports::{CityStorePort, WeatherProviderPort};

/// Facade over the remote provider and the favorites store
#[derive(Clone)]
pub struct WeatherRepository {
    provider: Arc<dyn WeatherProviderPort>,
    cities: Arc<dyn CityStorePort>,
}

impl std::fmt::Debug for WeatherRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherRepository").finish_non_exhaustive()
    }
}

impl WeatherRepository {
    /// Create a repository over the given provider and store
    #[must_use]
    pub fn new(provider: Arc<dyn WeatherProviderPort>, cities: Arc<dyn CityStorePort>) -> Self {
        Self { provider, cities }
    }

    /// Search cities matching the given text
    pub async fn search_city(&self, query: &str) -> Result<Vec<City>, ApplicationError> {
        self.provider.search_city(query).await
    }

    /// Fetch the multi-day forecast for a location key
    ///
    /// `None` means the provider has no data for the key. Forecasts are
    /// fetched fresh on every call.
    pub async fn fetch_forecast(
        &self,
        location_key: &LocationKey,
    ) -> Result<Option<WeatherForecast>, ApplicationError> {
        self.provider.fetch_forecast(location_key).await
    }

    /// Store a city as a favorite; a duplicate provider id is ignored
    pub async fn store_city(&self, city: &City) -> Result<(), ApplicationError> {
        self.cities.insert(city).await
    }

    /// Update an existing favorite
    pub async fn update_city(&self, city: &City) -> Result<bool, ApplicationError> {
        self.cities.update(city).await
    }

    /// Look up a single favorite
    pub async fn get_city(&self, id: &LocationKey) -> Result<Option<City>, ApplicationError> {
        self.cities.get(id).await
    }

    /// List all favorites in insertion order
    pub async fn get_cities(&self) -> Result<Vec<City>, ApplicationError> {
        self.cities.list().await
    }

    /// Delete a favorite; no-op if absent
    pub async fn delete_city(&self, id: &LocationKey) -> Result<bool, ApplicationError> {
        self.cities.delete(id).await
    }

    /// Delete all favorites
    pub async fn delete_all_cities(&self) -> Result<(), ApplicationError> {
        self.cities.delete_all().await
    }

    /// Watch the favorites listing
    #[must_use]
    pub fn watch_cities(&self) -> watch::Receiver<Vec<City>> {
        self.cities.watch()
    }

    /// Watch a single favorite row
    ///
    /// Derived from the favorites stream: the receiver is notified on every
    /// favorites change and holds `None` while no row matches. The
    /// forwarding task ends once every receiver is dropped.
    #[must_use]
    pub fn watch_city(&self, id: LocationKey) -> watch::Receiver<Option<City>> {
        let mut cities = self.cities.watch();
        let initial = lookup(&cities.borrow(), &id);
        let (tx, rx) = watch::channel(initial);

        tokio::spawn(async move {
            while cities.changed().await.is_ok() {
                let next = lookup(&cities.borrow(), &id);
                if tx.send(next).is_err() {
                    debug!(id = %id, "Per-city watch closed");
                    break;
                }
            }
        });

        rx
    }
}

fn lookup(cities: &[City], id: &LocationKey) -> Option<City> {
    cities.iter().find(|city| &city.id == id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockWeatherProviderPort;
    use crate::testing::{city, FakeCityStore};

    fn repository_with_store(store: Arc<FakeCityStore>) -> WeatherRepository {
        WeatherRepository::new(Arc::new(MockWeatherProviderPort::new()), store)
    }

    #[tokio::test]
    async fn search_delegates_to_provider() {
        let mut provider = MockWeatherProviderPort::new();
        provider
            .expect_search_city()
            .withf(|query| query == "Kyiv")
            .returning(|_| Ok(vec![city("324505", "Kyiv")]));

        let repository =
            WeatherRepository::new(Arc::new(provider), Arc::new(FakeCityStore::new()));

        let cities = repository.search_city("Kyiv").await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name, "Kyiv");
    }

    #[tokio::test]
    async fn search_propagates_failures_unchanged() {
        let mut provider = MockWeatherProviderPort::new();
        provider
            .expect_search_city()
            .returning(|_| Err(ApplicationError::Network("connection reset".to_string())));

        let repository =
            WeatherRepository::new(Arc::new(provider), Arc::new(FakeCityStore::new()));

        let err = repository.search_city("Kyiv").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Network(_)));
    }

    #[tokio::test]
    async fn store_then_get_round_trips() {
        let store = Arc::new(FakeCityStore::new());
        let repository = repository_with_store(Arc::clone(&store));

        let kyiv = city("324505", "Kyiv");
        repository.store_city(&kyiv).await.unwrap();

        let loaded = repository.get_city(&kyiv.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, kyiv.id);
        assert_eq!(loaded.name, kyiv.name);
        assert_eq!(loaded.area, kyiv.area);
        assert_eq!(loaded.country, kyiv.country);
    }

    #[tokio::test]
    async fn store_ignores_duplicate_provider_id() {
        let store = Arc::new(FakeCityStore::new());
        let repository = repository_with_store(Arc::clone(&store));

        repository.store_city(&city("324505", "Kyiv")).await.unwrap();
        repository.store_city(&city("324505", "Kiev")).await.unwrap();

        let cities = repository.get_cities().await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name, "Kyiv");
    }

    #[tokio::test]
    async fn update_changes_existing_row() {
        let store = Arc::new(FakeCityStore::new());
        let repository = repository_with_store(Arc::clone(&store));

        repository.store_city(&city("324505", "Kyiv")).await.unwrap();
        let updated = repository.update_city(&city("324505", "Kiev")).await.unwrap();
        assert!(updated);

        let cities = repository.get_cities().await.unwrap();
        assert_eq!(cities[0].name, "Kiev");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = Arc::new(FakeCityStore::new());
        let repository = repository_with_store(Arc::clone(&store));

        let kyiv = city("324505", "Kyiv");
        repository.store_city(&kyiv).await.unwrap();

        assert!(repository.delete_city(&kyiv.id).await.unwrap());
        assert!(!repository.delete_city(&kyiv.id).await.unwrap());
    }

    #[tokio::test]
    async fn listing_preserves_insertion_order() {
        let store = Arc::new(FakeCityStore::new());
        let repository = repository_with_store(Arc::clone(&store));

        repository.store_city(&city("1", "Ashford")).await.unwrap();
        repository.store_city(&city("2", "Brighton")).await.unwrap();
        repository.store_city(&city("3", "Canterbury")).await.unwrap();

        let names: Vec<_> = repository
            .get_cities()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Ashford", "Brighton", "Canterbury"]);
    }

    #[tokio::test]
    async fn watch_cities_sees_mutations() {
        let store = Arc::new(FakeCityStore::new());
        let repository = repository_with_store(Arc::clone(&store));

        let mut rx = repository.watch_cities();
        assert!(rx.borrow().is_empty());

        repository.store_city(&city("324505", "Kyiv")).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }

    #[tokio::test]
    async fn watch_city_follows_the_row() {
        let store = Arc::new(FakeCityStore::new());
        let repository = repository_with_store(Arc::clone(&store));

        let kyiv = city("324505", "Kyiv");
        let mut rx = repository.watch_city(kyiv.id.clone());
        assert!(rx.borrow().is_none());

        repository.store_city(&kyiv).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().map(|c| c.name.clone()), Some("Kyiv".to_string()));

        repository.delete_city(&kyiv.id).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
