//! In-memory fakes shared by the unit tests
//!
//! The stores mimic the real SQLite implementations closely enough for
//! screen-model tests: insertion order, conflict-ignore on the provider id,
//! and a watch channel republished after every mutation.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use domain::{
    City, DailyForecast, DayPart, Headline, LocationKey, Temperature, UnitValue, WeatherForecast,
};
use tokio::sync::watch;

use crate::error::ApplicationError;
use crate::ports::{CityStorePort, SelectionStorePort};

/// Build a persisted-shape city for tests
#[allow(clippy::unwrap_used)]
pub fn city(id: &str, name: &str) -> City {
    City::saved(
        LocationKey::parse(id).unwrap(),
        name.to_string(),
        Some(format!("{name} Area")),
        Some("Testland".to_string()),
    )
}

/// Build a single-day forecast for tests
#[allow(clippy::unwrap_used)]
pub fn forecast(summary: &str) -> WeatherForecast {
    let date = Utc.with_ymd_and_hms(2026, 8, 6, 7, 0, 0).single().unwrap();
    let clear = DayPart {
        icon: 1,
        icon_phrase: "Sunny".to_string(),
        has_precipitation: false,
        precipitation_type: None,
        precipitation_intensity: None,
    };
    WeatherForecast {
        headline: Headline {
            effective_date: date,
            effective_epoch: date.timestamp(),
            severity: 7,
            text: summary.to_string(),
            category: "mild".to_string(),
            end_date: date,
            end_epoch: date.timestamp(),
            mobile_link: "https://m.example.com".to_string(),
            link: "https://example.com".to_string(),
        },
        daily_forecasts: vec![DailyForecast {
            date,
            epoch_date: date.timestamp(),
            temperature: Temperature {
                minimum: UnitValue {
                    value: 12.0,
                    unit: "C".to_string(),
                    unit_type: 17,
                },
                maximum: UnitValue {
                    value: 21.0,
                    unit: "C".to_string(),
                    unit_type: 17,
                },
            },
            day: clear.clone(),
            night: clear,
            sources: vec!["AccuWeather".to_string()],
            mobile_link: "https://m.example.com?day=1".to_string(),
            link: "https://example.com?day=1".to_string(),
        }],
    }
}

/// In-memory favorites store
pub struct FakeCityStore {
    rows: Mutex<Vec<City>>,
    tx: watch::Sender<Vec<City>>,
}

impl FakeCityStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            rows: Mutex::new(Vec::new()),
            tx,
        }
    }

    pub fn with_cities(cities: Vec<City>) -> Self {
        let (tx, _rx) = watch::channel(cities.clone());
        Self {
            rows: Mutex::new(cities),
            tx,
        }
    }

    fn publish(&self) {
        #[allow(clippy::unwrap_used)]
        let snapshot = self.rows.lock().unwrap().clone();
        self.tx.send_replace(snapshot);
    }
}

#[async_trait]
impl CityStorePort for FakeCityStore {
    async fn insert(&self, city: &City) -> Result<(), ApplicationError> {
        {
            #[allow(clippy::unwrap_used)]
            let mut rows = self.rows.lock().unwrap();
            if !rows.iter().any(|row| row.id == city.id) {
                rows.push(city.clone());
            }
        }
        self.publish();
        Ok(())
    }

    async fn update(&self, city: &City) -> Result<bool, ApplicationError> {
        let updated = {
            #[allow(clippy::unwrap_used)]
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|row| row.id == city.id) {
                Some(row) => {
                    *row = city.clone();
                    true
                },
                None => false,
            }
        };
        self.publish();
        Ok(updated)
    }

    async fn delete(&self, id: &LocationKey) -> Result<bool, ApplicationError> {
        let deleted = {
            #[allow(clippy::unwrap_used)]
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|row| &row.id != id);
            rows.len() < before
        };
        self.publish();
        Ok(deleted)
    }

    async fn delete_all(&self) -> Result<(), ApplicationError> {
        {
            #[allow(clippy::unwrap_used)]
            self.rows.lock().unwrap().clear();
        }
        self.publish();
        Ok(())
    }

    #[allow(clippy::unwrap_used)]
    async fn get(&self, id: &LocationKey) -> Result<Option<City>, ApplicationError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| &row.id == id)
            .cloned())
    }

    #[allow(clippy::unwrap_used)]
    async fn list(&self) -> Result<Vec<City>, ApplicationError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn watch(&self) -> watch::Receiver<Vec<City>> {
        self.tx.subscribe()
    }
}

/// In-memory selection cell
pub struct FakeSelectionStore {
    value: Mutex<Option<LocationKey>>,
    tx: watch::Sender<Option<LocationKey>>,
}

impl FakeSelectionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            value: Mutex::new(None),
            tx,
        }
    }

    pub fn with_selection(id: LocationKey) -> Self {
        let (tx, _rx) = watch::channel(Some(id.clone()));
        Self {
            value: Mutex::new(Some(id)),
            tx,
        }
    }
}

#[async_trait]
impl SelectionStorePort for FakeSelectionStore {
    async fn save(&self, id: Option<&LocationKey>) -> Result<(), ApplicationError> {
        {
            #[allow(clippy::unwrap_used)]
            let mut value = self.value.lock().unwrap();
            *value = id.cloned();
        }
        #[allow(clippy::unwrap_used)]
        let snapshot = self.value.lock().unwrap().clone();
        self.tx.send_replace(snapshot);
        Ok(())
    }

    #[allow(clippy::unwrap_used)]
    async fn current(&self) -> Result<Option<LocationKey>, ApplicationError> {
        Ok(self.value.lock().unwrap().clone())
    }

    fn watch(&self) -> watch::Receiver<Option<LocationKey>> {
        self.tx.subscribe()
    }
}
