//! SQLite favorites store implementation
//!
//! Implements the `CityStorePort` port using SQLite. The full listing is
//! republished on a watch channel after every mutation so screen models can
//! re-run their reductions.

use std::sync::Arc;

use application::{error::ApplicationError, ports::CityStorePort};
use async_trait::async_trait;
use domain::{City, LocationKey};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tokio::sync::watch;
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

/// SQLite-based favorites store
#[derive(Debug)]
pub struct SqliteCityStore {
    pool: Arc<ConnectionPool>,
    listing: watch::Sender<Vec<City>>,
}

impl SqliteCityStore {
    /// Create a new SQLite favorites store
    ///
    /// Reads the current listing so the watch channel starts with it.
    ///
    /// # Errors
    ///
    /// Returns an error when the initial listing cannot be read.
    pub fn new(pool: Arc<ConnectionPool>) -> Result<Self, ApplicationError> {
        let initial = {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            query_listing(&conn).map_err(|e| ApplicationError::Internal(e.to_string()))?
        };
        let (listing, _rx) = watch::channel(initial);
        Ok(Self { pool, listing })
    }

    /// Run a mutation on the pool, then republish the listing
    async fn mutate<T, F>(&self, mutation: F) -> Result<T, ApplicationError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        let (result, snapshot) = task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            let result =
                mutation(&conn).map_err(|e| ApplicationError::Internal(e.to_string()))?;
            let snapshot =
                query_listing(&conn).map_err(|e| ApplicationError::Internal(e.to_string()))?;
            Ok::<_, ApplicationError>((result, snapshot))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))??;

        self.listing.send_replace(snapshot);
        Ok(result)
    }
}

/// Convert a database row to a `City`
fn row_to_city(row: &Row<'_>) -> Result<City, rusqlite::Error> {
    let city_id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let area: Option<String> = row.get(2)?;
    let country: Option<String> = row.get(3)?;

    let id = LocationKey::parse(&city_id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(City::saved(id, name, area, country))
}

/// Read the full listing in insertion order
fn query_listing(conn: &Connection) -> Result<Vec<City>, rusqlite::Error> {
    let mut statement = conn.prepare(
        "SELECT city_id, name, area, country FROM cities ORDER BY u_id ASC",
    )?;
    let rows = statement.query_map([], row_to_city)?;
    rows.collect()
}

#[async_trait]
impl CityStorePort for SqliteCityStore {
    #[instrument(skip(self, city), fields(city_id = %city.id))]
    async fn insert(&self, city: &City) -> Result<(), ApplicationError> {
        let city = city.clone();
        self.mutate(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO cities (city_id, name, area, country)
                 VALUES (?1, ?2, ?3, ?4)",
                params![city.id.as_str(), city.name, city.area, city.country],
            )?;
            debug!(inserted = inserted > 0, "Stored favorite city");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, city), fields(city_id = %city.id))]
    async fn update(&self, city: &City) -> Result<bool, ApplicationError> {
        let city = city.clone();
        self.mutate(move |conn| {
            let updated = conn.execute(
                "UPDATE cities SET name = ?2, area = ?3, country = ?4 WHERE city_id = ?1",
                params![city.id.as_str(), city.name, city.area, city.country],
            )?;
            debug!(updated = updated > 0, "Updated favorite city");
            Ok(updated > 0)
        })
        .await
    }

    #[instrument(skip(self), fields(city_id = %id))]
    async fn delete(&self, id: &LocationKey) -> Result<bool, ApplicationError> {
        let id = id.as_str().to_owned();
        self.mutate(move |conn| {
            let deleted = conn.execute("DELETE FROM cities WHERE city_id = ?1", [&id])?;
            debug!(deleted = deleted > 0, "Deleted favorite city");
            Ok(deleted > 0)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> Result<(), ApplicationError> {
        self.mutate(|conn| {
            let deleted = conn.execute("DELETE FROM cities", [])?;
            debug!(deleted, "Cleared favorite cities");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self), fields(city_id = %id))]
    async fn get(&self, id: &LocationKey) -> Result<Option<City>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let id = id.as_str().to_owned();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let city = conn
                .query_row(
                    "SELECT city_id, name, area, country FROM cities WHERE city_id = ?1",
                    [&id],
                    row_to_city,
                )
                .optional()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(found = city.is_some(), "Looked up favorite city");
            Ok(city)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<City>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            query_listing(&conn).map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    fn watch(&self) -> watch::Receiver<Vec<City>> {
        self.listing.subscribe()
    }
}
