//! SQLite selection store implementation
//!
//! Persists the single "currently selected city" id in the preferences
//! key-value table. A blank value means no selection, mirroring how the
//! cell behaves when it has never been written.

use std::sync::Arc;

use application::{error::ApplicationError, ports::SelectionStorePort};
use async_trait::async_trait;
use domain::LocationKey;
use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::watch;
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

/// Preference key holding the selected city id
const CURRENT_CITY_ID: &str = "city_id";

/// SQLite-based selection store
#[derive(Debug)]
pub struct SqliteSelectionStore {
    pool: Arc<ConnectionPool>,
    cell: watch::Sender<Option<LocationKey>>,
}

impl SqliteSelectionStore {
    /// Create a new SQLite selection store
    ///
    /// Reads the persisted value so the watch channel starts with it.
    ///
    /// # Errors
    ///
    /// Returns an error when the persisted value cannot be read.
    pub fn new(pool: Arc<ConnectionPool>) -> Result<Self, ApplicationError> {
        let initial = {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            read_selection(&conn).map_err(|e| ApplicationError::Internal(e.to_string()))?
        };
        let (cell, _rx) = watch::channel(initial);
        Ok(Self { pool, cell })
    }
}

/// Read the selection, treating absent or blank as `None`
fn read_selection(conn: &Connection) -> Result<Option<LocationKey>, rusqlite::Error> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            [CURRENT_CITY_ID],
            |row| row.get(0),
        )
        .optional()?;

    Ok(value
        .filter(|stored| !stored.trim().is_empty())
        .and_then(|stored| LocationKey::parse(&stored).ok()))
}

#[async_trait]
impl SelectionStorePort for SqliteSelectionStore {
    #[instrument(skip(self), fields(city_id = id.map(LocationKey::as_str).unwrap_or("")))]
    async fn save(&self, id: Option<&LocationKey>) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        // A cleared selection is stored as a blank value, not a deleted row.
        let value = id.map_or_else(String::new, |key| key.as_str().to_owned());
        let next = id.cloned();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![CURRENT_CITY_ID, value],
            )
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!("Saved selected city id");
            Ok::<_, ApplicationError>(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))??;

        self.cell.send_replace(next);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn current(&self) -> Result<Option<LocationKey>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            read_selection(&conn).map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    fn watch(&self) -> watch::Receiver<Option<LocationKey>> {
        self.cell.subscribe()
    }
}
