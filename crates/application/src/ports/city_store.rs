//! Favorites store port
//!
//! Defines the interface for the durable "saved cities" table. Reads are
//! available both as one-shot lookups and as a hot watch stream that emits
//! the full listing after every mutation.

use async_trait::async_trait;
use domain::{City, LocationKey};
#[cfg(test)]
use mockall::automock;
use tokio::sync::watch;

use crate::error::ApplicationError;

/// Port for favorite-city persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CityStorePort: Send + Sync {
    /// Insert a favorite; a conflict on the provider id is silently ignored
    async fn insert(&self, city: &City) -> Result<(), ApplicationError>;

    /// Update an existing favorite row
    ///
    /// Returns false when no row with the city's id exists.
    async fn update(&self, city: &City) -> Result<bool, ApplicationError>;

    /// Delete a favorite; idempotent
    ///
    /// Returns false when there was nothing to delete.
    async fn delete(&self, id: &LocationKey) -> Result<bool, ApplicationError>;

    /// Delete all favorites
    async fn delete_all(&self) -> Result<(), ApplicationError>;

    /// Look up a single favorite
    async fn get(&self, id: &LocationKey) -> Result<Option<City>, ApplicationError>;

    /// List all favorites in insertion order
    async fn list(&self) -> Result<Vec<City>, ApplicationError>;

    /// Watch the favorites listing
    ///
    /// The receiver always holds the current listing and is notified after
    /// every mutation.
    fn watch(&self) -> watch::Receiver<Vec<City>>;
}
