//! Selection store port
//!
//! Defines the interface for the single persisted "currently selected city"
//! cell.

use async_trait::async_trait;
use domain::LocationKey;
use tokio::sync::watch;

use crate::error::ApplicationError;

/// Port for the persisted current-selection cell
#[async_trait]
pub trait SelectionStorePort: Send + Sync {
    /// Persist the selected city id; `None` clears the selection
    async fn save(&self, id: Option<&LocationKey>) -> Result<(), ApplicationError>;

    /// Read the selected city id; absent or blank reads as `None`
    async fn current(&self) -> Result<Option<LocationKey>, ApplicationError>;

    /// Watch the selection cell
    ///
    /// The receiver always holds the current selection and is notified on
    /// every change.
    fn watch(&self) -> watch::Receiver<Option<LocationKey>>;
}
