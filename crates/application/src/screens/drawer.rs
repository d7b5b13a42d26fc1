//! Drawer screen model
//!
//! The read-mostly companion of the manage screen: a reactive favorites
//! listing plus the selected id, and a way to switch the selection.

use std::sync::{Arc, Mutex};

use domain::{City, LocationKey};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::ApplicationError;
use crate::ports::SelectionStorePort;
use crate::repository::WeatherRepository;

/// Screen model for the navigation drawer
pub struct DrawerModel {
    inner: Arc<DrawerInner>,
    subscription: JoinHandle<()>,
}

struct DrawerInner {
    selection: Arc<dyn SelectionStorePort>,
    cities: Mutex<Vec<City>>,
    selected: Mutex<Option<LocationKey>>,
}

impl std::fmt::Debug for DrawerModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawerModel").finish_non_exhaustive()
    }
}

impl DrawerModel {
    /// Create the model and start following the favorites and the selection
    #[must_use]
    pub fn new(
        repository: &WeatherRepository,
        selection: Arc<dyn SelectionStorePort>,
    ) -> Self {
        let inner = Arc::new(DrawerInner {
            selection: Arc::clone(&selection),
            cities: Mutex::new(Vec::new()),
            selected: Mutex::new(None),
        });

        let subscription = tokio::spawn({
            let inner = Arc::clone(&inner);
            let mut cities_rx = repository.watch_cities();
            let mut selection_rx = selection.watch();
            async move {
                loop {
                    {
                        #[allow(clippy::unwrap_used)]
                        let mut cities = inner.cities.lock().unwrap();
                        *cities = cities_rx.borrow_and_update().clone();
                    }
                    {
                        #[allow(clippy::unwrap_used)]
                        let mut selected = inner.selected.lock().unwrap();
                        *selected = selection_rx.borrow_and_update().clone();
                    }

                    tokio::select! {
                        changed = cities_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        },
                        changed = selection_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        },
                    }
                }
                debug!("Drawer subscription ended");
            }
        });

        Self {
            inner,
            subscription,
        }
    }

    /// Snapshot of the favorites listing
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn cities(&self) -> Vec<City> {
        self.inner.cities.lock().unwrap().clone()
    }

    /// The currently selected city id
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn selected_city_id(&self) -> Option<LocationKey> {
        self.inner.selected.lock().unwrap().clone()
    }

    /// Persist the given city as the current selection
    pub async fn select_city(&self, city: &City) -> Result<(), ApplicationError> {
        self.inner.selection.save(Some(&city.id)).await
    }
}

impl Drop for DrawerModel {
    fn drop(&mut self) {
        self.subscription.abort();
    }
}
