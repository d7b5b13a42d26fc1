//! Manage-favorites screen model
//!
//! Maintains the favorites listing and the selected city reactively, and
//! owns the mutation paths: selecting, removing (with adjacent re-selection)
//! and ingesting a freshly searched city handed over from the search screen
//! as serialized state.

use std::sync::{Arc, Mutex};

use domain::{City, LocationKey};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ApplicationError;
use crate::ports::SelectionStorePort;
use crate::repository::WeatherRepository;
use crate::screens::find_adjacent;
use crate::view_state::ViewState;

/// Default favorites capacity used for the add-city gate
pub const DEFAULT_MAX_CITIES: usize = 14;

/// Screen model for managing favorite cities
pub struct ManageModel {
    inner: Arc<ManageInner>,
    subscription: JoinHandle<()>,
}

struct ManageInner {
    repository: Arc<WeatherRepository>,
    selection: Arc<dyn SelectionStorePort>,
    state: watch::Sender<ViewState<Vec<City>>>,
    cities: Mutex<Vec<City>>,
    selected: Mutex<Option<LocationKey>>,
    max_cities: usize,
}

impl std::fmt::Debug for ManageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManageModel").finish_non_exhaustive()
    }
}

impl ManageModel {
    /// Create the model and start following the favorites and the selection
    #[must_use]
    pub fn new(
        repository: Arc<WeatherRepository>,
        selection: Arc<dyn SelectionStorePort>,
        max_cities: usize,
    ) -> Self {
        let (state, _rx) = watch::channel(ViewState::Loading);
        let inner = Arc::new(ManageInner {
            repository: Arc::clone(&repository),
            selection: Arc::clone(&selection),
            state,
            cities: Mutex::new(Vec::new()),
            selected: Mutex::new(None),
            max_cities,
        });

        let subscription = tokio::spawn({
            let inner = Arc::clone(&inner);
            let mut cities_rx = repository.watch_cities();
            let mut selection_rx = selection.watch();
            async move {
                loop {
                    let listing = cities_rx.borrow_and_update().clone();
                    let selected = selection_rx.borrow_and_update().clone();
                    inner.reduce(listing, selected).await;

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
                debug!("Manage subscription ended");
            }
        });

        Self {
            inner,
            subscription,
        }
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState<Vec<City>>> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> ViewState<Vec<City>> {
        self.inner.state.borrow().clone()
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

    /// Whether another city may be added
    ///
    /// A UI hint only; the storage layer never enforces the capacity.
    #[must_use]
    pub fn can_add_city(&self) -> bool {
        #[allow(clippy::unwrap_used)]
        let count = self.inner.cities.lock().unwrap().len();
        count < self.inner.max_cities
    }

    /// Persist the given city as the current selection
    pub async fn select_city(&self, city: &City) -> Result<(), ApplicationError> {
        self.inner.selection.save(Some(&city.id)).await?;
        // Mirror the selection locally right away for immediate reads.
        {
            #[allow(clippy::unwrap_used)]
            let mut selected = self.inner.selected.lock().unwrap();
            *selected = Some(city.id.clone());
        }
        Ok(())
    }

    /// Remove a favorite
    ///
    /// When the removed city is the selected one, an adjacent favorite takes
    /// over the selection first: the predecessor in the listing, or the
    /// successor when there is none. Emptying the list clears the selection
    /// through the listing subscription.
    pub async fn remove_city(&self, city: &City) -> Result<(), ApplicationError> {
        if self.selected_city_id().as_ref() == Some(&city.id) {
            let ids: Vec<LocationKey> = self
                .cities()
                .into_iter()
                .map(|favorite| favorite.id)
                .collect();
            if let Some(adjacent) = find_adjacent(&ids, &city.id, true) {
                self.inner.selection.save(Some(adjacent)).await?;
            }
        }

        self.inner.repository.delete_city(&city.id).await?;
        Ok(())
    }

    /// Ingest a serialized city handed over on screen entry
    ///
    /// Decodes the payload, stores the city as a favorite unless already
    /// present, and selects it. Storing comes first so the selection always
    /// references a favorite row. A malformed payload surfaces as the
    /// screen's error state.
    pub async fn ingest_city(&self, payload: &str) {
        let city: City = match serde_json::from_str(payload) {
            Ok(city) => city,
            Err(err) => {
                warn!(error = %err, "Discarding malformed city payload");
                self.inner
                    .state
                    .send_replace(ViewState::failed(ApplicationError::Internal(
                        err.to_string(),
                    )));
                return;
            },
        };

        if let Err(err) = self.inner.repository.store_city(&city).await {
            self.inner.state.send_replace(ViewState::failed(err));
            return;
        }
        if let Err(err) = self.select_city(&city).await {
            self.inner.state.send_replace(ViewState::failed(err));
        }
    }
}

impl Drop for ManageModel {
    fn drop(&mut self) {
        self.subscription.abort();
    }
}

impl ManageInner {
    /// Re-run the reduction for the given listing and selection
    async fn reduce(&self, listing: Vec<City>, selected: Option<LocationKey>) {
        {
            #[allow(clippy::unwrap_used)]
            let mut cities = self.cities.lock().unwrap();
            *cities = listing.clone();
        }
        {
            #[allow(clippy::unwrap_used)]
            let mut current = self.selected.lock().unwrap();
            *current = selected.clone();
        }

        if listing.is_empty() {
            self.state.send_replace(ViewState::NoResults);
            // The last favorite is gone; nothing is left to select.
            if selected.is_some() {
                if let Err(err) = self.selection.save(None).await {
                    warn!(error = %err, "Failed to clear selection");
                }
            }
        } else {
            self.state.send_replace(ViewState::Success(listing));
        }
    }
}
