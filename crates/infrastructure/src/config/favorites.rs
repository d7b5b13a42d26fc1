//! Favorites configuration.

use serde::{Deserialize, Serialize};

/// Favorites configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesConfig {
    /// Capacity used for the add-city gate (a UI hint, never enforced by
    /// the store)
    #[serde(default = "default_max_cities")]
    pub max_cities: usize,
}

const fn default_max_cities() -> usize {
    14
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            max_cities: default_max_cities(),
        }
    }
}
