//! City entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoPosition, LocationKey};

/// A place known to the weather provider
///
/// Created from provider search results or loaded back from the favorites
/// store. The favorites store keeps a denormalized copy of name, area, and
/// country so a saved list renders without a network call; position is only
/// present on freshly searched cities.
///
/// Two cities refer to the same place when their location keys match, which
/// is also the dedup key used by the favorites store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Stable provider identifier
    pub id: LocationKey,
    /// Localized display name
    pub name: String,
    /// Geographic position, when the provider supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPosition>,
    /// Country name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Administrative area name (state, province, oblast, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl City {
    /// Create a city with only the fields the favorites store persists
    #[must_use]
    pub const fn saved(
        id: LocationKey,
        name: String,
        area: Option<String>,
        country: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            position: None,
            country,
            area,
        }
    }

    /// Render "area, country" for list rows, skipping absent parts
    #[must_use]
    pub fn location_label(&self) -> String {
        match (self.area.as_deref(), self.country.as_deref()) {
            (Some(area), Some(country)) => format!("{area}, {country}"),
            (Some(part), None) | (None, Some(part)) => part.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Whether this city refers to the same place as another
    #[must_use]
    pub fn same_place(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
