//! Application configuration
//!
//! Layered: compiled defaults, then an optional `config.toml`, then
//! `SKYCAST_*` environment variables.

mod database;
mod favorites;

use integration_accuweather::AccuWeatherConfig;
use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use favorites::FavoritesConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Weather provider settings
    #[serde(default)]
    pub weather: AccuWeatherConfig,

    /// Favorites settings
    #[serde(default)]
    pub favorites: FavoritesConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Reads `config.toml` from the working directory when present, then
    /// applies `SKYCAST_*` overrides (e.g. `SKYCAST_WEATHER_API_KEY`).
    ///
    /// # Errors
    ///
    /// Returns an error when a source is malformed or deserialization
    /// fails.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("SKYCAST")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_complete() {
        let config = AppConfig::default();
        assert_eq!(config.database.path, "skycast.db");
        assert_eq!(
            config.weather.base_url,
            "https://dataservice.accuweather.com"
        );
        assert_eq!(config.favorites.max_cities, 14);
    }

    #[test]
    fn deserializes_from_partial_toml() {
        let raw = r#"
            [weather]
            api_key = "secret"
            language = "uk-ua"

            [favorites]
            max_cities = 5
        "#;
        let config: AppConfig = toml::from_str(raw).expect("valid toml");
        assert_eq!(config.weather.api_key, "secret");
        assert_eq!(config.weather.language.as_deref(), Some("uk-ua"));
        assert_eq!(config.favorites.max_cities, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.database.max_connections, 5);
    }
}
