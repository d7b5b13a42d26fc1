//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer: the SQLite
//! favorites and selection stores, the AccuWeather provider adapter, plus
//! configuration loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::WeatherProviderAdapter;
pub use config::{AppConfig, DatabaseConfig, FavoritesConfig};
pub use persistence::{ConnectionPool, SqliteCityStore, SqliteSelectionStore, create_pool};
pub use telemetry::init_tracing;
