//! SQLite persistence
//!
//! Connection pooling, schema migrations, and the store implementations
//! behind the application's favorites and selection ports.

mod city_store;
mod connection;
pub mod migrations;
mod selection_store;

pub use city_store::SqliteCityStore;
pub use connection::{ConnectionPool, DatabaseError, PooledConn, create_pool};
pub use selection_store::SqliteSelectionStore;
