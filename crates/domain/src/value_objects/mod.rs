//! Domain value objects

mod geo_position;
mod location_key;

pub use geo_position::GeoPosition;
pub use location_key::LocationKey;
