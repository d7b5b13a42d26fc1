//! AccuWeather REST integration
//!
//! Client for the two read-only AccuWeather endpoints Skycast uses: city
//! search by text and the 5-day daily forecast for a location key. A static
//! API credential is attached to every outgoing request.

pub mod client;
mod models;

pub use client::{AccuWeatherClient, AccuWeatherConfig, WeatherClient, WeatherError};
