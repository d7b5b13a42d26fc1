//! Domain entities

mod city;
mod forecast;

pub use city::City;
pub use forecast::{DailyForecast, DayPart, Headline, Temperature, UnitValue, WeatherForecast};
