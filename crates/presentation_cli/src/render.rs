//! Terminal rendering of cities and forecasts

use chrono::{DateTime, Utc};
use domain::{City, DailyForecast, WeatherForecast};

/// Render a forecast date as "Today" or its weekday name
pub fn day_name(date: DateTime<Utc>, today: DateTime<Utc>) -> String {
    if date.date_naive() == today.date_naive() {
        "Today".to_string()
    } else {
        date.format("%A").to_string()
    }
}

/// One list row for a city: name plus "area, country" when known
pub fn city_row(city: &City, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    let label = city.location_label();
    if label.is_empty() {
        format!("{marker} {}  {}", city.id, city.name)
    } else {
        format!("{marker} {}  {} ({label})", city.id, city.name)
    }
}

/// One line per forecast day
pub fn forecast_row(daily: &DailyForecast, today: DateTime<Utc>) -> String {
    format!(
        "{:<9} {:>9}  day: {}  night: {}",
        day_name(daily.date, today),
        daily.temperature.to_string(),
        daily.day.icon_phrase,
        daily.night.icon_phrase,
    )
}

/// Multi-line rendering of a whole forecast
pub fn forecast_report(forecast: &WeatherForecast, today: DateTime<Utc>) -> String {
    let mut lines = vec![forecast.headline.text.clone()];
    for daily in &forecast.daily_forecasts {
        lines.push(forecast_row(daily, today));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::{DayPart, LocationKey, Temperature, UnitValue};

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, 7, 0, 0).single().unwrap()
    }

    #[test]
    fn day_name_is_today_for_matching_date() {
        assert_eq!(day_name(date(6), date(6)), "Today");
    }

    #[test]
    fn day_name_is_weekday_otherwise() {
        // 2026-08-07 is a Friday
        assert_eq!(day_name(date(7), date(6)), "Friday");
    }

    #[test]
    fn city_row_marks_selection() {
        let city = City::saved(
            LocationKey::parse("324505").unwrap(),
            "Kyiv".to_string(),
            None,
            Some("Ukraine".to_string()),
        );
        let row = city_row(&city, true);
        assert!(row.starts_with('*'));
        assert!(row.contains("Kyiv (Ukraine)"));
    }

    #[test]
    fn forecast_row_shows_both_halves() {
        let daily = DailyForecast {
            date: date(6),
            epoch_date: date(6).timestamp(),
            temperature: Temperature {
                minimum: UnitValue {
                    value: 12.0,
                    unit: "C".to_string(),
                    unit_type: 17,
                },
                maximum: UnitValue {
                    value: 21.0,
                    unit: "C".to_string(),
                    unit_type: 17,
                },
            },
            day: DayPart {
                icon: 12,
                icon_phrase: "Showers".to_string(),
                has_precipitation: true,
                precipitation_type: Some("Rain".to_string()),
                precipitation_intensity: Some("Light".to_string()),
            },
            night: DayPart {
                icon: 34,
                icon_phrase: "Mostly clear".to_string(),
                has_precipitation: false,
                precipitation_type: None,
                precipitation_intensity: None,
            },
            sources: vec![],
            mobile_link: String::new(),
            link: String::new(),
        };

        let row = forecast_row(&daily, date(6));
        assert!(row.contains("Today"));
        assert!(row.contains("12C/21C"));
        assert!(row.contains("Showers"));
        assert!(row.contains("Mostly clear"));
    }
}
