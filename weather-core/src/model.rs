use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::convert::fahrenheit_to_celsius;

/// Format of [`WeatherDto::time`]; the instant is always UTC.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Normalized current conditions for one city.
///
/// Built once per lookup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    /// City name exactly as the caller asked for it.
    pub city_name: String,
    /// Country code reported by the provider, or "Unknown".
    pub country_name: String,
    /// When the lookup completed, not the provider's observation time.
    pub time: DateTime<Utc>,
    pub wind_speed: f64,
    pub wind_direction: String,
    /// Statute miles.
    pub visibility: f64,
    pub sky_conditions: String,
    pub temperature_fahrenheit: f64,
    /// °F, one decimal place.
    pub dew_point: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    pub pressure: f64,
}

impl WeatherReading {
    pub fn temperature_celsius(&self) -> f64 {
        fahrenheit_to_celsius(self.temperature_fahrenheit)
    }
}

/// Client-facing shape of a [`WeatherReading`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherDto {
    pub city_name: String,
    pub country_name: String,
    pub time: String,
    pub wind_speed: f64,
    pub wind_direction: String,
    pub visibility: f64,
    pub sky_conditions: String,
    pub temperature_fahrenheit: f64,
    pub temperature_celsius: f64,
    pub dew_point: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl From<&WeatherReading> for WeatherDto {
    fn from(reading: &WeatherReading) -> Self {
        Self {
            city_name: reading.city_name.clone(),
            country_name: reading.country_name.clone(),
            time: reading.time.format(TIME_FORMAT).to_string(),
            wind_speed: reading.wind_speed,
            wind_direction: reading.wind_direction.clone(),
            visibility: reading.visibility,
            sky_conditions: reading.sky_conditions.clone(),
            temperature_fahrenheit: reading.temperature_fahrenheit,
            temperature_celsius: reading.temperature_celsius(),
            dew_point: reading.dew_point,
            humidity: reading.humidity,
            pressure: reading.pressure,
        }
    }
}

impl From<WeatherReading> for WeatherDto {
    fn from(reading: WeatherReading) -> Self {
        Self::from(&reading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    /// Two-letter code, e.g. "US".
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country_code: String,
}
