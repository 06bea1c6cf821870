use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    convert::{dew_point_fahrenheit, meters_to_miles, wind_direction},
    error::WeatherError,
    model::WeatherReading,
};

use super::WeatherProvider;

const UNKNOWN: &str = "Unknown";

/// Client for the OpenWeatherMap current-weather endpoint, in imperial units.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    api_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_settings(
        api_key: String,
        api_url: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            api_url,
            http,
        })
    }

    async fn fetch_current(&self, city_name: &str) -> Result<WeatherReading, WeatherError> {
        tracing::debug!(city = city_name, url = %self.api_url, "requesting current weather");

        let res = self
            .http
            .get(&self.api_url)
            .query(&[
                ("q", city_name),
                ("appid", self.api_key.as_str()),
                ("units", "imperial"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::CityNotFound(city_name.to_string()));
        }

        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            )
            .into());
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        Ok(parsed.into_observation().into_reading(city_name))
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: Option<OwMain>,
    wind: Option<OwWind>,
    weather: Option<Vec<OwWeather>>,
    /// Meters.
    visibility: Option<f64>,
    sys: Option<OwSys>,
}

/// Provider fields with every default already applied.
#[derive(Debug, Clone, PartialEq)]
struct Observation {
    temp_f: f64,
    humidity: f64,
    pressure: f64,
    wind_speed: f64,
    wind_deg: f64,
    visibility_m: f64,
    description: String,
    country: String,
}

impl OwCurrentResponse {
    fn into_observation(self) -> Observation {
        let main = self.main.unwrap_or_default();
        let wind = self.wind.unwrap_or_default();

        let description = self
            .weather
            .and_then(|list| list.into_iter().next())
            .and_then(|w| w.description)
            .unwrap_or_else(|| UNKNOWN.to_string());

        let country = self
            .sys
            .and_then(|sys| sys.country)
            .unwrap_or_else(|| UNKNOWN.to_string());

        Observation {
            temp_f: main.temp.unwrap_or(0.0),
            humidity: main.humidity.unwrap_or(0.0),
            pressure: main.pressure.unwrap_or(0.0),
            wind_speed: wind.speed.unwrap_or(0.0),
            wind_deg: wind.deg.unwrap_or(0.0),
            visibility_m: self.visibility.unwrap_or(0.0),
            description,
            country,
        }
    }
}

impl Observation {
    fn into_reading(self, city_name: &str) -> WeatherReading {
        WeatherReading {
            city_name: city_name.to_string(),
            country_name: self.country,
            time: Utc::now(),
            wind_speed: self.wind_speed,
            wind_direction: wind_direction(self.wind_deg).to_string(),
            visibility: meters_to_miles(self.visibility_m),
            sky_conditions: self.description,
            temperature_fahrenheit: self.temp_f,
            dew_point: dew_point_fahrenheit(self.temp_f, self.humidity),
            humidity: self.humidity,
            pressure: self.pressure,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city_name: &str) -> Result<WeatherReading, WeatherError> {
        let result = self.fetch_current(city_name).await;

        match &result {
            Ok(reading) => tracing::debug!(
                city = city_name,
                country = %reading.country_name,
                "weather lookup succeeded"
            ),
            Err(WeatherError::CityNotFound(_)) => {
                tracing::warn!(city = city_name, "city not found by OpenWeather")
            }
            Err(err) => {
                tracing::error!(city = city_name, error = %err, "error fetching weather data")
            }
        }

        result
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
