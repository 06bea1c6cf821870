use std::sync::Arc;
use weather_core::{CountryDirectory, WeatherProvider};

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub directory: CountryDirectory,
    pub weather: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(weather: Arc<dyn WeatherProvider>) -> Self {
        Self {
            directory: CountryDirectory::seeded(),
            weather,
        }
    }
}
