use crate::{Config, WeatherError, WeatherReading, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Source of current weather conditions for a city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Look up current conditions for `city_name`.
    ///
    /// Fails with [`WeatherError::CityNotFound`] when the provider does not
    /// know the city, and with [`WeatherError::Provider`] for everything else.
    async fn current_weather(&self, city_name: &str) -> Result<WeatherReading, WeatherError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for OpenWeatherMap.\n\
                 Hint: run `weather-app configure` or set the OPENWEATHER_API_KEY environment variable."
        )
    })?;

    let settings = &config.openweather;
    let provider = OpenWeatherProvider::with_settings(
        api_key.to_owned(),
        settings.api_url.clone(),
        Duration::from_secs(settings.timeout_secs),
    )?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `weather-app configure`"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
