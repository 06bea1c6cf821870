use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use std::{path::PathBuf, sync::Arc};
use weather_core::{Config, CountryDirectory, WeatherDto, provider_from_config};

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-app", version, about = "Current weather by city")]
pub struct Cli {
    /// Path to the config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Interface to bind, overrides the config file.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on, overrides the config file.
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "New York".
        city: String,
    },

    /// List the built-in countries.
    Countries,

    /// List the built-in cities for a country code.
    Cities {
        /// Two-letter country code, e.g. "US".
        code: String,
    },

    /// Configure the OpenWeatherMap API key and endpoint.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { host, port } => {
                let mut config = load_config(self.config.as_ref())?;
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }

                let provider = provider_from_config(&config)?;
                let state = AppState::new(Arc::from(provider));
                server::start(&config.server.host, config.server.port, state).await?;
            }
            Command::Show { city } => {
                if city.trim().is_empty() {
                    bail!("City name must not be empty");
                }

                let config = load_config(self.config.as_ref())?;
                let provider = provider_from_config(&config)?;

                match provider.current_weather(&city).await {
                    Ok(reading) => println!("{}", render_weather(&WeatherDto::from(reading))),
                    Err(err) => {
                        if err.is_city_not_found() {
                            tracing::debug!(error = %err, "weather lookup failed");
                        } else {
                            tracing::warn!(error = %err, "weather lookup failed");
                        }
                        bail!(err.user_message());
                    }
                }
            }
            Command::Countries => {
                let directory = CountryDirectory::seeded();
                for country in directory.countries() {
                    println!("{}  {}", country.code, country.name);
                }
            }
            Command::Cities { code } => {
                let directory = CountryDirectory::seeded();
                let cities = directory.cities_for_country(&code);
                if cities.is_empty() {
                    println!("No cities known for country code '{code}'.");
                }
                for city in cities {
                    println!("{}", city.name);
                }
            }
            Command::Configure => configure(self.config.as_ref())?,
        }

        Ok(())
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Config file contents without environment overrides, for editing.
fn load_config_file(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_file_from(path),
        None => Config::load_file(),
    }
}

fn configure(path: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = load_config_file(path)?;
    if config.is_provider_configured() {
        println!("An API key is already configured; entering a new one replaces it.");
    }

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    let api_url = Text::new("OpenWeatherMap endpoint:")
        .with_default(&config.openweather.api_url)
        .prompt()
        .context("Failed to read endpoint")?;

    save_credentials(path, api_key.trim(), &api_url)?;

    println!("Configuration saved.");
    Ok(())
}

/// Write the API key and endpoint into the config file, leaving every other
/// setting as the file has it.
fn save_credentials(path: Option<&PathBuf>, api_key: &str, api_url: &str) -> anyhow::Result<()> {
    let mut config = load_config_file(path)?;
    config.set_api_key(api_key.to_string());
    config.openweather.api_url = api_url.to_string();

    match path {
        Some(path) => config.save_to(path),
        None => config.save(),
    }
}

/// Human-readable multi-line rendering of a reading.
pub fn render_weather(w: &WeatherDto) -> String {
    format!(
        "Weather for {}, {} ({})\n\
         \x20 Sky:          {}\n\
         \x20 Temperature:  {:.1}°F ({:.1}°C)\n\
         \x20 Dew point:    {:.1}°F\n\
         \x20 Humidity:     {:.0}%\n\
         \x20 Pressure:     {:.0} hPa\n\
         \x20 Wind:         {:.1} mph {}\n\
         \x20 Visibility:   {:.1} mi",
        w.city_name,
        w.country_name,
        w.time,
        w.sky_conditions,
        w.temperature_fahrenheit,
        w.temperature_celsius,
        w.dew_point,
        w.humidity,
        w.pressure,
        w.wind_speed,
        w.wind_direction,
        w.visibility,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> WeatherDto {
        WeatherDto {
            city_name: "Tokyo".into(),
            country_name: "JP".into(),
            time: "2024-01-15 03:00:00 UTC".into(),
            wind_speed: 4.56,
            wind_direction: "NNW".into(),
            visibility: 6.2137,
            sky_conditions: "few clouds".into(),
            temperature_fahrenheit: 41.0,
            temperature_celsius: 5.0,
            dew_point: 28.4,
            humidity: 60.0,
            pressure: 1021.0,
        }
    }

    #[test]
    fn parses_show_with_city() {
        let cli = Cli::try_parse_from(["weather-app", "show", "New York"]).unwrap();
        assert!(matches!(cli.command, Command::Show { ref city } if city == "New York"));
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from([
            "weather-app",
            "--config",
            "/tmp/w.toml",
            "serve",
            "--port",
            "8080",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/w.toml")));
        assert!(matches!(
            cli.command,
            Command::Serve { host: None, port: Some(8080) }
        ));
    }

    #[test]
    fn show_requires_city() {
        assert!(Cli::try_parse_from(["weather-app", "show"]).is_err());
    }

    #[test]
    fn saving_credentials_ignores_env_overrides() {
        use weather_core::config::{ENV_API_URL, ENV_HOST, ENV_PORT};

        let dir = std::env::temp_dir().join(format!("weather-app-cli-{}", std::process::id()));
        let path = dir.join("config.toml");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "[server]\nport = 6000\n").unwrap();

        // SAFETY: no other test in this crate reads or writes these variables.
        unsafe {
            std::env::set_var(ENV_API_URL, "http://staging.invalid/weather");
            std::env::set_var(ENV_HOST, "0.0.0.0");
            std::env::set_var(ENV_PORT, "not-a-port");
        }

        let result = save_credentials(
            Some(&path),
            "NEW_KEY",
            "https://api.openweathermap.org/data/2.5/weather",
        );

        unsafe {
            std::env::remove_var(ENV_API_URL);
            std::env::remove_var(ENV_HOST);
            std::env::remove_var(ENV_PORT);
        }

        result.expect("saving must not depend on environment overrides");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("staging.invalid"));
        assert!(!written.contains("0.0.0.0"));

        let saved = Config::from_toml(&written).unwrap();
        assert_eq!(saved.api_key(), Some("NEW_KEY"));
        assert_eq!(saved.server.port, 6000);
        assert_eq!(saved.server.host, weather_core::config::DEFAULT_HOST);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn render_rounds_for_display() {
        let out = render_weather(&dto());

        assert!(out.starts_with("Weather for Tokyo, JP (2024-01-15 03:00:00 UTC)"));
        assert!(out.contains("Temperature:  41.0°F (5.0°C)"));
        assert!(out.contains("Wind:         4.6 mph NNW"));
        assert!(out.contains("Visibility:   6.2 mi"));
        assert!(out.contains("few clouds"));
    }
}
