//! Core library for the weather app.
//!
//! This crate defines:
//! - The weather adapter (OpenWeatherMap) and its typed errors
//! - Unit conversions and derived quantities (wind direction, dew point)
//! - The static country/city directory
//! - Configuration & credentials handling
//!
//! It is used by `weather-app`, but can also be reused by other binaries or services.

pub mod config;
pub mod convert;
pub mod directory;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, OpenWeatherSettings, ServerConfig};
pub use directory::CountryDirectory;
pub use error::WeatherError;
pub use model::{City, Country, WeatherDto, WeatherReading};
pub use provider::{WeatherProvider, provider_from_config};
