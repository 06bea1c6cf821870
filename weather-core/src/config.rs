use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5264;

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_API_URL: &str = "OPENWEATHER_API_URL";
pub const ENV_HOST: &str = "WEATHER_APP_HOST";
pub const ENV_PORT: &str = "WEATHER_APP_PORT";

/// Settings for the OpenWeatherMap current-weather endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenWeatherSettings {
    pub api_key: Option<String>,
    pub api_url: String,
    /// Timeout for the outbound request, in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenWeatherSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [openweather]
/// api_key = "..."
///
/// [server]
/// port = 5264
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub openweather: OpenWeatherSettings,
    pub server: ServerConfig,
}

impl Config {
    /// Load config from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from `path`, or defaults if the file doesn't exist yet,
    /// then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::load_file_from(path)?;
        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Contents of the config file at the default location, without
    /// environment overrides.
    pub fn load_file() -> Result<Self> {
        Self::load_file_from(&Self::config_file_path()?)
    }

    /// Contents of the config file at `path` (or defaults if it doesn't exist),
    /// without environment overrides. Use this before saving.
    pub fn load_file_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Override fields from variables resolved by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.openweather.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.openweather.api_url = url;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .parse()
                .with_context(|| format!("{ENV_PORT} must be a port number, got '{port}'"))?;
        }
        Ok(())
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-app", "weather-app")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the provider API key, if one is set.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    pub fn is_provider_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_empty() {
        let cfg = Config::from_toml("").expect("empty config must parse");

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.openweather.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.openweather.timeout_secs, 10);
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert!(!cfg.is_provider_configured());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = Config::from_toml(
            r#"
            [openweather]
            api_key = "KEY"

            [server]
            port = 8080
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.api_key(), Some("KEY"));
        assert_eq!(cfg.openweather.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.server.host, DEFAULT_HOST);
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert_eq!(cfg.api_key(), None);
        assert!(!cfg.is_provider_configured());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let vars = env(&[
            (ENV_API_KEY, "ENV_KEY"),
            (ENV_API_URL, "http://localhost:9999/weather"),
            (ENV_PORT, "7000"),
        ]);
        cfg.apply_env(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
        assert_eq!(cfg.openweather.api_url, "http://localhost:9999/weather");
        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.server.host, DEFAULT_HOST);
    }

    #[test]
    fn invalid_port_env_is_rejected() {
        let mut cfg = Config::default();
        let vars = env(&[(ENV_PORT, "not-a-port")]);

        let err = cfg.apply_env(|name| vars.get(name).cloned()).unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));
    }

    #[test]
    fn load_file_from_keeps_file_values_only() {
        let dir = std::env::temp_dir().join(format!("weather-app-file-{}", std::process::id()));
        let path = dir.join("config.toml");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, "[openweather]\napi_url = \"http://file.example/weather\"\n").unwrap();

        let from_file = Config::load_file_from(&path).unwrap();
        assert_eq!(from_file.openweather.api_url, "http://file.example/weather");

        let mut effective = from_file.clone();
        let vars = env(&[(ENV_API_URL, "http://staging.invalid/weather")]);
        effective.apply_env(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(effective.openweather.api_url, "http://staging.invalid/weather");
        assert_eq!(from_file.openweather.api_url, "http://file.example/weather");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_file_from_missing_path_gives_defaults() {
        let path = std::env::temp_dir().join("weather-app-does-not-exist").join("config.toml");
        assert_eq!(Config::load_file_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("weather-app-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("SAVED".into());
        cfg.server.port = 6000;
        cfg.save_to(&path).expect("save must succeed");

        let contents = fs::read_to_string(&path).unwrap();
        let loaded = Config::from_toml(&contents).unwrap();
        assert_eq!(loaded, cfg);

        let _ = fs::remove_dir_all(&dir);
    }
}
