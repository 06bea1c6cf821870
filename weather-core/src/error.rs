use thiserror::Error;

/// Failures a weather lookup can surface to its caller.
///
/// Exactly two kinds exist: the provider does not know the city, or
/// anything else went wrong while talking to it.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider answered with "not found" for the requested city.
    #[error("City '{0}' not found")]
    CityNotFound(String),

    /// Transport, unexpected status, or response parsing failure.
    #[error("Weather provider error: {0:#}")]
    Provider(#[from] anyhow::Error),
}

impl WeatherError {
    /// Text suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::CityNotFound(city) => {
                format!("City '{city}' was not found. Please try a different name.")
            }
            Self::Provider(_) => {
                "Unable to fetch weather data right now. Please try again later.".to_string()
            }
        }
    }

    pub fn is_city_not_found(&self) -> bool {
        matches!(self, Self::CityNotFound(_))
    }
}
