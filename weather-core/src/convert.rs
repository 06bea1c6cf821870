//! Unit conversions and derived quantities used when mapping provider data.

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Lowest relative humidity (percent) fed into the dew point logarithm.
pub const MIN_DEW_POINT_HUMIDITY_PCT: f64 = 0.1;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const SECTOR_DEGREES: f64 = 360.0 / 16.0;

// Magnus formula coefficients.
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Map a bearing in degrees to one of the 16 compass points.
///
/// Any finite input is accepted; bearings wrap around, so 360° and -360°
/// both map to "N".
pub fn wind_direction(degrees: f64) -> &'static str {
    let bearing = degrees.rem_euclid(360.0);
    let index = (bearing / SECTOR_DEGREES).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

/// Dew point in °F from air temperature in °F and relative humidity in
/// percent, rounded to one decimal place.
///
/// Humidity below [`MIN_DEW_POINT_HUMIDITY_PCT`] is clamped to it so the
/// result stays finite.
pub fn dew_point_fahrenheit(temperature_f: f64, humidity_pct: f64) -> f64 {
    let temp_c = fahrenheit_to_celsius(temperature_f);
    let humidity = humidity_pct.max(MIN_DEW_POINT_HUMIDITY_PCT);

    let alpha = (MAGNUS_A * temp_c) / (MAGNUS_B + temp_c) + (humidity / 100.0).ln();
    let dew_point_c = (MAGNUS_B * alpha) / (MAGNUS_A - alpha);

    round_to(celsius_to_fahrenheit(dew_point_c), 1)
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
