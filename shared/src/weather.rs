use serde::Deserialize;
use thiserror::Error;

use crate::config::WEATHER_API_URL;
use crate::geo::Coordinate;

pub const WEATHER_UNAVAILABLE: &str = "Unable to load weather data";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(String),
    #[error("weather service answered with status {0}")]
    Status(u16),
    #[error("weather payload is malformed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("weather payload has no conditions")]
    NoConditions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub temp_f: i32,
    pub condition: String,
    pub humidity: u8,
    pub wind_mph: i32,
    /// Not part of the current-conditions feed.
    pub uv_index: Option<u8>,
    pub icon: &'static str,
}

impl WeatherReport {
    /// Sample conditions shown when no weather service is configured.
    pub fn mock() -> Self {
        Self {
            temp_f: 72,
            condition: "Partly Cloudy".to_string(),
            humidity: 65,
            wind_mph: 8,
            uv_index: Some(6),
            icon: "\u{26C5}",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherPanel {
    /// No location yet, or a fetch is in flight.
    Loading,
    Ready(WeatherReport),
    Unavailable,
}

impl WeatherPanel {
    pub fn from_result(result: Result<WeatherReport, WeatherError>) -> Self {
        match result {
            Ok(report) => WeatherPanel::Ready(report),
            Err(err) => {
                log::error!("weather fetch failed: {err}");
                WeatherPanel::Unavailable
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenWeatherPayload {
    weather: Vec<OpenWeatherCondition>,
    main: OpenWeatherMain,
    #[serde(default)]
    wind: Option<OpenWeatherWind>,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherWind {
    speed: f64,
}

/// Current-conditions request in imperial units.
pub fn openweather_url(at: Coordinate, api_key: &str) -> String {
    format!(
        "{WEATHER_API_URL}?lat={}&lon={}&units=imperial&appid={api_key}",
        at.latitude(),
        at.longitude()
    )
}

pub fn parse_openweather(body: &str) -> Result<WeatherReport, WeatherError> {
    let payload: OpenWeatherPayload = serde_json::from_str(body)?;
    let condition = payload
        .weather
        .into_iter()
        .next()
        .ok_or(WeatherError::NoConditions)?;
    Ok(WeatherReport {
        temp_f: payload.main.temp.round() as i32,
        condition: title_case(&condition.description),
        humidity: payload.main.humidity.round().clamp(0.0, 100.0) as u8,
        wind_mph: payload.wind.map_or(0, |w| w.speed.round() as i32),
        uv_index: None,
        icon: icon_for(&condition.icon),
    })
}

/// Emoji for an OpenWeatherMap icon code such as `"03d"`.
pub fn icon_for(code: &str) -> &'static str {
    match code.get(..2) {
        Some("01") => "\u{2600}\u{FE0F}",
        Some("02") => "\u{26C5}",
        Some("03") | Some("04") => "\u{2601}\u{FE0F}",
        Some("09") | Some("10") => "\u{1F327}\u{FE0F}",
        Some("11") => "\u{26C8}\u{FE0F}",
        Some("13") => "\u{2744}\u{FE0F}",
        Some("50") => "\u{1F32B}\u{FE0F}",
        _ => "\u{1F321}\u{FE0F}",
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
