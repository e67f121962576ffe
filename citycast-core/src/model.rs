use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A validated city lookup key: trimmed, non-empty, at least two characters.
///
/// Holding a `CityQuery` is proof the raw input already passed local
/// validation, so the fetcher never sees blank or single-character names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(SearchError::EmptyInput);
        }
        if trimmed.chars().count() < 2 {
            return Err(SearchError::TooShort);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current weather at the queried location.
///
/// Produced fresh per successful fetch, never persisted. The temperature is
/// kept raw; display rounding is the renderer's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temperature_c: f64,
    pub description: String,
    pub icon_id: String,
}

/// One raw entry of the 3-hourly forecast series, ordered by time ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp_unix: i64,
    /// Provider-formatted date+time, e.g. `"2026-08-29 12:00:00"`.
    pub timestamp_text: String,
    pub temperature_c: f64,
    pub description: String,
    pub icon_id: String,
}

/// One derived daily summary: the midday snapshot of a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Short English weekday name, e.g. `"Mon"`.
    pub day_label: String,
    pub temperature_c: i64,
    pub description: String,
    pub icon_id: String,
}

/// Combined result of one successful lookup: both endpoints answered.
#[derive(Debug, Clone)]
pub struct WeatherBundle {
    pub current: CurrentConditions,
    pub series: Vec<ForecastPoint>,
}
