use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

use crate::{
    Config,
    config::UNITS_METRIC,
    error::FetchError,
    model::{CityQuery, CurrentConditions, ForecastPoint, WeatherBundle},
};

/// Placeholder substituted when the provider omits the condition text.
const FALLBACK_DESCRIPTION: &str = "No description available";

/// Placeholder icon (clear sky, day) when the provider omits the icon id.
const FALLBACK_ICON: &str = "01d";

/// Abstraction over the weather lookup backend.
///
/// Both endpoints must answer for a fetch to succeed; there is no
/// partial-success state. The fetcher touches neither persistent storage
/// nor render state.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self, city: &CityQuery) -> Result<WeatherBundle, FetchError>;
}

/// Client for the two OpenWeatherMap 2.5 read endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            http: Client::new(),
        }
    }

    /// Build a client from configuration; errors when no API key is set.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?.to_owned();
        Ok(Self::new(config.base_url().to_owned(), api_key))
    }

    /// GET one endpoint with the shared query parameters and map the
    /// response status to the fetch-error taxonomy.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
    ) -> Result<T, FetchError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", UNITS_METRIC),
            ])
            .send()
            .await
            .map_err(|err| {
                FetchError::Unreachable(
                    anyhow::Error::new(err).context(format!("request to /{endpoint} failed")),
                )
            })?;

        match res.status() {
            StatusCode::NOT_FOUND => Err(FetchError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Unauthorized),
            status if !status.is_success() => Err(FetchError::Unreachable(anyhow::anyhow!(
                "/{endpoint} answered with unexpected status {status}"
            ))),
            _ => res.json::<T>().await.map_err(|err| {
                FetchError::Unreachable(
                    anyhow::Error::new(err).context(format!("malformed /{endpoint} response")),
                )
            }),
        }
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    async fn fetch(&self, city: &CityQuery) -> Result<WeatherBundle, FetchError> {
        debug!(city = city.as_str(), "fetching current conditions and forecast");

        let (current, forecast) = tokio::try_join!(
            self.get_json::<OwCurrentResponse>("weather", city.as_str()),
            self.get_json::<OwForecastResponse>("forecast", city.as_str()),
        )?;

        debug!(
            location = %current.name,
            points = forecast.list.len(),
            "lookup settled"
        );

        Ok(WeatherBundle {
            current: current.into_conditions(),
            series: forecast.list.into_iter().map(OwForecastEntry::into_point).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

impl OwCurrentResponse {
    /// Explicit default substitution for the optional condition fields.
    fn into_conditions(self) -> CurrentConditions {
        let (description, icon_id) = split_weather(self.weather);
        CurrentConditions {
            location_name: self.name,
            temperature_c: self.main.temp,
            description,
            icon_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

impl OwForecastEntry {
    fn into_point(self) -> ForecastPoint {
        let (description, icon_id) = split_weather(self.weather);
        ForecastPoint {
            timestamp_unix: self.dt,
            timestamp_text: self.dt_txt,
            temperature_c: self.main.temp,
            description,
            icon_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

fn split_weather(weather: Vec<OwWeather>) -> (String, String) {
    let first = weather.into_iter().next();
    let description = first
        .as_ref()
        .and_then(|w| w.description.clone())
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());
    let icon_id = first
        .and_then(|w| w.icon)
        .unwrap_or_else(|| FALLBACK_ICON.to_string());
    (description, icon_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_response_substitutes_placeholders() {
        let raw = OwCurrentResponse {
            name: "London".into(),
            main: OwMain { temp: 18.4 },
            weather: vec![],
        };

        let current = raw.into_conditions();
        assert_eq!(current.description, FALLBACK_DESCRIPTION);
        assert_eq!(current.icon_id, FALLBACK_ICON);
        assert_eq!(current.temperature_c, 18.4);
    }

    #[test]
    fn forecast_entry_copies_condition_fields_verbatim() {
        let raw = OwForecastEntry {
            dt: 1_788_177_600,
            dt_txt: "2026-08-31 12:00:00".into(),
            main: OwMain { temp: 21.7 },
            weather: vec![OwWeather {
                description: Some("scattered clouds".into()),
                icon: Some("03d".into()),
            }],
        };

        let point = raw.into_point();
        assert_eq!(point.description, "scattered clouds");
        assert_eq!(point.icon_id, "03d");
        assert_eq!(point.timestamp_text, "2026-08-31 12:00:00");
    }

    #[test]
    fn partially_missing_weather_fields_fall_back_independently() {
        let (description, icon) = split_weather(vec![OwWeather {
            description: Some("mist".into()),
            icon: None,
        }]);

        assert_eq!(description, "mist");
        assert_eq!(icon, FALLBACK_ICON);
    }
}
