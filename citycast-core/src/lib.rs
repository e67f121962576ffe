//! Core library for the `citycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Input validation and the lookup session lifecycle
//! - The weather fetcher (two dependent OpenWeather endpoints)
//! - Forecast reduction (3-hourly series → 5 daily summaries)
//! - The persisted recency list of previous searches
//!
//! It is used by `citycast-cli`, but can also be reused by other binaries or services.
//! Rendering stays outside: the session controller emits [`render::RenderPayload`]
//! values to whatever [`render::RenderSink`] the embedding surface provides.

pub mod config;
pub mod error;
pub mod forecast;
pub mod history;
pub mod model;
pub mod provider;
pub mod render;
pub mod session;
pub mod store;

pub use config::Config;
pub use error::{FetchError, SearchError};
pub use forecast::reduce_daily;
pub use history::RecentSearches;
pub use model::{CityQuery, CurrentConditions, DailyForecast, ForecastPoint, WeatherBundle};
pub use provider::{OpenWeatherClient, WeatherFetcher};
pub use render::{RenderPayload, RenderSink};
pub use session::{SessionController, SessionState};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
