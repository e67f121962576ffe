//! Forecast reduction: collapse a 3-hourly time series into at most five
//! daily summaries by taking the midday snapshot of each calendar day.

use chrono::{DateTime, Utc};

use crate::model::{DailyForecast, ForecastPoint};

/// Number of days covered by the derived forecast.
pub const FORECAST_DAYS: usize = 5;

/// Time-of-day suffix selecting one representative point per calendar day.
const MIDDAY: &str = "12:00:00";

/// Reduce an ascending 3-hourly series to at most [`FORECAST_DAYS`] daily
/// entries, one per midday point, in chronological order.
///
/// Pure: no I/O, no mutation, deterministic for a given series. A series
/// with fewer qualifying points (short series, provider drift off the
/// midday slot) yields fewer entries — never padding, never an error.
pub fn reduce_daily(series: &[ForecastPoint]) -> Vec<DailyForecast> {
    series
        .iter()
        .filter(|point| point.timestamp_text.ends_with(MIDDAY))
        .take(FORECAST_DAYS)
        .map(|point| DailyForecast {
            day_label: day_label(point.timestamp_unix),
            temperature_c: point.temperature_c.round() as i64,
            description: point.description.clone(),
            icon_id: point.icon_id.clone(),
        })
        .collect()
}

/// Short English weekday name for a unix timestamp; the locale is fixed.
fn day_label(timestamp_unix: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp_unix, 0) {
        Some(dt) => dt.format("%a").to_string(),
        None => String::new(),
    }
}
