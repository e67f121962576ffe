//! Error taxonomy for a single lookup.
//!
//! Local validation failures (`EmptyInput`, `TooShort`) never reach the
//! network; remote failures collapse into three recoverable kinds. Every
//! variant maps to a fixed user-facing message — nothing here is fatal.

use thiserror::Error;

/// Failure of the combined two-endpoint fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider does not know the city (HTTP 404).
    #[error("city not found")]
    NotFound,

    /// The credential was rejected (HTTP 401/403).
    #[error("unauthorized")]
    Unauthorized,

    /// Anything else: transport failure, timeout, malformed response,
    /// unexpected status.
    #[error("weather service unreachable: {0}")]
    Unreachable(anyhow::Error),
}

/// Everything that can go wrong between raw input and a rendered result.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("empty input")]
    EmptyInput,

    #[error("input too short")]
    TooShort,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl SearchError {
    /// Fixed message suitable for direct display, selected by failure kind.
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::EmptyInput => "Please enter a city name.",
            SearchError::TooShort => "City name is too short.",
            SearchError::Fetch(FetchError::NotFound) => {
                "City not found. Please check the spelling."
            }
            SearchError::Fetch(FetchError::Unauthorized) => {
                "Invalid API key. Please check your credentials."
            }
            SearchError::Fetch(FetchError::Unreachable(_)) => {
                "Something went wrong. Please try again."
            }
        }
    }

    /// True when the failure was detected before any network activity.
    pub fn is_local(&self) -> bool {
        matches!(self, SearchError::EmptyInput | SearchError::TooShort)
    }
}
