use thiserror::Error;

use crate::{
    api::FetchError,
    model::{CurrentWeather, ForecastEntry},
};

/// Why a lookup or summary ended in error. `Display` is the user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Please enter a city name")]
    Validation,

    /// No response from the backend.
    #[error("{message}")]
    Network { message: String },

    /// Backend answered with a non-success status.
    #[error("{message}")]
    Service { message: String },

    /// Backend answered successfully with a body we could not read.
    #[error("{message}")]
    Parse { message: String },
}

impl SearchError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<&FetchError> for SearchError {
    fn from(err: &FetchError) -> Self {
        let message = err.user_message();
        match err {
            FetchError::Network { .. } => SearchError::Network { message },
            FetchError::Service { .. } => SearchError::Service { message },
            FetchError::Parse { .. } => SearchError::Parse { message },
        }
    }
}

impl From<FetchError> for SearchError {
    fn from(err: FetchError) -> Self {
        SearchError::from(&err)
    }
}

/// Primary lookup state. Exactly one is live per orchestrator.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success {
        current: CurrentWeather,
        forecast: Vec<ForecastEntry>,
    },
    Error(SearchError),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            SearchState::Error(e) => Some(e.message()),
            _ => None,
        }
    }
}

/// Summary stage state, tracked independently of [`SearchState`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryState {
    #[default]
    Idle,
    Loading,
    Success {
        text: String,
    },
    Error(SearchError),
}

impl SummaryState {
    /// `Success` or `Error`.
    pub fn is_settled(&self) -> bool {
        matches!(self, SummaryState::Success { .. } | SummaryState::Error(_))
    }
}
