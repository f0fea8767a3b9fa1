//! Client for the SkyCast backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use thiserror::Error;
use tracing::instrument;

use crate::model::{CurrentWeather, ForecastEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Forecast,
    Summary,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "/api/weather/current",
            Endpoint::Forecast => "/api/weather/forecast",
            Endpoint::Summary => "/api/weather/summary",
        }
    }

    /// Message shown when the backend gives no usable error of its own.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Endpoint::Current => "Failed to fetch current weather",
            Endpoint::Forecast => "Failed to fetch weather forecast",
            Endpoint::Summary => "Failed to generate AI summary",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// No response at all.
    #[error("Request to {endpoint} failed: {source}")]
    Network {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status. `message` is the backend's `error` field when present.
    #[error("{endpoint} returned {status}: {}", .message.as_deref().unwrap_or("<no error message>"))]
    Service {
        endpoint: Endpoint,
        status: u16,
        message: Option<String>,
    },

    /// Success status with a body that does not match the contract.
    #[error("Malformed response from {endpoint}: {source}")]
    Parse {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchError::Network { endpoint, .. }
            | FetchError::Service { endpoint, .. }
            | FetchError::Parse { endpoint, .. } => *endpoint,
        }
    }

    /// Text for the user: the backend's own message if it sent one,
    /// otherwise the endpoint's fallback.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Service { message: Some(message), .. } => message.clone(),
            _ => self.endpoint().fallback_message().to_string(),
        }
    }
}

#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<CurrentWeather, FetchError>;

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, FetchError>;

    async fn summary(&self, city: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ForecastBody {
    forecasts: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// [`WeatherApi`] over HTTP against a backend origin such as
/// `http://localhost:5000`.
#[derive(Debug, Clone)]
pub struct HttpWeatherApi {
    base_url: String,
    http: Client,
}

impl HttpWeatherApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T>(&self, endpoint: Endpoint, city: &str) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint.path());

        let res = self
            .http
            .get(&url)
            .query(&[("city", city)])
            .send()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        if !status.is_success() {
            // A body that is not `{error: ...}` simply yields no message.
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);

            return Err(FetchError::Service {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Parse { endpoint, source })
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherApi {
    #[instrument(skip(self), level = "debug")]
    async fn current(&self, city: &str) -> Result<CurrentWeather, FetchError> {
        self.get(Endpoint::Current, city).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, FetchError> {
        let body: ForecastBody = self.get(Endpoint::Forecast, city).await?;
        Ok(body.forecasts)
    }

    #[instrument(skip(self), level = "debug")]
    async fn summary(&self, city: &str) -> Result<String, FetchError> {
        let body: SummaryBody = self.get(Endpoint::Summary, city).await?;
        Ok(body.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_prefers_backend_message() {
        let err = FetchError::Service {
            endpoint: Endpoint::Current,
            status: 404,
            message: Some("City not found".into()),
        };
        assert_eq!(err.user_message(), "City not found");
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn service_error_without_message_uses_fallback() {
        let err = FetchError::Service {
            endpoint: Endpoint::Forecast,
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), "Failed to fetch weather forecast");
    }

    #[test]
    fn parse_error_uses_fallback() {
        let source = serde_json::from_str::<SummaryBody>("nope").unwrap_err();
        let err = FetchError::Parse { endpoint: Endpoint::Summary, source };
        assert_eq!(err.user_message(), "Failed to generate AI summary");
    }

    #[test]
    fn base_url_is_normalized() {
        let api = HttpWeatherApi::new("http://localhost:5000/");
        assert_eq!(api.base_url(), "http://localhost:5000");
    }
}
