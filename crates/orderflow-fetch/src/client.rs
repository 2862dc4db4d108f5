//! HTTP client for the dataset API.

use orderflow_types::{ApiConfig, RawDataset};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Path of the dataset endpoint under the API base URL.
const DATASETS_PATH: &str = "datasets.php";

/// Errors that can occur while fetching a dataset.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No response arrived within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// A connection-level failure other than a timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP error: status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not a valid dataset payload.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Every attempt failed with a retryable error.
    #[error("failed after {attempts} attempts")]
    RetryExhausted {
        /// The number of attempts made.
        attempts: u32,
    },
}

impl FetchError {
    /// Maps a reqwest failure onto the fetch taxonomy.
    fn from_request(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// HTTP client for the dataset API.
///
/// Issues one request per [`fetch`](Self::fetch) call and parses the JSON
/// payload; retry orchestration lives in
/// [`RetryPolicy`](crate::RetryPolicy).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Creates a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("orderflow/{}", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()?;
        Ok(Self { http, config })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetches one dataset page from the API.
    ///
    /// Sends `GET {base_url}/datasets.php?type=<dataset>&rows=<rows>&token=…`
    /// and returns the parsed payload unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] for a non-success status,
    /// [`FetchError::Timeout`] when no response arrives in time,
    /// [`FetchError::Transport`] for other connection failures, and
    /// [`FetchError::Decode`] when the body is not a valid payload.
    pub async fn fetch(&self, dataset: &str, rows: u32) -> Result<RawDataset, FetchError> {
        let url = format!(
            "{}/{DATASETS_PATH}",
            self.config.base_url.trim_end_matches('/')
        );

        info!("fetching {rows} rows of {dataset} data");

        let rows_param = rows.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("type", dataset),
                ("rows", rows_param.as_str()),
                ("token", self.config.token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::from_request(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_request(&e))?;
        let data: RawDataset = serde_json::from_slice(&body)?;

        info!("received {} orders", data.order_count());

        Ok(data)
    }
}
