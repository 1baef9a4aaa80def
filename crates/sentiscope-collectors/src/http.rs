//! Shared HTTP client for platform APIs

use crate::config::CollectorSettings;
use crate::retry::{retry_with_backoff, RetryPolicy};
use reqwest::Client;
use sentiscope_core::{Error, Result};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// JSON-over-HTTP client with per-request timeout and retry
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(settings: &CollectorSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(concat!("sentiscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::collector(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            retry: settings.retry_policy(),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Single GET attempt, no retry
    pub async fn get_json_once<T: DeserializeOwned>(&self, url: &Url, bearer: Option<&str>) -> Result<T> {
        debug!(host = url.host_str().unwrap_or(""), path = url.path(), "GET");

        let mut request = self.client.get(url.clone());
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout
            } else {
                Error::upstream(None, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                Some(status.as_u16()),
                truncate(&body, 300),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::collector(format!("Malformed payload from {}: {e}", url.path())))
    }

    /// GET with retry and exponential backoff
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url, bearer: Option<&str>) -> Result<T> {
        retry_with_backoff(&self.retry, url.path(), move || self.get_json_once(url, bearer)).await
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Build a URL with query parameters
pub fn api_url(base: &str, params: &[(&str, &str)]) -> Result<Url> {
    Url::parse_with_params(base, params)
        .map_err(|e| Error::collector(format!("Invalid API url {base}: {e}")))
}
