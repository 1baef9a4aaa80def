//! Collection settings

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by all platform collectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorSettings {
    /// Platforms fetched concurrently when searching all platforms
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Timeout for a single HTTP request (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for one platform's whole collection (seconds)
    #[serde(default = "default_platform_timeout")]
    pub platform_timeout_secs: u64,

    /// Retries after the first failed attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay (milliseconds), doubled per retry
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,

    /// Safety ceiling on comments retrieved per content item
    #[serde(default = "default_max_comments_per_item")]
    pub max_comments_per_item: usize,

    /// Content items (videos, posts) inspected per search
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Instagram business account used for hashtag search
    #[serde(default)]
    pub instagram_account_id: Option<String>,
}

impl CollectorSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn platform_timeout(&self) -> Duration {
        Duration::from_secs(self.platform_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout(),
            platform_timeout_secs: default_platform_timeout(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay(),
            max_comments_per_item: default_max_comments_per_item(),
            max_items: default_max_items(),
            instagram_account_id: None,
        }
    }
}

fn default_max_concurrency() -> usize {
    4
}

fn default_request_timeout() -> u64 {
    15
}

fn default_platform_timeout() -> u64 {
    90
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay() -> u64 {
    500
}

fn default_max_comments_per_item() -> usize {
    200
}

fn default_max_items() -> usize {
    5
}
