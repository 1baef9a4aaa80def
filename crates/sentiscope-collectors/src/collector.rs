//! Platform collector trait and common types

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sentiscope_core::{Platform, RawComment, Result};
use std::collections::BTreeMap;

/// Trait for all platform collectors
#[async_trait]
pub trait PlatformCollector: Send + Sync {
    /// Fetch normalized comments for a keyword
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawComment>>;

    /// Platform served by this collector
    fn platform(&self) -> Platform;

    /// Whether results come from a live API or the sample generator
    fn source(&self) -> CollectorSource;
}

/// Origin of a collector's data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorSource {
    /// Real platform API, backed by a configured credential
    Live,
    /// Deterministic sample data, used when no credential is configured
    Sample,
}

/// Longest lookback window a collection request honors (ten years)
pub const MAX_TIMEPERIOD_DAYS: u32 = 3650;

/// Parameters of one collection request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub keyword: String,
    pub timeperiod_days: u32,
    /// Exact video title lookup (video platform only)
    pub video_title_search: bool,
}

impl FetchRequest {
    pub fn new(keyword: impl Into<String>, timeperiod_days: u32) -> Self {
        Self {
            keyword: keyword.into(),
            timeperiod_days,
            video_title_search: false,
        }
    }

    pub fn with_video_title_search(mut self, enabled: bool) -> Self {
        self.video_title_search = enabled;
        self
    }

    /// Lookback in days, capped at [`MAX_TIMEPERIOD_DAYS`]
    pub fn lookback_days(&self) -> u32 {
        self.timeperiod_days.min(MAX_TIMEPERIOD_DAYS)
    }

    /// Start of the lookback window relative to `now`
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(i64::from(self.lookback_days()))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Platform credentials (platform key -> opaque secret)
///
/// A missing or blank secret is a valid state and selects sample data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    secrets: BTreeMap<String, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, platform: &Platform, secret: impl Into<String>) -> Self {
        self.insert(platform, secret);
        self
    }

    pub fn insert(&mut self, platform: &Platform, secret: impl Into<String>) {
        self.secrets.insert(platform.key(), secret.into());
    }

    /// Non-blank secret for a platform
    pub fn get(&self, platform: &Platform) -> Option<&str> {
        self.secrets
            .get(&platform.key())
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// True when at least one platform has a usable secret
    pub fn any_configured(&self) -> bool {
        self.secrets.values().any(|s| !s.trim().is_empty())
    }

    pub fn configured_platforms(&self) -> Vec<Platform> {
        self.secrets
            .iter()
            .filter(|(_, s)| !s.trim().is_empty())
            .map(|(k, _)| Platform::from(k.as_str()))
            .collect()
    }
}

impl FromIterator<(Platform, String)> for Credentials {
    fn from_iter<I: IntoIterator<Item = (Platform, String)>>(iter: I) -> Self {
        let mut credentials = Self::new();
        for (platform, secret) in iter {
            credentials.insert(&platform, secret);
        }
        credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookback_is_capped() {
        let now = Utc::now();
        let request = FetchRequest::new("water", 7);
        assert_eq!(request.since(now), now - Duration::days(7));

        let huge = FetchRequest::new("water", u32::MAX);
        assert_eq!(huge.lookback_days(), MAX_TIMEPERIOD_DAYS);
        assert_eq!(
            huge.since(now),
            now - Duration::days(i64::from(MAX_TIMEPERIOD_DAYS))
        );
    }

    #[test]
    fn test_blank_secret_is_unconfigured() {
        let creds = Credentials::new()
            .with(&Platform::YouTube, "  ")
            .with(&Platform::Twitter, "token");

        assert!(creds.get(&Platform::YouTube).is_none());
        assert_eq!(creds.get(&Platform::Twitter), Some("token"));
        assert_eq!(creds.configured_platforms(), vec![Platform::Twitter]);
        assert!(creds.any_configured());
        assert!(!Credentials::new().any_configured());
    }
}
