//! Core types for Sentiscope

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Social platform a comment originates from
///
/// Serialized as its display name (`"YouTube"`, `"Twitter"`, ...). Names
/// that do not match a known platform are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    YouTube,
    Twitter,
    Facebook,
    Instagram,
    Other(String),
}

impl Platform {
    /// All platforms with a collector implementation
    pub const KNOWN: [Platform; 4] = [
        Platform::YouTube,
        Platform::Twitter,
        Platform::Facebook,
        Platform::Instagram,
    ];

    /// Display name used in comment records and distributions
    pub fn as_str(&self) -> &str {
        match self {
            Self::YouTube => "YouTube",
            Self::Twitter => "Twitter",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::Other(name) => name,
        }
    }

    /// Lowercase key used for credentials and configuration
    pub fn key(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "youtube" => Self::YouTube,
            "twitter" | "x" => Self::Twitter,
            "facebook" => Self::Facebook,
            "instagram" => Self::Instagram,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Platform {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform selection for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformScope {
    #[default]
    All,
    YouTube,
    Twitter,
    Facebook,
    Instagram,
}

impl PlatformScope {
    /// Platforms covered by this scope, in registry order
    pub fn platforms(&self) -> Vec<Platform> {
        match self {
            Self::All => Platform::KNOWN.to_vec(),
            Self::YouTube => vec![Platform::YouTube],
            Self::Twitter => vec![Platform::Twitter],
            Self::Facebook => vec![Platform::Facebook],
            Self::Instagram => vec![Platform::Instagram],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::YouTube => "youtube",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
        }
    }
}

impl FromStr for PlatformScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "youtube" => Ok(Self::YouTube),
            "twitter" | "x" => Ok(Self::Twitter),
            "facebook" => Ok(Self::Facebook),
            "instagram" => Ok(Self::Instagram),
            other => Err(Error::invalid_input(format!("unknown platform '{other}'"))),
        }
    }
}

impl fmt::Display for PlatformScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment label assigned to a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(Error::invalid_input(format!("unknown sentiment '{other}'"))),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected comment language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Telugu,
}

/// A search issued against the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub id: String,
    pub keyword: String,
    /// Lookback window in days
    pub timeperiod: u32,
    pub platform: PlatformScope,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl SearchQuery {
    /// Create a new query with a fresh id
    pub fn new(keyword: impl Into<String>, timeperiod: u32, platform: PlatformScope) -> Self {
        Self {
            id: format!("q_{}", uuid::Uuid::new_v4()),
            keyword: keyword.into(),
            timeperiod,
            platform,
            created_at: Utc::now(),
            user_id: None,
        }
    }

    /// Set the requesting user
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Cache identity of this query
    pub fn fingerprint(&self) -> QueryFingerprint {
        QueryFingerprint::new(&self.keyword, self.timeperiod, self.platform)
    }
}

/// Cache key for analytics: (keyword, timeperiod, platform)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryFingerprint {
    pub keyword: String,
    pub timeperiod: u32,
    pub platform: PlatformScope,
}

impl QueryFingerprint {
    /// Keywords compare trimmed and case-folded
    pub fn new(keyword: &str, timeperiod: u32, platform: PlatformScope) -> Self {
        Self {
            keyword: keyword.trim().to_lowercase(),
            timeperiod,
            platform,
        }
    }
}

impl fmt::Display for QueryFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.keyword, self.timeperiod, self.platform)
    }
}
