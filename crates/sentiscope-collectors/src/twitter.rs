//! Twitter/X recent search collector (API v2, bearer token)

use crate::collector::{CollectorSource, FetchRequest, PlatformCollector};
use crate::config::CollectorSettings;
use crate::http::{api_url, HttpClient};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sentiscope_classifiers::detect_language;
use sentiscope_core::{Platform, RawComment, RecordKind, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

const SEARCH_URL: &str = "https://api.twitter.com/2/tweets/search/recent";

/// Recent search only reaches back seven days
const MAX_LOOKBACK_DAYS: i64 = 7;

/// Per-request result bounds accepted by the API
const MIN_RESULTS: usize = 10;
const MAX_RESULTS: usize = 100;

pub struct TwitterCollector {
    http: HttpClient,
    bearer_token: String,
    max_results: usize,
}

impl TwitterCollector {
    pub fn new(bearer_token: impl Into<String>, settings: &CollectorSettings) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(settings)?,
            bearer_token: bearer_token.into(),
            max_results: settings.max_comments_per_item.clamp(MIN_RESULTS, MAX_RESULTS),
        })
    }
}

#[async_trait]
impl PlatformCollector for TwitterCollector {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawComment>> {
        let lookback = i64::from(request.timeperiod_days).min(MAX_LOOKBACK_DAYS);
        // The API rejects start times too close to its own lookback edge
        let start = Utc::now() - Duration::days(lookback) + Duration::minutes(1);
        let start_time = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let query = format!("{} -is:retweet", request.keyword);
        let max_results = self.max_results.to_string();

        let url = api_url(
            SEARCH_URL,
            &[
                ("query", query.as_str()),
                ("max_results", max_results.as_str()),
                ("start_time", start_time.as_str()),
                ("tweet.fields", "created_at,public_metrics,author_id,lang"),
                ("expansions", "author_id"),
                ("user.fields", "username,name"),
            ],
        )?;

        let response: SearchResponse = self.http.get_json(&url, Some(&self.bearer_token)).await?;
        let records = response.into_raw();

        info!(keyword = %request.keyword, tweets = records.len(), "Twitter collection finished");
        Ok(records)
    }

    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    fn source(&self) -> CollectorSource {
        CollectorSource::Live
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    username: String,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: String,
    text: String,
    author_id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    public_metrics: PublicMetrics,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    reply_count: u64,
    #[serde(default)]
    quote_count: u64,
}

impl PublicMetrics {
    fn engagement(&self) -> u64 {
        self.like_count + self.retweet_count + self.reply_count + self.quote_count
    }
}

impl SearchResponse {
    fn into_raw(self) -> Vec<RawComment> {
        let usernames: HashMap<String, String> = self
            .includes
            .users
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        self.data
            .into_iter()
            .map(|tweet| {
                let user_name = tweet
                    .author_id
                    .as_ref()
                    .and_then(|id| usernames.get(id))
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string());
                RawComment {
                    platform: Platform::Twitter,
                    source_url: format!("https://twitter.com/{user_name}/status/{}", tweet.id),
                    external_id: tweet.id,
                    user_name,
                    user_id: tweet.author_id,
                    language: detect_language(&tweet.text),
                    engagement_score: tweet.public_metrics.engagement(),
                    text: tweet.text,
                    created_at: tweet.created_at.unwrap_or_else(Utc::now),
                    record: RecordKind::Comment,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_search_payload() {
        let payload = r#"{
            "data": [{
                "id": "1790",
                "text": "Water supply restored, thank you",
                "author_id": "42",
                "created_at": "2024-05-02T08:30:00.000Z",
                "public_metrics": {"like_count": 3, "retweet_count": 1, "reply_count": 2, "quote_count": 1}
            }],
            "includes": {"users": [{"id": "42", "username": "citizen", "name": "Citizen"}]}
        }"#;
        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        let raw = response.into_raw();

        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].user_name, "citizen");
        assert_eq!(raw[0].engagement_score, 7);
        assert_eq!(raw[0].source_url, "https://twitter.com/citizen/status/1790");
    }

    #[test]
    fn test_empty_result_has_no_data_field() {
        let response: SearchResponse = serde_json::from_str(r#"{"meta": {"result_count": 0}}"#).unwrap();
        assert!(response.into_raw().is_empty());
    }
}
