//! Instagram Graph API hashtag collector
//!
//! Hashtag search needs a business account id alongside the token.

use crate::collector::{CollectorSource, FetchRequest, PlatformCollector};
use crate::config::CollectorSettings;
use crate::http::{api_url, HttpClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentiscope_classifiers::detect_language;
use sentiscope_core::{Error, Platform, RawComment, RecordKind, Result};
use serde::Deserialize;
use tracing::info;

const GRAPH_BASE: &str = "https://graph.facebook.com/v19.0";

pub struct InstagramCollector {
    http: HttpClient,
    access_token: String,
    account_id: Option<String>,
    settings: CollectorSettings,
}

impl InstagramCollector {
    pub fn new(access_token: impl Into<String>, settings: &CollectorSettings) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(settings)?,
            access_token: access_token.into(),
            account_id: settings.instagram_account_id.clone(),
            settings: settings.clone(),
        })
    }

    async fn hashtag_id(&self, account_id: &str, tag: &str) -> Result<Option<String>> {
        let url = api_url(
            &format!("{GRAPH_BASE}/ig_hashtag_search"),
            &[
                ("user_id", account_id),
                ("q", tag),
                ("access_token", self.access_token.as_str()),
            ],
        )?;
        let response: GraphList<IdOnly> = self.http.get_json(&url, None).await?;
        Ok(response.data.into_iter().next().map(|h| h.id))
    }

    async fn recent_media(&self, account_id: &str, hashtag_id: &str) -> Result<Vec<Media>> {
        let limit = self.settings.max_items.to_string();
        let fields = format!(
            "id,permalink,comments.limit({}){{id,text,username,timestamp,like_count}}",
            self.settings.max_comments_per_item
        );
        let url = api_url(
            &format!("{GRAPH_BASE}/{hashtag_id}/recent_media"),
            &[
                ("user_id", account_id),
                ("fields", fields.as_str()),
                ("limit", limit.as_str()),
                ("access_token", self.access_token.as_str()),
            ],
        )?;
        let response: GraphList<Media> = self.http.get_json(&url, None).await?;
        Ok(response.data)
    }
}

/// Hashtags cannot contain whitespace or punctuation
fn hashtag_for(keyword: &str) -> String {
    keyword
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_lowercase()
}

#[async_trait]
impl PlatformCollector for InstagramCollector {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawComment>> {
        let account_id = self
            .account_id
            .as_deref()
            .ok_or_else(|| Error::collector("Instagram hashtag search requires an account id"))?;

        let tag = hashtag_for(&request.keyword);
        if tag.is_empty() {
            return Ok(Vec::new());
        }

        let Some(hashtag_id) = self.hashtag_id(account_id, &tag).await? else {
            info!(hashtag = %tag, "Hashtag not found on Instagram");
            return Ok(Vec::new());
        };

        let since = request.since(Utc::now());
        let records: Vec<RawComment> = self
            .recent_media(account_id, &hashtag_id)
            .await?
            .into_iter()
            .flat_map(Media::into_raw)
            .filter(|c| c.created_at >= since)
            .collect();

        info!(hashtag = %tag, comments = records.len(), "Instagram collection finished");
        Ok(records)
    }

    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn source(&self) -> CollectorSource {
        CollectorSource::Live
    }
}

#[derive(Debug, Deserialize)]
struct GraphList<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Media {
    id: String,
    permalink: Option<String>,
    comments: Option<GraphList<MediaComment>>,
}

#[derive(Debug, Deserialize)]
struct MediaComment {
    id: String,
    #[serde(default)]
    text: String,
    username: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    like_count: u64,
}

impl Media {
    fn into_raw(self) -> Vec<RawComment> {
        let source_url = self
            .permalink
            .unwrap_or_else(|| format!("https://www.instagram.com/p/{}", self.id));
        self.comments
            .map(|c| c.data)
            .unwrap_or_default()
            .into_iter()
            .map(|c| RawComment {
                platform: Platform::Instagram,
                external_id: c.id,
                user_name: c.username.unwrap_or_else(|| "instagram_user".to_string()),
                user_id: None,
                language: detect_language(&c.text),
                text: c.text,
                engagement_score: c.like_count,
                created_at: c.timestamp.unwrap_or_else(Utc::now),
                source_url: source_url.clone(),
                record: RecordKind::Comment,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashtag_strips_spaces_and_punctuation() {
        assert_eq!(hashtag_for("Clean Water!"), "cleanwater");
        assert_eq!(hashtag_for("!!"), "");
    }

    #[tokio::test]
    async fn test_missing_account_id_is_an_error() {
        let collector = InstagramCollector::new("token", &CollectorSettings::default()).unwrap();
        let err = collector
            .fetch(&FetchRequest::new("water", 7))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("account id"));
    }
}
