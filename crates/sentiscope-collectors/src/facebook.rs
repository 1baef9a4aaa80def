//! Facebook Graph API collector
//!
//! Searches public pages for the keyword, then reads comments on their
//! recent posts.

use crate::collector::{CollectorSource, FetchRequest, PlatformCollector};
use crate::config::CollectorSettings;
use crate::http::{api_url, HttpClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentiscope_classifiers::detect_language;
use sentiscope_core::{Platform, RawComment, RecordKind, Result};
use serde::Deserialize;
use tracing::{info, warn};

const GRAPH_BASE: &str = "https://graph.facebook.com/v19.0";

pub struct FacebookCollector {
    http: HttpClient,
    access_token: String,
    settings: CollectorSettings,
}

impl FacebookCollector {
    pub fn new(access_token: impl Into<String>, settings: &CollectorSettings) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(settings)?,
            access_token: access_token.into(),
            settings: settings.clone(),
        })
    }

    async fn search_pages(&self, keyword: &str) -> Result<Vec<String>> {
        let limit = self.settings.max_items.to_string();
        let url = api_url(
            &format!("{GRAPH_BASE}/pages/search"),
            &[
                ("q", keyword),
                ("fields", "id,name"),
                ("limit", limit.as_str()),
                ("access_token", self.access_token.as_str()),
            ],
        )?;
        let response: GraphList<PageRef> = self.http.get_json(&url, None).await?;
        Ok(response.data.into_iter().map(|p| p.id).collect())
    }

    async fn page_posts(&self, page_id: &str, since: DateTime<Utc>) -> Result<Vec<Post>> {
        let since = since.timestamp().to_string();
        let limit = self.settings.max_items.to_string();
        let fields = format!(
            "id,permalink_url,comments.limit({}){{id,message,from,created_time,like_count,comment_count}}",
            self.settings.max_comments_per_item
        );
        let url = api_url(
            &format!("{GRAPH_BASE}/{page_id}/posts"),
            &[
                ("fields", fields.as_str()),
                ("since", since.as_str()),
                ("limit", limit.as_str()),
                ("access_token", self.access_token.as_str()),
            ],
        )?;
        let response: GraphList<Post> = self.http.get_json(&url, None).await?;
        Ok(response.data)
    }
}

#[async_trait]
impl PlatformCollector for FacebookCollector {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawComment>> {
        let since = request.since(Utc::now());
        let pages = self.search_pages(&request.keyword).await?;

        let mut records = Vec::new();
        for page_id in &pages {
            // One unreadable page should not discard the others
            match self.page_posts(page_id, since).await {
                Ok(posts) => records.extend(posts.into_iter().flat_map(Post::into_raw)),
                Err(e) => warn!(page_id = %page_id, error = %e, "Skipping Facebook page"),
            }
        }

        info!(keyword = %request.keyword, pages = pages.len(), comments = records.len(), "Facebook collection finished");
        Ok(records)
    }

    fn platform(&self) -> Platform {
        Platform::Facebook
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
struct PageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: String,
    permalink_url: Option<String>,
    comments: Option<GraphList<PostComment>>,
}

#[derive(Debug, Deserialize)]
struct PostComment {
    id: String,
    #[serde(default)]
    message: String,
    from: Option<Author>,
    created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    comment_count: u64,
}

#[derive(Debug, Deserialize)]
struct Author {
    id: String,
    name: String,
}

impl Post {
    fn into_raw(self) -> Vec<RawComment> {
        let source_url = self
            .permalink_url
            .unwrap_or_else(|| format!("https://www.facebook.com/{}", self.id));
        self.comments
            .map(|c| c.data)
            .unwrap_or_default()
            .into_iter()
            .filter(|c| !c.message.trim().is_empty())
            .map(|c| {
                let (user_id, user_name) = match c.from {
                    Some(author) => (Some(author.id), author.name),
                    None => (None, "Facebook user".to_string()),
                };
                RawComment {
                    platform: Platform::Facebook,
                    external_id: c.id,
                    user_name,
                    user_id,
                    language: detect_language(&c.message),
                    text: c.message,
                    engagement_score: c.like_count + c.comment_count,
                    created_at: c.created_time.unwrap_or_else(Utc::now),
                    source_url: source_url.clone(),
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
    fn test_post_comments_payload() {
        let payload = r#"{
            "data": [{
                "id": "p1",
                "permalink_url": "https://www.facebook.com/p1",
                "comments": {"data": [
                    {"id": "c1", "message": "Great work", "from": {"id": "u1", "name": "Anita"},
                     "created_time": "2024-05-01T10:00:00+00:00", "like_count": 4, "comment_count": 1},
                    {"id": "c2", "message": "   "}
                ]}
            }]
        }"#;
        let posts: GraphList<Post> = serde_json::from_str(payload).unwrap();
        let raw: Vec<RawComment> = posts.data.into_iter().flat_map(Post::into_raw).collect();

        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].user_name, "Anita");
        assert_eq!(raw[0].engagement_score, 5);
        assert_eq!(raw[0].source_url, "https://www.facebook.com/p1");
    }
}
