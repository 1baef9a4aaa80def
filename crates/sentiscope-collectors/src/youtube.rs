//! YouTube Data API collector
//!
//! Keyword mode searches recent videos and pages through their comment
//! threads. Title mode looks up one video by exact (case-insensitive)
//! title and returns its metadata record, its comments, and a retrieval
//! note when the comment set is noticeably incomplete.

use crate::collector::{CollectorSource, FetchRequest, PlatformCollector};
use crate::config::CollectorSettings;
use crate::http::{api_url, HttpClient};
use crate::paginator::{CommentPage, CommentPageSource, Paginator};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sentiscope_classifiers::detect_language;
use sentiscope_core::{Platform, RawComment, RecordKind, Result, VideoMetadata};
use serde::Deserialize;
use tracing::{debug, info};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Candidate videos considered for an exact title match
const TITLE_SEARCH_CANDIDATES: usize = 10;

/// Comment threads per page (API maximum)
const PAGE_SIZE: &str = "100";

pub struct YouTubeCollector {
    http: HttpClient,
    api_key: String,
    settings: CollectorSettings,
}

impl YouTubeCollector {
    pub fn new(api_key: impl Into<String>, settings: &CollectorSettings) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(settings)?,
            api_key: api_key.into(),
            settings: settings.clone(),
        })
    }

    async fn search_videos(&self, keyword: &str, max_results: usize, published_after: Option<DateTime<Utc>>) -> Result<Vec<String>> {
        let max_results = max_results.to_string();
        let published = published_after.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true));
        let mut params = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("order", "relevance"),
            ("q", keyword),
            ("maxResults", max_results.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(published) = published.as_deref() {
            params.push(("publishedAfter", published));
        }

        let url = api_url(&format!("{API_BASE}/search"), &params)?;
        let response: SearchResponse = self.http.get_json(&url, None).await?;
        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.join(",");
        let url = api_url(
            &format!("{API_BASE}/videos"),
            &[
                ("part", "snippet,statistics"),
                ("id", joined.as_str()),
                ("key", self.api_key.as_str()),
            ],
        )?;
        let response: VideoListResponse = self.http.get_json(&url, None).await?;
        Ok(response.items)
    }

    async fn video_comments(&self, video: &VideoItem) -> (Vec<RawComment>, Option<RawComment>) {
        let reported = video.statistics.comment_count();
        let outcome = Paginator::new(self)
            .with_retry(self.http.retry_policy())
            .with_ceiling(self.settings.max_comments_per_item)
            .collect(&video.id, reported)
            .await;

        let note = outcome
            .note
            .map(|note| RawComment::retrieval_note(Platform::YouTube, watch_url(&video.id), note));
        (outcome.comments, note)
    }

    async fn fetch_by_keyword(&self, request: &FetchRequest) -> Result<Vec<RawComment>> {
        let since = request.since(Utc::now());
        let ids = self
            .search_videos(&request.keyword, self.settings.max_items, Some(since))
            .await?;
        let videos = self.video_details(&ids).await?;

        let mut records = Vec::new();
        for video in &videos {
            let (comments, note) = self.video_comments(video).await;
            records.extend(comments);
            records.extend(note);
        }

        info!(
            keyword = %request.keyword,
            videos = videos.len(),
            records = records.len(),
            "YouTube keyword collection finished"
        );
        Ok(records)
    }

    async fn fetch_by_title(&self, request: &FetchRequest) -> Result<Vec<RawComment>> {
        let ids = self
            .search_videos(&request.keyword, TITLE_SEARCH_CANDIDATES, None)
            .await?;
        let videos = self.video_details(&ids).await?;

        let Some(video) = find_exact_title(&videos, &request.keyword) else {
            info!(title = %request.keyword, candidates = videos.len(), "No video matches title exactly");
            return Ok(Vec::new());
        };

        let mut records = vec![RawComment::video_metadata(video.metadata())];
        let (comments, note) = self.video_comments(video).await;
        records.extend(comments);
        records.extend(note);

        info!(
            video_id = %video.id,
            records = records.len(),
            "YouTube title collection finished"
        );
        Ok(records)
    }
}

#[async_trait]
impl PlatformCollector for YouTubeCollector {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawComment>> {
        if request.video_title_search {
            self.fetch_by_title(request).await
        } else {
            self.fetch_by_keyword(request).await
        }
    }

    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    fn source(&self) -> CollectorSource {
        CollectorSource::Live
    }
}

#[async_trait]
impl CommentPageSource for YouTubeCollector {
    async fn fetch_page(&self, item_id: &str, page_token: Option<&str>) -> Result<CommentPage> {
        let mut params = vec![
            ("part", "snippet"),
            ("videoId", item_id),
            ("maxResults", PAGE_SIZE),
            ("order", "relevance"),
            ("textFormat", "plainText"),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let url = api_url(&format!("{API_BASE}/commentThreads"), &params)?;
        // Paginator owns the retry loop
        let response: CommentThreadsResponse = self.http.get_json_once(&url, None).await?;
        debug!(video_id = item_id, threads = response.items.len(), "Fetched comment page");

        Ok(CommentPage {
            comments: response
                .items
                .into_iter()
                .map(|thread| thread.into_raw(item_id))
                .collect(),
            next_page_token: response.next_page_token,
        })
    }
}

/// Exact title match ignoring case and surrounding whitespace
fn find_exact_title<'a>(videos: &'a [VideoItem], title: &str) -> Option<&'a VideoItem> {
    let wanted = title.trim().to_lowercase();
    videos
        .iter()
        .find(|video| video.snippet.title.trim().to_lowercase() == wanted)
}

fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

fn parse_count(value: &Option<String>) -> u64 {
    value.as_deref().and_then(|v| v.parse().ok()).unwrap_or(0)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

impl VideoItem {
    fn metadata(&self) -> VideoMetadata {
        VideoMetadata {
            video_id: self.id.clone(),
            title: self.snippet.title.clone(),
            channel_title: self.snippet.channel_title.clone(),
            view_count: parse_count(&self.statistics.view_count),
            like_count: parse_count(&self.statistics.like_count),
            comment_count: parse_count(&self.statistics.comment_count),
            video_url: watch_url(&self.id),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    channel_title: String,
}

/// Counts arrive as decimal strings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

impl VideoStatistics {
    fn comment_count(&self) -> Option<u64> {
        self.comment_count.as_deref().and_then(|v| v.parse().ok())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadsResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThread {
    id: String,
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
    #[serde(default)]
    total_reply_count: u64,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    author_display_name: String,
    author_channel_id: Option<AuthorChannel>,
    #[serde(default)]
    text_display: String,
    text_original: Option<String>,
    #[serde(default)]
    like_count: u64,
    published_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct AuthorChannel {
    value: String,
}

impl CommentThread {
    fn into_raw(self, video_id: &str) -> RawComment {
        let snippet = self.snippet.top_level_comment.snippet;
        let text = snippet.text_original.unwrap_or(snippet.text_display);
        RawComment {
            platform: Platform::YouTube,
            external_id: self.id,
            user_name: snippet.author_display_name,
            user_id: snippet.author_channel_id.map(|c| c.value),
            language: detect_language(&text),
            text,
            engagement_score: snippet.like_count + self.snippet.total_reply_count,
            created_at: snippet.published_at,
            source_url: watch_url(video_id),
            record: RecordKind::Comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiscope_core::Language;

    fn video(id: &str, title: &str) -> VideoItem {
        VideoItem {
            id: id.to_string(),
            snippet: VideoSnippet {
                title: title.to_string(),
                channel_title: "Channel".to_string(),
            },
            statistics: VideoStatistics {
                view_count: Some("1200".to_string()),
                like_count: None,
                comment_count: Some("45".to_string()),
            },
        }
    }

    #[test]
    fn test_exact_title_match_ignores_case() {
        let videos = vec![
            video("a", "Budget Speech Highlights"),
            video("b", "Budget Speech"),
        ];
        assert_eq!(find_exact_title(&videos, "budget speech").unwrap().id, "b");
        assert!(find_exact_title(&videos, "budget").is_none());
    }

    #[test]
    fn test_metadata_parses_string_counts() {
        let meta = video("a", "Title").metadata();
        assert_eq!(meta.view_count, 1200);
        assert_eq!(meta.like_count, 0);
        assert_eq!(meta.comment_count, 45);
        assert_eq!(meta.video_url, "https://www.youtube.com/watch?v=a");
    }

    #[test]
    fn test_comment_thread_payload() {
        let payload = r#"{
            "items": [{
                "id": "Ugx1",
                "snippet": {
                    "totalReplyCount": 2,
                    "topLevelComment": {
                        "snippet": {
                            "authorDisplayName": "Ravi",
                            "authorChannelId": {"value": "UC1"},
                            "textDisplay": "రోడ్లు బాగున్నాయి",
                            "likeCount": 5,
                            "publishedAt": "2024-05-01T10:00:00Z"
                        }
                    }
                }
            }],
            "nextPageToken": "tok2"
        }"#;
        let response: CommentThreadsResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.next_page_token.as_deref(), Some("tok2"));

        let raw = response.items.into_iter().next().unwrap().into_raw("vid");
        assert_eq!(raw.external_id, "Ugx1");
        assert_eq!(raw.engagement_score, 7);
        assert_eq!(raw.language, Language::Telugu);
        assert_eq!(raw.user_id.as_deref(), Some("UC1"));
    }
}
