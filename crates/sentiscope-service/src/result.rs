//! Search result assembly

use chrono::{DateTime, Utc};
use sentiscope_core::{Analytics, Comment, SearchQuery, VideoMetadata};
use sentiscope_store::CommentListing;
use serde::Serialize;

/// Video details surfaced for exact-title searches
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub video_title: String,
    pub channel_title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub video_url: String,
}

impl From<&VideoMetadata> for VideoDetails {
    fn from(meta: &VideoMetadata) -> Self {
        Self {
            video_title: meta.title.clone(),
            channel_title: meta.channel_title.clone(),
            view_count: meta.view_count,
            like_count: meta.like_count,
            comment_count: meta.comment_count,
            video_url: meta.video_url.clone(),
        }
    }
}

/// What a search returns: query fields, analytics fields and comments
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub query: SearchQuery,

    #[serde(flatten)]
    pub analytics: Analytics,

    /// Actual comments only
    pub comments: Vec<Comment>,
    pub has_more_comments: bool,
    pub total_comments: usize,
    pub last_updated: DateTime<Utc>,

    /// True when served from the fingerprint cache
    pub cached: bool,

    #[serde(flatten)]
    pub video: Option<VideoDetails>,
}

impl SearchResult {
    pub fn assemble(
        query: SearchQuery,
        analytics: Analytics,
        listing: CommentListing,
        video: Option<&VideoMetadata>,
        cached: bool,
    ) -> Self {
        Self {
            last_updated: query.created_at,
            query,
            analytics,
            comments: listing.comments,
            has_more_comments: listing.has_more,
            total_comments: listing.total,
            cached,
            video: video.map(VideoDetails::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiscope_core::PlatformScope;

    fn metadata() -> VideoMetadata {
        VideoMetadata {
            video_id: "abc123".to_string(),
            title: "Budget Speech 2024".to_string(),
            channel_title: "News Channel".to_string(),
            view_count: 1200,
            like_count: 85,
            comment_count: 40,
            video_url: "https://www.youtube.com/watch?v=abc123".to_string(),
        }
    }

    #[test]
    fn test_flattened_json_shape() {
        let query = SearchQuery::new("Budget Speech 2024", 30, PlatformScope::YouTube);
        let meta = metadata();
        let listing = CommentListing {
            comments: Vec::new(),
            total: 0,
            has_more: false,
        };

        let result = SearchResult::assemble(query, Analytics::default(), listing, Some(&meta), false);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["keyword"], "Budget Speech 2024");
        assert_eq!(json["platform"], "youtube");
        assert_eq!(json["metrics"]["totalComments"], 0);
        assert_eq!(json["videoTitle"], "Budget Speech 2024");
        assert_eq!(json["viewCount"], 1200);
        assert_eq!(json["hasMoreComments"], false);
        assert!(json.get("lastUpdated").is_some());
    }

    #[test]
    fn test_video_fields_absent_without_metadata() {
        let query = SearchQuery::new("budget", 30, PlatformScope::All);
        let listing = CommentListing {
            comments: Vec::new(),
            total: 0,
            has_more: false,
        };

        let result = SearchResult::assemble(query, Analytics::default(), listing, None, true);
        assert!(result.video.is_none());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("videoTitle").is_none());
        assert_eq!(json["cached"], true);
    }
}
