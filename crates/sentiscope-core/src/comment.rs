//! Comment records and the pseudo-records that travel with them

use crate::types::{Language, Platform, Sentiment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a stored record represents
///
/// Only `Comment` records are user-facing. Metadata and retrieval notes
/// share the collection so they are persisted alongside the comments of
/// one query, but every aggregation and listing skips them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Comment,
    /// Describes the parent video of a title search
    VideoMetadata(VideoMetadata),
    /// Retrieval completeness for one item
    RetrievalNote(RetrievalNote),
}

/// Parent content item captured during a video title search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub video_url: String,
}

/// How much of a platform-reported comment total was actually retrieved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalNote {
    pub item_id: String,
    pub reported_count: u64,
    pub retrieved_count: u64,
    /// Rounded to one decimal
    pub retrieval_percentage: f64,
}

impl RetrievalNote {
    pub fn new(item_id: impl Into<String>, reported_count: u64, retrieved_count: u64) -> Self {
        let retrieval_percentage = if reported_count == 0 {
            100.0
        } else {
            (retrieved_count as f64 / reported_count as f64 * 1000.0).round() / 10.0
        };
        Self {
            item_id: item_id.into(),
            reported_count,
            retrieved_count,
            retrieval_percentage,
        }
    }
}

/// A comment as produced by a platform collector, before classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    pub platform: Platform,
    /// Platform-native identifier, used for deduplication
    pub external_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub text: String,
    pub language: Language,
    pub engagement_score: u64,
    pub created_at: DateTime<Utc>,
    pub source_url: String,
    #[serde(default)]
    pub record: RecordKind,
}

impl RawComment {
    /// Metadata pseudo-record; the text carries the serialized metadata
    pub fn video_metadata(metadata: VideoMetadata) -> Self {
        Self {
            platform: Platform::YouTube,
            external_id: format!("{}_metadata", metadata.video_id),
            user_name: metadata.channel_title.clone(),
            user_id: None,
            text: serde_json::to_string(&metadata).unwrap_or_default(),
            language: Language::English,
            engagement_score: 0,
            created_at: Utc::now(),
            source_url: metadata.video_url.clone(),
            record: RecordKind::VideoMetadata(metadata),
        }
    }

    /// Retrieval-completeness pseudo-record
    pub fn retrieval_note(platform: Platform, source_url: impl Into<String>, note: RetrievalNote) -> Self {
        let text = format!(
            "Retrieved {} of {} reported comments ({}%)",
            note.retrieved_count, note.reported_count, note.retrieval_percentage
        );
        Self {
            platform,
            external_id: format!("{}_metric", note.item_id),
            user_name: "system".to_string(),
            user_id: None,
            text,
            language: Language::English,
            engagement_score: 0,
            created_at: Utc::now(),
            source_url: source_url.into(),
            record: RecordKind::RetrievalNote(note),
        }
    }

    pub fn is_actual(&self) -> bool {
        matches!(self.record, RecordKind::Comment)
    }
}

/// A comment owned by exactly one search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub search_query_id: String,
    pub platform: Platform,
    pub external_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    pub language: Language,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub sentiment_score: f32,
    pub topics: Vec<String>,
    pub engagement_score: u64,
    pub created_at: DateTime<Utc>,
    pub collected_at: DateTime<Utc>,
    pub source_url: String,
    #[serde(default)]
    pub record: RecordKind,
}

impl Comment {
    /// Attach a raw record to a query; sentiment and topics are placeholders
    pub fn from_raw(search_query_id: impl Into<String>, raw: RawComment) -> Self {
        Self {
            id: format!("c_{}", uuid::Uuid::new_v4()),
            search_query_id: search_query_id.into(),
            platform: raw.platform,
            external_id: raw.external_id,
            user_name: raw.user_name,
            user_id: raw.user_id,
            text: raw.text,
            translation: None,
            language: raw.language,
            sentiment: Sentiment::Neutral,
            sentiment_score: 0.0,
            topics: Vec::new(),
            engagement_score: raw.engagement_score,
            created_at: raw.created_at,
            collected_at: Utc::now(),
            source_url: raw.source_url,
            record: raw.record,
        }
    }

    /// True for user comments, false for metadata and retrieval notes
    pub fn is_actual(&self) -> bool {
        matches!(self.record, RecordKind::Comment)
    }

    pub fn video_metadata(&self) -> Option<&VideoMetadata> {
        match &self.record {
            RecordKind::VideoMetadata(meta) => Some(meta),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_note_percentage() {
        let note = RetrievalNote::new("vid1", 300, 200);
        assert_eq!(note.retrieval_percentage, 66.7);

        let empty = RetrievalNote::new("vid2", 0, 0);
        assert_eq!(empty.retrieval_percentage, 100.0);
    }

    #[test]
    fn test_pseudo_records_are_not_actual() {
        let meta = RawComment::video_metadata(VideoMetadata {
            video_id: "abc".to_string(),
            title: "Budget speech".to_string(),
            channel_title: "News".to_string(),
            view_count: 10,
            like_count: 2,
            comment_count: 1,
            video_url: "https://www.youtube.com/watch?v=abc".to_string(),
        });
        assert!(!meta.is_actual());
        assert!(meta.text.contains("Budget speech"));

        let comment = Comment::from_raw("q1", meta);
        assert!(!comment.is_actual());
        assert_eq!(comment.video_metadata().unwrap().video_id, "abc");
    }

    #[test]
    fn test_record_kind_serializes_tagged() {
        let json = serde_json::to_value(RecordKind::Comment).unwrap();
        assert_eq!(json["kind"], "comment");
    }
}
