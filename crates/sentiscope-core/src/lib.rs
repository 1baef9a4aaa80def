//! Sentiscope Core
//!
//! Core types and utilities shared across Sentiscope components.
//!
//! This crate provides:
//! - The data model for search queries, comments, and their pseudo-records
//! - Derived analytics shapes served to the dashboard
//! - Error types and result handling
//! - Sentiment share reconciliation (percentages that sum to 100)

pub mod analytics;
pub mod comment;
pub mod error;
pub mod share;
pub mod types;

pub use analytics::{
    Analytics, DistributionEntry, EngagementLevel, Influencer, KeywordCount, MetricChanges,
    Metrics, TrendPoint,
};
pub use comment::{Comment, RawComment, RecordKind, RetrievalNote, VideoMetadata};
pub use error::{Error, Result};
pub use share::SentimentShare;
pub use types::{Language, Platform, PlatformScope, QueryFingerprint, SearchQuery, Sentiment};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analytics::{Analytics, Metrics};
    pub use crate::comment::{Comment, RawComment, RecordKind};
    pub use crate::error::{Error, Result};
    pub use crate::types::{Language, Platform, PlatformScope, SearchQuery, Sentiment};
}
