//! Sentiscope Collectors
//!
//! Platform comment collection for YouTube, Twitter/X, Facebook and
//! Instagram.
//!
//! - One collector per platform behind the [`PlatformCollector`] trait
//! - Continuation-token pagination with deduplication and retrieval notes
//! - Exponential backoff on transient upstream failures
//! - Deterministic sample data for platforms without credentials
//! - Bounded concurrent fan-out with per-platform failure isolation

pub mod collector;
pub mod config;
pub mod facebook;
pub mod http;
pub mod instagram;
pub mod paginator;
pub mod registry;
pub mod retry;
pub mod sample;
pub mod twitter;
pub mod youtube;

pub use collector::{CollectorSource, Credentials, FetchRequest, PlatformCollector, MAX_TIMEPERIOD_DAYS};
pub use config::CollectorSettings;
pub use paginator::{CommentPage, CommentPageSource, PaginationOutcome, Paginator};
pub use registry::{CollectionReport, CollectionStatus, CollectorRegistry, PlatformOutcome};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use sample::SampleCollector;
