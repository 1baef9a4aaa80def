//! Sentiscope Service
//!
//! Ties the workspace together: validates a search request, runs the
//! collection and analytics pipeline, and serves repeat searches from the
//! query-fingerprint cache held by the store.

pub mod config;
pub mod pipeline;
pub mod request;
pub mod result;

pub use config::ServiceConfig;
pub use pipeline::SearchPipeline;
pub use request::{SearchRequest, ValidSearch, DEFAULT_PAGE_SIZE};
pub use result::{SearchResult, VideoDetails};
