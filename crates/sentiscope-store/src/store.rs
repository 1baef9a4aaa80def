//! Storage abstraction for search queries, comments and cached analytics
//!
//! The [`SearchStore`] trait is the only way the pipeline touches state,
//! so backends can be swapped without changing business logic.
//!
//! A completed search becomes visible through [`SearchStore::commit_search`],
//! which writes the query, its comments and its analytics and points the
//! fingerprint index at it in one step. Readers never observe a
//! half-written search.

use async_trait::async_trait;
use sentiscope_core::{Analytics, Comment, Error, Platform, QueryFingerprint, Result, SearchQuery};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which slice of a query's comments to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageRequest {
    #[default]
    All,
    /// 1-based page number
    Page { page: usize, page_size: usize },
}

impl PageRequest {
    pub fn page(page: usize, page_size: usize) -> Self {
        Self::Page { page, page_size }
    }
}

/// A slice of actual comments plus listing totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListing {
    pub comments: Vec<Comment>,
    /// Actual comments across all pages
    pub total: usize,
    pub has_more: bool,
}

/// Everything produced by one completed search
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub query: SearchQuery,
    /// May include metadata and retrieval-note records
    pub comments: Vec<Comment>,
    pub analytics: Analytics,
}

/// Flag name -> enabled
pub type AlertPreferences = BTreeMap<String, bool>;

/// Abstract storage backend
///
/// Lookups for unknown ids return `Ok(None)`. Mutating an unknown query
/// returns [`Error::NotFound`].
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Register a query without making it reachable by fingerprint
    async fn create_query(&self, query: &SearchQuery) -> Result<()>;

    async fn get_query(&self, id: &str) -> Result<Option<SearchQuery>>;

    /// Append comments to an existing query, returning its new record count
    async fn append_comments(&self, query_id: &str, comments: &[Comment]) -> Result<usize>;

    /// Actual comments only, in insertion order
    async fn list_comments(&self, query_id: &str, page: PageRequest) -> Result<Option<CommentListing>>;

    /// Every stored record, pseudo-records included
    async fn all_comments(&self, query_id: &str) -> Result<Option<Vec<Comment>>>;

    async fn put_analytics(&self, query_id: &str, analytics: &Analytics) -> Result<()>;

    async fn get_analytics(&self, query_id: &str) -> Result<Option<Analytics>>;

    /// Most recent committed query with this fingerprint
    async fn find_by_fingerprint(&self, fingerprint: &QueryFingerprint) -> Result<Option<SearchQuery>>;

    /// Store a completed search and make it the fingerprint's current
    /// result, removing the query it replaces. Returns the replaced id.
    async fn commit_search(&self, snapshot: SearchSnapshot) -> Result<Option<String>>;

    async fn set_credential(&self, platform: &Platform, secret: &str) -> Result<()>;

    /// Returns whether a credential was present
    async fn remove_credential(&self, platform: &Platform) -> Result<bool>;

    async fn get_credential(&self, platform: &Platform) -> Result<Option<String>>;

    /// All stored credentials keyed by platform key
    async fn credentials(&self) -> Result<BTreeMap<String, String>>;

    async fn set_alert(&self, name: &str, enabled: bool) -> Result<()>;

    async fn alert_preferences(&self) -> Result<AlertPreferences>;
}

/// Platforms with a non-blank stored credential
pub async fn configured_platforms(store: &dyn SearchStore) -> Result<Vec<Platform>> {
    Ok(store
        .credentials()
        .await?
        .into_iter()
        .filter(|(_, secret)| !secret.trim().is_empty())
        .map(|(key, _)| Platform::from(key))
        .collect())
}

/// Slice the actual comments of a record set
pub fn paginate(records: &[Comment], page: PageRequest) -> Result<CommentListing> {
    let actual = records.iter().filter(|c| c.is_actual());
    let total = records.iter().filter(|c| c.is_actual()).count();

    match page {
        PageRequest::All => Ok(CommentListing {
            comments: actual.cloned().collect(),
            total,
            has_more: false,
        }),
        PageRequest::Page { page, page_size } => {
            if page == 0 || page_size == 0 {
                return Err(Error::invalid_input("page and page size start at 1"));
            }
            let offset = (page - 1).saturating_mul(page_size);
            let comments: Vec<Comment> = actual.skip(offset).take(page_size).cloned().collect();
            Ok(CommentListing {
                has_more: offset.saturating_add(comments.len()) < total,
                comments,
                total,
            })
        }
    }
}

/// Normalized alert flag name
pub(crate) fn alert_key(name: &str) -> Result<String> {
    let key = name.trim().to_lowercase();
    if key.is_empty() {
        return Err(Error::invalid_input("alert name must not be empty"));
    }
    Ok(key)
}
