//! In-memory store backend

use crate::store::{alert_key, paginate, AlertPreferences, CommentListing, PageRequest, SearchSnapshot, SearchStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use sentiscope_core::{Analytics, Comment, Error, Platform, QueryFingerprint, Result, SearchQuery};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Default)]
struct State {
    queries: HashMap<String, SearchQuery>,
    comments: HashMap<String, Vec<Comment>>,
    analytics: HashMap<String, Analytics>,
    fingerprints: HashMap<QueryFingerprint, String>,
    credentials: BTreeMap<String, String>,
    alerts: AlertPreferences,
}

impl State {
    fn remove_query(&mut self, id: &str) {
        self.queries.remove(id);
        self.comments.remove(id);
        self.analytics.remove(id);
    }
}

/// All state behind a single lock; a commit is one write section
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored queries, committed or not
    pub fn query_count(&self) -> usize {
        self.state.read().queries.len()
    }
}

#[async_trait]
impl SearchStore for MemoryStore {
    async fn create_query(&self, query: &SearchQuery) -> Result<()> {
        let mut state = self.state.write();
        if state.queries.contains_key(&query.id) {
            return Err(Error::store(format!("query {} already exists", query.id)));
        }
        state.queries.insert(query.id.clone(), query.clone());
        state.comments.insert(query.id.clone(), Vec::new());
        Ok(())
    }

    async fn get_query(&self, id: &str) -> Result<Option<SearchQuery>> {
        Ok(self.state.read().queries.get(id).cloned())
    }

    async fn append_comments(&self, query_id: &str, comments: &[Comment]) -> Result<usize> {
        let mut state = self.state.write();
        if !state.queries.contains_key(query_id) {
            return Err(Error::not_found(format!("query {query_id}")));
        }
        let stored = state.comments.entry(query_id.to_string()).or_default();
        stored.extend_from_slice(comments);
        Ok(stored.len())
    }

    async fn list_comments(&self, query_id: &str, page: PageRequest) -> Result<Option<CommentListing>> {
        let state = self.state.read();
        match state.comments.get(query_id) {
            Some(records) => paginate(records, page).map(Some),
            None => Ok(None),
        }
    }

    async fn all_comments(&self, query_id: &str) -> Result<Option<Vec<Comment>>> {
        Ok(self.state.read().comments.get(query_id).cloned())
    }

    async fn put_analytics(&self, query_id: &str, analytics: &Analytics) -> Result<()> {
        let mut state = self.state.write();
        if !state.queries.contains_key(query_id) {
            return Err(Error::not_found(format!("query {query_id}")));
        }
        state.analytics.insert(query_id.to_string(), analytics.clone());
        Ok(())
    }

    async fn get_analytics(&self, query_id: &str) -> Result<Option<Analytics>> {
        Ok(self.state.read().analytics.get(query_id).cloned())
    }

    async fn find_by_fingerprint(&self, fingerprint: &QueryFingerprint) -> Result<Option<SearchQuery>> {
        let state = self.state.read();
        Ok(state
            .fingerprints
            .get(fingerprint)
            .and_then(|id| state.queries.get(id))
            .cloned())
    }

    async fn commit_search(&self, snapshot: SearchSnapshot) -> Result<Option<String>> {
        let SearchSnapshot {
            query,
            comments,
            analytics,
        } = snapshot;
        let id = query.id.clone();
        let fingerprint = query.fingerprint();

        let mut state = self.state.write();
        state.queries.insert(id.clone(), query);
        state.comments.insert(id.clone(), comments);
        state.analytics.insert(id.clone(), analytics);

        let replaced = state
            .fingerprints
            .insert(fingerprint, id.clone())
            .filter(|previous| *previous != id);
        if let Some(previous) = &replaced {
            state.remove_query(previous);
            debug!(query_id = %id, replaced = %previous, "Replaced cached search");
        }
        Ok(replaced)
    }

    async fn set_credential(&self, platform: &Platform, secret: &str) -> Result<()> {
        self.state
            .write()
            .credentials
            .insert(platform.key(), secret.to_string());
        Ok(())
    }

    async fn remove_credential(&self, platform: &Platform) -> Result<bool> {
        Ok(self.state.write().credentials.remove(&platform.key()).is_some())
    }

    async fn get_credential(&self, platform: &Platform) -> Result<Option<String>> {
        Ok(self.state.read().credentials.get(&platform.key()).cloned())
    }

    async fn credentials(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.state.read().credentials.clone())
    }

    async fn set_alert(&self, name: &str, enabled: bool) -> Result<()> {
        let key = alert_key(name)?;
        self.state.write().alerts.insert(key, enabled);
        Ok(())
    }

    async fn alert_preferences(&self) -> Result<AlertPreferences> {
        Ok(self.state.read().alerts.clone())
    }
}
