//! Continuation-token pagination with duplicate suppression
//!
//! Comment threads on a content item are paged with a continuation token.
//! The paginator:
//! - deduplicates by `<item id>_<comment id>` before accumulating
//! - stops at a safety ceiling or at 80% of the platform-reported total,
//!   whichever comes first
//! - retries a failed page with backoff, then keeps the partial result
//! - produces a retrieval note when far fewer comments came back than the
//!   platform reported

use crate::retry::{retry_with_backoff, RetryPolicy};
use async_trait::async_trait;
use sentiscope_core::{RawComment, Result, RetrievalNote};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Default safety ceiling per content item
pub const DEFAULT_CEILING: usize = 200;

/// Fraction of the reported total after which paging stops
const REPORTED_FRACTION_CAP: f64 = 0.8;

/// Below this fraction of the reported total a retrieval note is emitted...
const NOTE_THRESHOLD: f64 = 0.95;

/// ...provided the shortfall exceeds this many comments
const NOTE_MARGIN: u64 = 5;

/// Hard stop against sources that never end
const MAX_PAGES: usize = 100;

/// One page of comments
#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    /// `external_id` must be the platform comment id
    pub comments: Vec<RawComment>,
    pub next_page_token: Option<String>,
}

/// A paged comment endpoint for one platform
#[async_trait]
pub trait CommentPageSource: Send + Sync {
    async fn fetch_page(&self, item_id: &str, page_token: Option<&str>) -> Result<CommentPage>;
}

/// Result of paging through one content item
#[derive(Debug, Clone, Default)]
pub struct PaginationOutcome {
    pub comments: Vec<RawComment>,
    pub pages_fetched: usize,
    pub duplicates_skipped: usize,
    /// A page failed after all retries and paging stopped early
    pub abandoned: bool,
    pub note: Option<RetrievalNote>,
}

/// Pages through comments for one item at a time
pub struct Paginator<'a> {
    source: &'a dyn CommentPageSource,
    retry: RetryPolicy,
    ceiling: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(source: &'a dyn CommentPageSource) -> Self {
        Self {
            source,
            retry: RetryPolicy::default(),
            ceiling: DEFAULT_CEILING,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling.max(1);
        self
    }

    /// Retrieval limit given an optional platform-reported total
    pub fn limit_for(&self, reported_total: Option<u64>) -> usize {
        match reported_total {
            Some(total) if total > 0 => {
                let fraction = (total as f64 * REPORTED_FRACTION_CAP).ceil() as usize;
                self.ceiling.min(fraction.max(1))
            }
            _ => self.ceiling,
        }
    }

    pub async fn collect(&self, item_id: &str, reported_total: Option<u64>) -> PaginationOutcome {
        let limit = self.limit_for(reported_total);
        let mut outcome = PaginationOutcome::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut seen_tokens: HashSet<String> = HashSet::new();
        let mut token: Option<String> = None;

        while outcome.comments.len() < limit && outcome.pages_fetched < MAX_PAGES {
            let page_token = token.as_deref();
            let fetched = retry_with_backoff(&self.retry, "comment_page", move || {
                self.source.fetch_page(item_id, page_token)
            })
            .await;

            let page = match fetched {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        item_id,
                        collected = outcome.comments.len(),
                        error = %e,
                        "Abandoning comment page after retries, keeping partial results"
                    );
                    outcome.abandoned = true;
                    break;
                }
            };
            outcome.pages_fetched += 1;

            for comment in page.comments {
                let key = format!("{item_id}_{}", comment.external_id);
                if !seen.insert(key) {
                    outcome.duplicates_skipped += 1;
                    continue;
                }
                outcome.comments.push(comment);
                if outcome.comments.len() >= limit {
                    break;
                }
            }

            match page.next_page_token {
                Some(next) if !next.is_empty() => {
                    if !seen_tokens.insert(next.clone()) {
                        warn!(item_id, "Continuation token repeated, stopping");
                        break;
                    }
                    token = Some(next);
                }
                _ => break,
            }
        }

        debug!(
            item_id,
            pages = outcome.pages_fetched,
            collected = outcome.comments.len(),
            duplicates = outcome.duplicates_skipped,
            "Pagination finished"
        );

        if let Some(reported) = reported_total {
            outcome.note = retrieval_note(item_id, reported, outcome.comments.len() as u64);
        }
        outcome
    }
}

/// Note when retrieval fell below 95% of the reported count by more than
/// a few comments
pub fn retrieval_note(item_id: &str, reported: u64, retrieved: u64) -> Option<RetrievalNote> {
    let shortfall = reported.saturating_sub(retrieved);
    let below_threshold = (retrieved as f64) < reported as f64 * NOTE_THRESHOLD;
    (below_threshold && shortfall > NOTE_MARGIN).then(|| RetrievalNote::new(item_id, reported, retrieved))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSource;

    #[async_trait]
    impl CommentPageSource for NullSource {
        async fn fetch_page(&self, _item_id: &str, _page_token: Option<&str>) -> Result<CommentPage> {
            Ok(CommentPage::default())
        }
    }

    #[test]
    fn test_limit_is_min_of_ceiling_and_reported_fraction() {
        let source = NullSource;
        let paginator = Paginator::new(&source);
        assert_eq!(paginator.limit_for(None), 200);
        assert_eq!(paginator.limit_for(Some(0)), 200);
        assert_eq!(paginator.limit_for(Some(100)), 80);
        assert_eq!(paginator.limit_for(Some(1000)), 200);
        assert_eq!(paginator.limit_for(Some(1)), 1);
    }

    #[test]
    fn test_retrieval_note_threshold() {
        assert!(retrieval_note("v", 100, 96).is_none());
        // Below 95% but within the absolute margin
        assert!(retrieval_note("v", 20, 16).is_none());
        let note = retrieval_note("v", 1000, 200).unwrap();
        assert_eq!(note.retrieval_percentage, 20.0);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let source = NullSource;
        let outcome = Paginator::new(&source).collect("v1", None).await;
        assert!(outcome.comments.is_empty());
        assert_eq!(outcome.pages_fetched, 1);
        assert!(outcome.note.is_none());
    }
}
