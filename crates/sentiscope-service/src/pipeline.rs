//! Search pipeline
//!
//! collect -> dedupe -> classify -> tag -> aggregate -> commit
//!
//! Searches are cached by query fingerprint. A repeat search returns the
//! stored analytics and comments without touching any collector unless a
//! refresh is requested, in which case the whole pipeline runs again and
//! the new result replaces the old one in a single store commit.

use crate::config::ServiceConfig;
use crate::request::{SearchRequest, ValidSearch};
use crate::result::SearchResult;
use sentiscope_analytics::{AggregationContext, AnalyticsAggregator};
use sentiscope_classifiers::{Classifier, TopicTagger};
use sentiscope_collectors::{CollectorRegistry, Credentials, FetchRequest};
use sentiscope_core::{
    Comment, Error, Platform, QueryFingerprint, RawComment, Result, SearchQuery, VideoMetadata,
};
use sentiscope_store::{paginate, CommentListing, PageRequest, SearchSnapshot, SearchStore};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// End-to-end search over collectors, classifiers, analytics and store
pub struct SearchPipeline {
    store: Arc<dyn SearchStore>,
    registry: CollectorRegistry,
    classifier: Arc<dyn Classifier>,
    tagger: TopicTagger,
    aggregator: AnalyticsAggregator,
}

impl SearchPipeline {
    pub fn new(
        store: Arc<dyn SearchStore>,
        registry: CollectorRegistry,
        classifier: Arc<dyn Classifier>,
        tagger: TopicTagger,
        aggregator: AnalyticsAggregator,
    ) -> Self {
        Self {
            store,
            registry,
            classifier,
            tagger,
            aggregator,
        }
    }

    /// Build from configuration, selecting collectors from the credentials
    /// held by the store
    pub async fn from_config(config: &ServiceConfig, store: Arc<dyn SearchStore>) -> Result<Self> {
        let credentials: Credentials = store
            .credentials()
            .await?
            .into_iter()
            .map(|(key, secret)| (Platform::from(key), secret))
            .collect();

        let registry = CollectorRegistry::from_credentials(&credentials, &config.collection)?;
        let classifier = Arc::new(config.classifier.build_classifier()?);
        let tagger = TopicTagger::new()?;
        let aggregator = AnalyticsAggregator::new(config.analytics.clone());

        Ok(Self::new(store, registry, classifier, tagger, aggregator))
    }

    pub fn store(&self) -> &Arc<dyn SearchStore> {
        &self.store
    }

    /// Run a search, serving from the fingerprint cache when possible
    #[instrument(skip_all, fields(keyword = %request.keyword, platform = %request.platform))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let started = Instant::now();
        let search = request.validate()?;
        let fingerprint = QueryFingerprint::new(&search.keyword, search.timeperiod, search.platform);

        if !search.refresh {
            if let Some(result) = self.cached(&search, &fingerprint).await? {
                metrics::counter!("sentiscope_searches_total", "cache" => "hit").increment(1);
                info!(query_id = %result.query.id, fingerprint = %fingerprint, "Serving cached search");
                return Ok(result);
            }
        }

        let cache = if search.refresh { "refresh" } else { "miss" };
        metrics::counter!("sentiscope_searches_total", "cache" => cache).increment(1);

        let result = self.run(&search).await?;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("sentiscope_pipeline_latency_ms").record(elapsed_ms);
        info!(
            query_id = %result.query.id,
            total_comments = result.total_comments,
            cache,
            elapsed_ms,
            "Search completed"
        );
        Ok(result)
    }

    /// Page through a stored query's actual comments
    pub async fn comments(&self, query_id: &str, page: PageRequest) -> Result<CommentListing> {
        self.store
            .list_comments(query_id, page)
            .await?
            .ok_or_else(|| Error::not_found(format!("search query {query_id}")))
    }

    async fn cached(&self, search: &ValidSearch, fingerprint: &QueryFingerprint) -> Result<Option<SearchResult>> {
        let Some(query) = self.store.find_by_fingerprint(fingerprint).await? else {
            return Ok(None);
        };

        let Some(analytics) = self.store.get_analytics(&query.id).await? else {
            warn!(query_id = %query.id, "Cached query has no analytics, recomputing");
            return Ok(None);
        };
        let Some(listing) = self.store.list_comments(&query.id, search.comments).await? else {
            return Ok(None);
        };

        let video = if search.video_title_search {
            self.store
                .all_comments(&query.id)
                .await?
                .and_then(|records| first_video_metadata(&records))
        } else {
            None
        };

        Ok(Some(SearchResult::assemble(query, analytics, listing, video.as_ref(), true)))
    }

    async fn run(&self, search: &ValidSearch) -> Result<SearchResult> {
        let mut query = SearchQuery::new(&search.keyword, search.timeperiod, search.platform);
        if let Some(user_id) = &search.user_id {
            query = query.with_user(user_id);
        }

        let fetch = FetchRequest::new(&search.keyword, search.timeperiod)
            .with_video_title_search(search.video_title_search);
        let report = self.registry.collect(search.platform, &fetch).await;
        if !report.failed_platforms().is_empty() {
            debug!(failed = ?report.failed_platforms(), "Some platforms returned nothing");
        }

        let comments = self.prepare(&query.id, report.records);

        let ctx = AggregationContext::for_query(&query)
            .with_credentials_configured(self.registry.has_live_credentials());
        let analytics = self.aggregator.generate(&comments, &ctx);

        let video = if search.video_title_search {
            first_video_metadata(&comments)
        } else {
            None
        };

        // Page from memory; a concurrent refresh may replace this query in
        // the store as soon as it is committed
        let listing = paginate(&comments, search.comments)?;

        let snapshot = SearchSnapshot {
            query: query.clone(),
            comments,
            analytics: analytics.clone(),
        };
        if let Some(replaced) = self.store.commit_search(snapshot).await? {
            info!(query_id = %query.id, replaced = %replaced, "Replaced previous result");
        }

        Ok(SearchResult::assemble(query, analytics, listing, video.as_ref(), false))
    }

    /// Attach records to the query, drop cross-page duplicates, then
    /// classify and tag the actual comments
    fn prepare(&self, query_id: &str, records: Vec<RawComment>) -> Vec<Comment> {
        let mut seen: HashSet<(Platform, String)> = HashSet::new();
        let mut comments = Vec::with_capacity(records.len());
        let mut duplicates = 0usize;

        for raw in records {
            if !seen.insert((raw.platform.clone(), raw.external_id.clone())) {
                duplicates += 1;
                continue;
            }
            let mut comment = Comment::from_raw(query_id, raw);
            if comment.is_actual() {
                let verdict = self.classifier.classify(&comment.text);
                comment.sentiment = verdict.sentiment;
                comment.sentiment_score = verdict.score;
                self.tagger.tag(&mut comment);
            }
            comments.push(comment);
        }

        if duplicates > 0 {
            debug!(query_id, duplicates, "Dropped duplicate records");
        }
        comments
    }
}

fn first_video_metadata(records: &[Comment]) -> Option<VideoMetadata> {
    records.iter().find_map(Comment::video_metadata).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sentiscope_classifiers::ClassifierConfig;
    use sentiscope_collectors::CollectorSettings;
    use sentiscope_core::{Language, RecordKind, Sentiment};
    use sentiscope_store::MemoryStore;

    fn pipeline() -> SearchPipeline {
        SearchPipeline::new(
            Arc::new(MemoryStore::new()),
            CollectorRegistry::new(&CollectorSettings::default()),
            Arc::new(ClassifierConfig::default().build_classifier().unwrap()),
            TopicTagger::new().unwrap(),
            AnalyticsAggregator::default(),
        )
    }

    fn raw(platform: Platform, id: &str, text: &str) -> RawComment {
        RawComment {
            platform,
            external_id: id.to_string(),
            user_name: "viewer".to_string(),
            user_id: None,
            text: text.to_string(),
            language: Language::English,
            engagement_score: 1,
            created_at: Utc::now(),
            source_url: String::new(),
            record: RecordKind::Comment,
        }
    }

    #[test]
    fn test_prepare_dedupes_per_platform() {
        let pipeline = pipeline();
        let records = vec![
            raw(Platform::YouTube, "a", "thank you very much"),
            raw(Platform::YouTube, "a", "thank you very much"),
            raw(Platform::Twitter, "a", "this is bad and a waste of money"),
        ];

        let comments = pipeline.prepare("q_1", records);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].sentiment, Sentiment::Positive);
        assert_eq!(comments[1].sentiment, Sentiment::Negative);
        assert!(comments.iter().all(|c| !c.topics.is_empty()));
        assert!(comments.iter().all(|c| c.search_query_id == "q_1"));
    }

    #[tokio::test]
    async fn test_comments_for_unknown_query() {
        let err = pipeline().comments("q_missing", PageRequest::All).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
