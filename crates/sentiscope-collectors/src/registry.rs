//! Collector registry and bounded multi-platform fan-out
//!
//! Each platform gets a live collector when a credential exists and a
//! sample collector otherwise. A failing or slow platform yields an empty
//! list; it never aborts the others and never falls back to sample data.

use crate::collector::{CollectorSource, Credentials, FetchRequest, PlatformCollector};
use crate::config::CollectorSettings;
use crate::facebook::FacebookCollector;
use crate::instagram::InstagramCollector;
use crate::sample::SampleCollector;
use crate::twitter::TwitterCollector;
use crate::youtube::YouTubeCollector;
use futures::stream::{self, StreamExt};
use sentiscope_core::{Platform, PlatformScope, RawComment, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// How one platform's collection ended
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionStatus {
    Collected(usize),
    Failed(String),
    TimedOut,
}

/// Per-platform result of a fan-out
#[derive(Debug, Clone)]
pub struct PlatformOutcome {
    pub platform: Platform,
    pub source: CollectorSource,
    pub status: CollectionStatus,
    pub elapsed: Duration,
}

/// All records from a collection run plus per-platform outcomes
#[derive(Debug, Clone, Default)]
pub struct CollectionReport {
    pub records: Vec<RawComment>,
    pub outcomes: Vec<PlatformOutcome>,
}

impl CollectionReport {
    pub fn failed_platforms(&self) -> Vec<&Platform> {
        self.outcomes
            .iter()
            .filter(|o| !matches!(o.status, CollectionStatus::Collected(_)))
            .map(|o| &o.platform)
            .collect()
    }
}

/// Registered collectors keyed by platform
pub struct CollectorRegistry {
    collectors: BTreeMap<Platform, Arc<dyn PlatformCollector>>,
    max_concurrency: usize,
    platform_timeout: Duration,
    live_credentials: bool,
}

impl CollectorRegistry {
    pub fn new(settings: &CollectorSettings) -> Self {
        Self {
            collectors: BTreeMap::new(),
            max_concurrency: settings.max_concurrency.max(1),
            platform_timeout: settings.platform_timeout(),
            live_credentials: false,
        }
    }

    /// Live collectors for configured platforms, sample collectors elsewhere
    pub fn from_credentials(credentials: &Credentials, settings: &CollectorSettings) -> Result<Self> {
        let mut registry = Self::new(settings);
        for platform in Platform::KNOWN {
            let collector: Arc<dyn PlatformCollector> = match credentials.get(&platform) {
                Some(secret) => live_collector(&platform, secret, settings)?,
                None => Arc::new(SampleCollector::new(platform.clone())),
            };
            registry.register(collector);
        }
        info!(
            live = ?credentials.configured_platforms(),
            "Collector registry initialized"
        );
        Ok(registry)
    }

    /// Register or replace the collector for its platform
    pub fn register(&mut self, collector: Arc<dyn PlatformCollector>) {
        self.collectors.insert(collector.platform(), collector);
        // A replaced collector may have been the only live one
        self.live_credentials = self
            .collectors
            .values()
            .any(|c| c.source() == CollectorSource::Live);
    }

    pub fn with_collector(mut self, collector: Arc<dyn PlatformCollector>) -> Self {
        self.register(collector);
        self
    }

    pub fn get(&self, platform: &Platform) -> Option<&Arc<dyn PlatformCollector>> {
        self.collectors.get(platform)
    }

    /// True when at least one live collector is registered
    pub fn has_live_credentials(&self) -> bool {
        self.live_credentials
    }

    /// Fetch from every platform in scope, at most `max_concurrency` at once
    #[instrument(skip_all, fields(keyword = %request.keyword, scope = %scope))]
    pub async fn collect(&self, scope: PlatformScope, request: &FetchRequest) -> CollectionReport {
        let targets: Vec<Arc<dyn PlatformCollector>> = scope
            .platforms()
            .iter()
            .filter_map(|p| self.collectors.get(p).cloned())
            .collect();

        let mut results: Vec<(PlatformOutcome, Vec<RawComment>)> = stream::iter(targets)
            .map(|collector| self.collect_one(collector, request))
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        // Restore registry order regardless of completion order
        results.sort_by(|a, b| a.0.platform.cmp(&b.0.platform));
        let mut report = CollectionReport::default();
        for (outcome, records) in results {
            report.records.extend(records);
            report.outcomes.push(outcome);
        }

        info!(
            records = report.records.len(),
            failed = report.failed_platforms().len(),
            "Collection finished"
        );
        report
    }

    async fn collect_one(
        &self,
        collector: Arc<dyn PlatformCollector>,
        request: &FetchRequest,
    ) -> (PlatformOutcome, Vec<RawComment>) {
        let platform = collector.platform();
        let source = collector.source();
        let started = Instant::now();

        let (status, records) = match tokio::time::timeout(self.platform_timeout, collector.fetch(request)).await {
            Ok(Ok(records)) => {
                metrics::counter!("sentiscope_comments_collected_total", "platform" => platform.key())
                    .increment(records.len() as u64);
                (CollectionStatus::Collected(records.len()), records)
            }
            Ok(Err(e)) => {
                warn!(platform = %platform, error = %e, "Collector failed, continuing without it");
                metrics::counter!("sentiscope_collector_failures_total", "platform" => platform.key())
                    .increment(1);
                (CollectionStatus::Failed(e.to_string()), Vec::new())
            }
            Err(_) => {
                warn!(
                    platform = %platform,
                    timeout_secs = self.platform_timeout.as_secs(),
                    "Collector timed out, continuing without it"
                );
                metrics::counter!("sentiscope_collector_failures_total", "platform" => platform.key())
                    .increment(1);
                (CollectionStatus::TimedOut, Vec::new())
            }
        };

        let outcome = PlatformOutcome {
            platform,
            source,
            status,
            elapsed: started.elapsed(),
        };
        (outcome, records)
    }
}

fn live_collector(
    platform: &Platform,
    secret: &str,
    settings: &CollectorSettings,
) -> Result<Arc<dyn PlatformCollector>> {
    let collector: Arc<dyn PlatformCollector> = match platform {
        Platform::YouTube => Arc::new(YouTubeCollector::new(secret, settings)?),
        Platform::Twitter => Arc::new(TwitterCollector::new(secret, settings)?),
        Platform::Facebook => Arc::new(FacebookCollector::new(secret, settings)?),
        Platform::Instagram => Arc::new(InstagramCollector::new(secret, settings)?),
        Platform::Other(_) => Arc::new(SampleCollector::new(platform.clone())),
    };
    Ok(collector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_without_credentials_is_all_sample() {
        let registry = CollectorRegistry::from_credentials(&Credentials::new(), &CollectorSettings::default()).unwrap();
        assert!(!registry.has_live_credentials());
        for platform in Platform::KNOWN {
            assert_eq!(registry.get(&platform).unwrap().source(), CollectorSource::Sample);
        }
    }

    #[test]
    fn test_credential_selects_live_collector() {
        let credentials = Credentials::new().with(&Platform::Twitter, "bearer");
        let registry = CollectorRegistry::from_credentials(&credentials, &CollectorSettings::default()).unwrap();
        assert!(registry.has_live_credentials());
        assert_eq!(registry.get(&Platform::Twitter).unwrap().source(), CollectorSource::Live);
        assert_eq!(registry.get(&Platform::YouTube).unwrap().source(), CollectorSource::Sample);
    }

    #[test]
    fn test_replacing_live_collector_clears_flag() {
        let credentials = Credentials::new().with(&Platform::Twitter, "bearer");
        let mut registry = CollectorRegistry::from_credentials(&credentials, &CollectorSettings::default()).unwrap();
        assert!(registry.has_live_credentials());

        registry.register(Arc::new(SampleCollector::new(Platform::Twitter)));
        assert!(!registry.has_live_credentials());
        assert_eq!(registry.get(&Platform::Twitter).unwrap().source(), CollectorSource::Sample);
    }

    #[tokio::test]
    async fn test_single_platform_scope() {
        let registry = CollectorRegistry::from_credentials(&Credentials::new(), &CollectorSettings::default()).unwrap();
        let report = registry
            .collect(PlatformScope::Facebook, &FetchRequest::new("roads", 7))
            .await;
        assert_eq!(report.outcomes.len(), 1);
        assert!(report.records.iter().all(|r| r.platform == Platform::Facebook));
        assert!(!report.records.is_empty());
    }
}
