//! Analytics aggregation over a classified comment set
//!
//! Only actual comments take part. Metadata and retrieval-note records are
//! dropped before anything is counted.

use crate::config::AnalyticsSettings;
use crate::distribution::{platform_distribution, topic_distribution};
use crate::influencers::rank_influencers;
use crate::insights::{empty_insight, summarize, InsightContext};
use crate::keywords::top_keywords;
use crate::trend::build_trend;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sentiscope_core::{
    Analytics, Comment, MetricChanges, Metrics, PlatformScope, SearchQuery, Sentiment, SentimentShare,
};
use tracing::debug;

/// Upper bound of the engagement rate
const MAX_ENGAGEMENT_RATE: f64 = 100.0;

/// Comment volume at which the volume weight saturates
const FULL_VOLUME: f64 = 100.0;

/// What the aggregator needs to know about the search
#[derive(Debug, Clone)]
pub struct AggregationContext {
    pub keyword: String,
    pub timeperiod: u32,
    pub platform: PlatformScope,
    pub credentials_configured: bool,
    /// Trend end; defaults to the current time
    pub now: Option<DateTime<Utc>>,
}

impl AggregationContext {
    pub fn new(keyword: impl Into<String>, timeperiod: u32, platform: PlatformScope) -> Self {
        Self {
            keyword: keyword.into(),
            timeperiod,
            platform,
            credentials_configured: false,
            now: None,
        }
    }

    pub fn for_query(query: &SearchQuery) -> Self {
        Self::new(query.keyword.clone(), query.timeperiod, query.platform)
    }

    pub fn with_credentials_configured(mut self, configured: bool) -> Self {
        self.credentials_configured = configured;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn insight_context(&self) -> InsightContext<'_> {
        InsightContext {
            keyword: &self.keyword,
            timeperiod: self.timeperiod,
            platform: self.platform,
            credentials_configured: self.credentials_configured,
        }
    }
}

/// Computes [`Analytics`] from a comment set
///
/// The random source only drives trend gap-filling. Seed it for
/// reproducible output.
pub struct AnalyticsAggregator {
    settings: AnalyticsSettings,
    rng: Mutex<StdRng>,
}

impl AnalyticsAggregator {
    pub fn new(settings: AnalyticsSettings) -> Self {
        Self {
            settings,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(settings: AnalyticsSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    pub fn generate(&self, comments: &[Comment], ctx: &AggregationContext) -> Analytics {
        let actual: Vec<&Comment> = comments.iter().filter(|c| c.is_actual()).collect();

        if actual.is_empty() {
            debug!(keyword = %ctx.keyword, "No actual comments, returning empty analytics");
            return Analytics {
                ai_insights: empty_insight(&ctx.insight_context()),
                ..Analytics::default()
            };
        }

        let metrics = compute_metrics(&actual);
        let now = ctx.now.unwrap_or_else(Utc::now);
        let days = self.settings.trend_days(ctx.timeperiod);
        let sentiment_trend = {
            let mut rng = self.rng.lock();
            build_trend(&actual, days, now, metrics.share(), &mut *rng)
        };

        let topic_distribution = topic_distribution(&actual);
        let ai_insights = summarize(
            &ctx.insight_context(),
            &metrics,
            topic_distribution.first().map(|t| t.name.as_str()),
        );

        debug!(
            keyword = %ctx.keyword,
            comments = actual.len(),
            skipped = comments.len() - actual.len(),
            trend_days = days,
            "Analytics generated"
        );

        Analytics {
            sentiment_trend,
            platform_distribution: platform_distribution(&actual),
            top_keywords: top_keywords(&actual),
            influencers: rank_influencers(&actual),
            topic_distribution,
            ai_insights,
            metrics,
        }
    }
}

impl Default for AnalyticsAggregator {
    fn default() -> Self {
        Self::new(AnalyticsSettings::default())
    }
}

/// Headline metrics over actual comments
pub fn compute_metrics(actual: &[&Comment]) -> Metrics {
    let total = actual.len();
    if total == 0 {
        return Metrics::default();
    }

    let count = |s: Sentiment| actual.iter().filter(|c| c.sentiment == s).count();
    let share = SentimentShare::from_counts(
        count(Sentiment::Positive),
        count(Sentiment::Neutral),
        count(Sentiment::Negative),
    );
    let total_engagement: u64 = actual.iter().map(|c| c.engagement_score).sum();

    Metrics {
        total_comments: total,
        positive_sentiment: share.positive,
        neutral_sentiment: share.neutral,
        negative_sentiment: share.negative,
        engagement_rate: engagement_rate(total, total_engagement, share),
        changes: MetricChanges::placeholder(),
    }
}

/// Average engagement × volume weight × polarization boost × 5, capped at 100
pub fn engagement_rate(total_comments: usize, total_engagement: u64, share: SentimentShare) -> f64 {
    if total_comments == 0 {
        return 0.0;
    }
    let average = total_engagement as f64 / total_comments as f64;
    let volume_weight = (total_comments as f64 / FULL_VOLUME).min(1.0);
    let polarization = f64::from(share.positive.abs_diff(share.negative)) / 100.0;
    let boost = 1.0 + 0.5 * polarization;
    let rate = (average * volume_weight * boost * 5.0 * 100.0).round() / 100.0;
    rate.min(MAX_ENGAGEMENT_RATE)
}
