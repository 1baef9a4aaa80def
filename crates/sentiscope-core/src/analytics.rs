//! Derived analytics shapes served to the dashboard

use crate::share::SentimentShare;
use crate::types::Platform;
use serde::{Deserialize, Serialize};

/// Full analytics for one search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub metrics: Metrics,
    pub sentiment_trend: Vec<TrendPoint>,
    pub topic_distribution: Vec<DistributionEntry>,
    pub platform_distribution: Vec<DistributionEntry>,
    pub top_keywords: Vec<KeywordCount>,
    pub influencers: Vec<Influencer>,
    pub ai_insights: String,
}

/// Headline numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_comments: usize,
    pub positive_sentiment: u32,
    pub neutral_sentiment: u32,
    pub negative_sentiment: u32,
    /// Composite engagement score in [0, 100], two decimals
    pub engagement_rate: f64,
    pub changes: MetricChanges,
}

impl Metrics {
    pub fn share(&self) -> SentimentShare {
        SentimentShare {
            positive: self.positive_sentiment,
            neutral: self.neutral_sentiment,
            negative: self.negative_sentiment,
        }
    }
}

/// Period-over-period deltas, in percent
///
/// No historical snapshots are kept, so these are fixed placeholder values
/// until a prior-period comparison exists. They are not derived from data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricChanges {
    pub total_comments: f64,
    pub positive_sentiment: f64,
    pub negative_sentiment: f64,
    pub engagement_rate: f64,
    /// Always true while the values above are placeholders
    pub placeholder: bool,
}

impl MetricChanges {
    pub fn placeholder() -> Self {
        Self {
            total_comments: 12.5,
            positive_sentiment: 5.2,
            negative_sentiment: -2.1,
            engagement_rate: 3.7,
            placeholder: true,
        }
    }
}

/// One day of the sentiment trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
    /// False when the day had no comments and values were smoothed
    pub observed: bool,
}

impl TrendPoint {
    pub fn share(&self) -> SentimentShare {
        SentimentShare {
            positive: self.positive,
            neutral: self.neutral,
            negative: self.negative,
        }
    }
}

/// A labelled count with a chart color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub name: String,
    pub value: usize,
    pub color: String,
}

/// Weighted keyword frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCount {
    pub text: String,
    pub value: usize,
}

/// Influencer engagement tier, derived from comment count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementLevel {
    Low,
    Medium,
    High,
}

impl EngagementLevel {
    /// `<=5` Low, `6..=15` Medium, `>15` High
    pub fn from_comment_count(count: usize) -> Self {
        match count {
            0..=5 => Self::Low,
            6..=15 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// A frequent commenter on one platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    pub name: String,
    pub handle: String,
    pub platform: Platform,
    pub comment_count: usize,
    pub engagement_level: EngagementLevel,
    pub sentiment: SentimentShare,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_thresholds() {
        assert_eq!(EngagementLevel::from_comment_count(1), EngagementLevel::Low);
        assert_eq!(EngagementLevel::from_comment_count(5), EngagementLevel::Low);
        assert_eq!(EngagementLevel::from_comment_count(6), EngagementLevel::Medium);
        assert_eq!(EngagementLevel::from_comment_count(15), EngagementLevel::Medium);
        assert_eq!(EngagementLevel::from_comment_count(16), EngagementLevel::High);
    }

    #[test]
    fn test_analytics_serializes_camel_case() {
        let json = serde_json::to_value(Analytics::default()).unwrap();
        assert!(json.get("sentimentTrend").is_some());
        assert!(json["metrics"].get("totalComments").is_some());
        assert_eq!(json["aiInsights"], "");
    }
}
