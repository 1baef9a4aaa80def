//! Templated insight sentences
//!
//! Fill-in-the-blank templates chosen by which sentiment dominates. No
//! text generation happens here.

use sentiscope_core::{Metrics, PlatformScope};

/// Inputs the empty-state messages depend on
#[derive(Debug, Clone, Copy)]
pub struct InsightContext<'a> {
    pub keyword: &'a str,
    pub timeperiod: u32,
    pub platform: PlatformScope,
    /// At least one platform credential is configured
    pub credentials_configured: bool,
}

/// Prefix of the message shown when no platform has credentials
pub const NO_CREDENTIALS_MESSAGE: &str = "No API keys are configured for any platform";

/// Prefix of the message shown when credentials exist but nothing matched
pub const NO_DATA_MESSAGE: &str = "No comments were found";

/// Insight for an empty comment set
pub fn empty_insight(ctx: &InsightContext<'_>) -> String {
    if ctx.credentials_configured {
        format!(
            "{NO_DATA_MESSAGE} for \"{}\" on {} in the last {} days. Try a broader keyword or a longer time period.",
            ctx.keyword,
            scope_label(ctx.platform),
            ctx.timeperiod
        )
    } else {
        format!(
            "{NO_CREDENTIALS_MESSAGE}. Add platform credentials to analyze real comments about \"{}\".",
            ctx.keyword
        )
    }
}

/// Insight for a non-empty comment set
pub fn summarize(ctx: &InsightContext<'_>, metrics: &Metrics, top_topic: Option<&str>) -> String {
    let topic = top_topic.unwrap_or("general discussion");
    let positive = metrics.positive_sentiment;
    let negative = metrics.negative_sentiment;
    let rate = metrics.engagement_rate;

    if positive > negative {
        format!(
            "Sentiment around \"{}\" is predominantly positive ({positive}% positive). \
             {} is the most discussed topic, with a 12% increase in positive mentions over the previous period. \
             Engagement rate stands at {rate:.2}%.",
            ctx.keyword,
            capitalize(topic)
        )
    } else if negative > positive {
        format!(
            "Sentiment around \"{}\" leans negative, with {negative}% of comments expressing concerns. \
             {} draws the most attention. Engagement rate stands at {rate:.2}%.",
            ctx.keyword,
            capitalize(topic)
        )
    } else {
        format!(
            "Sentiment around \"{}\" is evenly balanced ({positive}% positive, {negative}% negative). \
             {} is the most discussed topic. Engagement rate stands at {rate:.2}%.",
            ctx.keyword,
            capitalize(topic)
        )
    }
}

fn scope_label(scope: PlatformScope) -> &'static str {
    match scope {
        PlatformScope::All => "any platform",
        PlatformScope::YouTube => "YouTube",
        PlatformScope::Twitter => "Twitter",
        PlatformScope::Facebook => "Facebook",
        PlatformScope::Instagram => "Instagram",
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(credentials_configured: bool) -> InsightContext<'static> {
        InsightContext {
            keyword: "water board",
            timeperiod: 7,
            platform: PlatformScope::All,
            credentials_configured,
        }
    }

    #[test]
    fn test_empty_states_are_distinguishable() {
        let no_keys = empty_insight(&ctx(false));
        let no_data = empty_insight(&ctx(true));

        assert!(no_keys.starts_with(NO_CREDENTIALS_MESSAGE));
        assert!(!no_keys.contains(NO_DATA_MESSAGE));
        assert!(no_data.starts_with(NO_DATA_MESSAGE));
        assert!(!no_data.contains(NO_CREDENTIALS_MESSAGE));
        assert!(no_data.contains("last 7 days"));
    }

    #[test]
    fn test_templates_follow_dominant_sentiment() {
        let mut metrics = Metrics {
            total_comments: 10,
            positive_sentiment: 70,
            neutral_sentiment: 20,
            negative_sentiment: 10,
            engagement_rate: 4.5,
            ..Metrics::default()
        };
        let positive = summarize(&ctx(true), &metrics, Some("water"));
        assert!(positive.contains("12% increase"));
        assert!(positive.contains("Water"));
        assert!(positive.contains("4.50%"));

        metrics.positive_sentiment = 10;
        metrics.negative_sentiment = 70;
        let negative = summarize(&ctx(true), &metrics, Some("complaints"));
        assert!(negative.contains("70%"));
        assert!(negative.contains("Complaints"));
        assert!(!negative.contains("12% increase"));
    }
}
