//! Topic and platform distributions with chart colors

use sentiscope_core::{Comment, DistributionEntry, Platform};
use std::collections::HashMap;

/// Topics returned in the distribution
pub const TOP_TOPICS: usize = 10;

/// Topic colors, assigned by rank and cycled
pub const TOPIC_PALETTE: &[&str] = &[
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
];

/// Color for platforms without a brand color
pub const FALLBACK_COLOR: &str = "#9CA3AF";

pub fn platform_color(platform: &Platform) -> &'static str {
    match platform {
        Platform::YouTube => "#FF0000",
        Platform::Twitter => "#1DA1F2",
        Platform::Facebook => "#4267B2",
        Platform::Instagram => "#E1306C",
        Platform::Other(_) => FALLBACK_COLOR,
    }
}

/// Count per label, sorted by count descending then label ascending
fn ranked<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Top topics, each counted once per comment carrying it
pub fn topic_distribution(comments: &[&Comment]) -> Vec<DistributionEntry> {
    let labels = comments.iter().flat_map(|c| {
        let mut topics: Vec<&str> = c.topics.iter().map(String::as_str).collect();
        topics.sort_unstable();
        topics.dedup();
        topics
    });

    ranked(labels)
        .into_iter()
        .take(TOP_TOPICS)
        .enumerate()
        .map(|(rank, (name, value))| DistributionEntry {
            name,
            value,
            color: TOPIC_PALETTE[rank % TOPIC_PALETTE.len()].to_string(),
        })
        .collect()
}

/// Comment counts per platform
pub fn platform_distribution(comments: &[&Comment]) -> Vec<DistributionEntry> {
    ranked(comments.iter().map(|c| c.platform.as_str()))
        .into_iter()
        .map(|(name, value)| {
            let color = platform_color(&Platform::from(name.as_str())).to_string();
            DistributionEntry { name, value, color }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::comment;
    use sentiscope_core::Sentiment;

    #[test]
    fn test_topics_ranked_and_colored() {
        let comments = vec![
            comment("a", Platform::YouTube, Sentiment::Positive, &["water", "governance"]),
            comment("b", Platform::YouTube, Sentiment::Negative, &["water"]),
            comment("c", Platform::Twitter, Sentiment::Neutral, &["education", "water", "water"]),
        ];
        let refs: Vec<&Comment> = comments.iter().collect();
        let topics = topic_distribution(&refs);

        assert_eq!(topics[0].name, "water");
        assert_eq!(topics[0].value, 3);
        assert_eq!(topics[0].color, TOPIC_PALETTE[0]);
        // Ties broken by name
        assert_eq!(topics[1].name, "education");
        assert_eq!(topics[2].name, "governance");
        assert_eq!(topics[2].color, TOPIC_PALETTE[2]);
    }

    #[test]
    fn test_topic_distribution_caps_at_ten() {
        let names: Vec<String> = (0..14).map(|i| format!("topic{i:02}")).collect();
        let comments: Vec<Comment> = names
            .iter()
            .map(|n| comment("a", Platform::YouTube, Sentiment::Neutral, &[n.as_str()]))
            .collect();
        let refs: Vec<&Comment> = comments.iter().collect();
        let topics = topic_distribution(&refs);

        assert_eq!(topics.len(), TOP_TOPICS);
        assert_eq!(topics[8].color, TOPIC_PALETTE[0]);
    }

    #[test]
    fn test_platform_colors() {
        let comments = vec![
            comment("a", Platform::Twitter, Sentiment::Neutral, &["general"]),
            comment("b", Platform::Twitter, Sentiment::Neutral, &["general"]),
            comment("c", Platform::Other("Reddit".to_string()), Sentiment::Neutral, &["general"]),
        ];
        let refs: Vec<&Comment> = comments.iter().collect();
        let platforms = platform_distribution(&refs);

        assert_eq!(platforms.len(), 2);
        assert_eq!(platforms[0].value, 2);
        assert_eq!(platforms[0].color, "#1DA1F2");
        assert_eq!(platforms[1].color, FALLBACK_COLOR);
    }
}
