//! Influencer ranking by comment volume per (author, platform)

use sentiscope_core::{Comment, EngagementLevel, Influencer, Platform, Sentiment, SentimentShare};
use std::collections::HashMap;

/// Influencers returned
pub const TOP_INFLUENCERS: usize = 10;

#[derive(Default)]
struct AuthorStats {
    order: usize,
    positive: usize,
    neutral: usize,
    negative: usize,
}

impl AuthorStats {
    fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Handle derived from a display name: lowercase, whitespace removed
pub fn handle_for(name: &str) -> String {
    name.split_whitespace().collect::<String>().to_lowercase()
}

/// Group by (user name, platform), rank by comment count
///
/// Equal counts keep first-seen order.
pub fn rank_influencers(comments: &[&Comment]) -> Vec<Influencer> {
    let mut groups: HashMap<(&str, &Platform), AuthorStats> = HashMap::new();

    for comment in comments {
        let next_order = groups.len();
        let stats = groups
            .entry((comment.user_name.as_str(), &comment.platform))
            .or_insert_with(|| AuthorStats {
                order: next_order,
                ..AuthorStats::default()
            });
        match comment.sentiment {
            Sentiment::Positive => stats.positive += 1,
            Sentiment::Neutral => stats.neutral += 1,
            Sentiment::Negative => stats.negative += 1,
        }
    }

    let mut ranked: Vec<((&str, &Platform), AuthorStats)> = groups.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total().cmp(&a.1.total()).then_with(|| a.1.order.cmp(&b.1.order)));

    ranked
        .into_iter()
        .take(TOP_INFLUENCERS)
        .map(|((name, platform), stats)| Influencer {
            name: name.to_string(),
            handle: handle_for(name),
            platform: platform.clone(),
            comment_count: stats.total(),
            engagement_level: EngagementLevel::from_comment_count(stats.total()),
            sentiment: SentimentShare::from_counts(stats.positive, stats.neutral, stats.negative),
        })
        .collect()
}
