//! Weighted keyword frequency over comment text and topics

use sentiscope_core::{Comment, KeywordCount};
use std::collections::HashMap;

/// Keywords returned
pub const TOP_KEYWORDS: usize = 30;

/// Weight of a topic tag relative to a text token
pub const TOPIC_WEIGHT: usize = 3;

/// Tokens must be longer than this many characters
const MIN_TOKEN_CHARS: usize = 3;

const STOP_WORDS: &[&str] = &[
    "this", "that", "with", "from", "have", "they", "their", "there", "what", "when", "where",
    "which", "will", "would", "could", "should", "about", "been", "were", "your", "just", "very",
    "also", "some", "than", "then", "them", "into", "only", "more", "much", "such", "here",
    "over", "does", "like", "because", "being",
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Lowercase a whitespace token and strip surrounding punctuation
fn normalize(token: &str) -> String {
    token
        .trim_matches(|c: char| c.is_ascii_punctuation() || matches!(c, '“' | '”' | '‘' | '’' | '…' | '।'))
        .to_lowercase()
}

/// Top keywords: text tokens count 1, topic tags count [`TOPIC_WEIGHT`]
pub fn top_keywords(comments: &[&Comment]) -> Vec<KeywordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for comment in comments {
        for token in comment.text.split_whitespace() {
            let token = normalize(token);
            if token.chars().count() > MIN_TOKEN_CHARS && !is_stop_word(&token) {
                *counts.entry(token).or_default() += 1;
            }
        }
        for topic in &comment.topics {
            *counts.entry(topic.to_lowercase()).or_default() += TOPIC_WEIGHT;
        }
    }

    let mut ranked: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(text, value)| KeywordCount { text, value })
        .collect();
    ranked.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.text.cmp(&b.text)));
    ranked.truncate(TOP_KEYWORDS);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::comment_with_text;
    use sentiscope_core::{Platform, Sentiment};

    #[test]
    fn test_short_tokens_and_stop_words_dropped() {
        let comments = vec![comment_with_text(
            "This road is very good, roads matter!",
            Platform::YouTube,
            Sentiment::Positive,
            &[],
        )];
        let refs: Vec<&Comment> = comments.iter().collect();
        let keywords: Vec<String> = top_keywords(&refs).into_iter().map(|k| k.text).collect();

        assert!(keywords.contains(&"good".to_string()));
        assert!(keywords.contains(&"roads".to_string()));
        assert!(keywords.contains(&"matter".to_string()));
        assert!(!keywords.contains(&"this".to_string()));
        assert!(!keywords.contains(&"road".to_string()));
        assert!(!keywords.contains(&"very".to_string()));
    }

    #[test]
    fn test_topics_weighted_three_times() {
        let comments = vec![
            comment_with_text("water water", Platform::YouTube, Sentiment::Neutral, &["water"]),
            comment_with_text("drainage", Platform::YouTube, Sentiment::Neutral, &[]),
        ];
        let refs: Vec<&Comment> = comments.iter().collect();
        let keywords = top_keywords(&refs);

        assert_eq!(keywords[0].text, "water");
        assert_eq!(keywords[0].value, 2 + TOPIC_WEIGHT);
        assert_eq!(keywords[1].text, "drainage");
        assert_eq!(keywords[1].value, 1);
    }

    #[test]
    fn test_telugu_tokens_counted_by_chars() {
        let comments = vec![comment_with_text("నీరు రోడ్లు", Platform::YouTube, Sentiment::Neutral, &[])];
        let refs: Vec<&Comment> = comments.iter().collect();
        let keywords = top_keywords(&refs);
        // Lengths count code points, not bytes
        assert_eq!(keywords.len(), 2);
    }

    #[test]
    fn test_capped_at_thirty() {
        let text = (0..40).map(|i| format!("word{i:02}")).collect::<Vec<_>>().join(" ");
        let comments = vec![comment_with_text(&text, Platform::YouTube, Sentiment::Neutral, &[])];
        let refs: Vec<&Comment> = comments.iter().collect();
        assert_eq!(top_keywords(&refs).len(), TOP_KEYWORDS);
    }
}
