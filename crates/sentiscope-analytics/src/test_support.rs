//! Comment builders for unit tests

use chrono::Utc;
use sentiscope_core::{Comment, Language, Platform, RawComment, RecordKind, Sentiment};

pub fn comment_with_text(text: &str, platform: Platform, sentiment: Sentiment, topics: &[&str]) -> Comment {
    let raw = RawComment {
        platform,
        external_id: "ext".to_string(),
        user_name: "viewer".to_string(),
        user_id: None,
        text: text.to_string(),
        language: Language::English,
        engagement_score: 10,
        created_at: Utc::now(),
        source_url: String::new(),
        record: RecordKind::Comment,
    };
    let mut comment = Comment::from_raw("q_test", raw);
    comment.sentiment = sentiment;
    comment.topics = topics.iter().map(|t| t.to_string()).collect();
    comment
}

pub fn comment(user: &str, platform: Platform, sentiment: Sentiment, topics: &[&str]) -> Comment {
    let mut comment = comment_with_text("sample text", platform, sentiment, topics);
    comment.user_name = user.to_string();
    comment
}
