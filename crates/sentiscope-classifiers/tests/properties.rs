//! Property tests for the classifier and tagger
//!
//! Every comment gets a label and at least one topic, classification is
//! repeatable, and tagging is idempotent.

use chrono::Utc;
use proptest::prelude::*;
use sentiscope_classifiers::{detect_language, Classifier, SentimentClassifier, TopicTagger};
use sentiscope_core::{Comment, Language, Platform, RawComment, RecordKind};

fn raw(text: &str) -> RawComment {
    RawComment {
        platform: Platform::Twitter,
        external_id: "t1".to_string(),
        user_name: "someone".to_string(),
        user_id: None,
        text: text.to_string(),
        language: detect_language(text),
        engagement_score: 3,
        created_at: Utc::now(),
        source_url: "https://twitter.com/someone/status/t1".to_string(),
        record: RecordKind::Comment,
    }
}

fn comment_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ,.!']{0,80}",
        Just("రోడ్లు చాలా బాగున్నాయి".to_string()),
        Just("నీటి సమస్య దారుణం".to_string()),
        "[🔥👍😍🤔 a-z]{0,12}",
    ]
}

proptest! {
    #[test]
    fn prop_classification_is_deterministic(text in comment_text()) {
        let classifier = SentimentClassifier::new().unwrap();
        let first = classifier.classify(&text);
        let second = classifier.classify(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_scores_in_range(text in comment_text()) {
        let classifier = SentimentClassifier::new().unwrap();
        let verdict = classifier.classify(&text);
        prop_assert!((0.0..=10.0).contains(&verdict.score));
    }

    #[test]
    fn prop_every_comment_has_topics(text in comment_text()) {
        let classifier = SentimentClassifier::new().unwrap();
        let tagger = TopicTagger::new().unwrap();

        let mut comment = Comment::from_raw("q1", raw(&text));
        comment.sentiment = classifier.classify(&comment.text).sentiment;
        tagger.tag(&mut comment);
        prop_assert!(!comment.topics.is_empty());

        let before = comment.topics.clone();
        tagger.tag(&mut comment);
        prop_assert_eq!(before, comment.topics);
    }
}

#[test]
fn test_pretagged_comment_passes_through() {
    let tagger = TopicTagger::new().unwrap();
    let mut comment = Comment::from_raw("q1", raw("the hospital roads are broken"));
    comment.topics = vec!["custom".to_string()];

    tagger.tag(&mut comment);
    tagger.tag(&mut comment);
    assert_eq!(comment.topics, vec!["custom".to_string()]);
}

#[test]
fn test_language_detection_on_raw() {
    assert_eq!(raw("సూపర్").language, Language::Telugu);
    assert_eq!(raw("super").language, Language::English);
}
