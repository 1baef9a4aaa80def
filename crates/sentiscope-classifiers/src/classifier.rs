//! Classifier trait and common types

use sentiscope_core::Sentiment;

/// Trait for sentiment classifiers
///
/// Classification is pure: the same text always yields the same verdict.
pub trait Classifier: Send + Sync {
    /// Classify the given text
    fn classify(&self, text: &str) -> SentimentVerdict;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentVerdict {
    /// Sentiment label
    pub sentiment: Sentiment,

    /// Confidence score (0.0-10.0)
    pub score: f32,

    /// Which layer produced the verdict
    pub signal: Signal,
}

impl SentimentVerdict {
    /// Create a new verdict
    pub fn new(sentiment: Sentiment, score: f32, signal: Signal) -> Self {
        Self {
            sentiment,
            score,
            signal,
        }
    }

    /// Neutral verdict for empty input
    pub fn empty() -> Self {
        Self::new(Sentiment::Neutral, 0.0, Signal::Empty)
    }
}

/// Classification layer, in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Blank text
    Empty,
    /// Emoji heuristic
    Emoji,
    /// Built-in praise phrase, by rule name
    Praise(String),
    /// Domain context rule, by rule name
    ContextRule(String),
    /// General lexicon scoring
    Lexicon,
}
