//! Sentiscope Classifiers
//!
//! Deterministic, lexicon-and-pattern based classification for social
//! media comments in English and Telugu.
//!
//! Sentiment layers, first match wins:
//! - Emoji heuristic (hearts, approving emoji, emoji bursts)
//! - Built-in praise phrases
//! - Domain context rules (opt-in, configurable)
//! - Lexicon scoring with negation and intensifiers
//!
//! Topic tagging maps bilingual keywords to English category names.

pub mod classifier;
pub mod config;
pub mod emoji;
pub mod language;
pub mod patterns;
pub mod rules;
pub mod sentiment;
pub mod topics;

pub use classifier::{Classifier, SentimentVerdict, Signal};
pub use config::{ClassifierConfig, ContextRuleSpec, MatcherSpec};
pub use language::detect_language;
pub use rules::{political_commentary, OverrideRule, RuleLayer, RuleMatcher, RuleSet};
pub use sentiment::{LexiconScorer, SentimentClassifier};
pub use topics::{TopicTagger, GENERAL_TOPIC};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Classifier, SentimentVerdict};
    pub use crate::sentiment::SentimentClassifier;
    pub use crate::topics::TopicTagger;
}
