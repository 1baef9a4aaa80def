//! Layered sentiment classifier
//!
//! Layers run in priority order and the first one to produce a verdict
//! wins: emoji heuristic, praise phrases, domain context rules, and
//! finally lexicon scoring with negation and intensifier handling.

use crate::classifier::{Classifier, SentimentVerdict, Signal};
use crate::emoji::emoji_verdict;
use crate::patterns::praise_rules;
use crate::rules::{RuleLayer, RuleSet};
use aho_corasick::AhoCorasick;
use sentiscope_core::{Error, Result, Sentiment};
use std::collections::HashSet;

const POSITIVE_TERMS: &[&str] = &[
    "good", "great", "excellent", "love", "amazing", "wonderful", "happy", "fantastic",
    "awesome", "best", "nice", "thank", "beautiful", "brilliant", "perfect", "support",
    "proud", "helpful", "improve", "success", "congrat", "appreciate", "glad", "super",
    // Telugu
    "బాగుంది", "బాగున్నాయి", "మంచి", "అద్భుతం", "సంతోషం", "ధన్యవాదాలు", "అభినందనలు", "గర్వం",
];

const NEGATIVE_TERMS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "horrible", "worst", "sad", "angry", "disappoint",
    "poor", "waste", "useless", "corrupt", "fail", "pathetic", "shame", "fraud", "broken",
    "dirty", "delay", "scam", "worse",
    // Telugu
    "చెడు", "దారుణం", "అవినీతి", "సమస్య", "నష్టం", "మోసం", "కోపం", "బాధ",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "dont", "don't", "didn't", "didnt", "isn't", "isnt", "wasn't",
    "cannot", "can't", "won't", "nothing", "కాదు", "లేదు", "లేవు",
];

const INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "so", "too", "totally", "absolutely", "highly", "చాలా",
    "బాగా",
];

const POSITIVE_PHRASES: &[&str] = &["thank you", "thanks for"];
const NEGATIVE_PHRASES: &[&str] = &["waste of", "not worth"];
const PHRASE_BOOST: f32 = 2.0;

/// A modifier expires this many tokens after it was set
const MODIFIER_WINDOW: usize = 5;
const NEUTRAL_SCORE: f32 = 1.0;

/// Lexicon scorer (fourth classification layer)
pub struct LexiconScorer {
    positive: AhoCorasick,
    negative: AhoCorasick,
    negations: HashSet<&'static str>,
    intensifiers: HashSet<&'static str>,
}

/// Raw lexicon totals before the final decision
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LexiconScores {
    pub positive: f32,
    pub negative: f32,
}

impl LexiconScorer {
    pub fn new() -> Result<Self> {
        let build = |terms: &[&str], label: &str| {
            AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(terms)
                .map_err(|e| {
                    Error::config(format!("Failed to build {label} sentiment matcher: {e}"))
                })
        };

        Ok(Self {
            positive: build(POSITIVE_TERMS, "positive")?,
            negative: build(NEGATIVE_TERMS, "negative")?,
            negations: NEGATIONS.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        })
    }

    /// Score lowercased text
    pub fn score(&self, lowered: &str) -> LexiconScores {
        let mut scores = LexiconScores::default();
        let mut modifier = 1.0f32;
        let mut armed_at: Option<usize> = None;

        for (index, raw) in lowered.split_whitespace().enumerate() {
            if let Some(start) = armed_at {
                if index - start >= MODIFIER_WINDOW {
                    modifier = 1.0;
                    armed_at = None;
                }
            }

            let word = raw.trim_matches(|c: char| c.is_ascii_punctuation());
            if word.is_empty() {
                continue;
            }

            if self.negations.contains(word) {
                modifier = -1.0;
                armed_at = Some(index);
            } else if self.intensifiers.contains(word) {
                modifier *= 1.5;
                armed_at.get_or_insert(index);
            } else if self.positive.is_match(word) {
                scores.positive += modifier;
                modifier = 1.0;
                armed_at = None;
            } else if self.negative.is_match(word) {
                scores.negative += modifier;
                modifier = 1.0;
                armed_at = None;
            }
        }

        if POSITIVE_PHRASES.iter().any(|p| lowered.contains(p)) {
            scores.positive += PHRASE_BOOST;
        }
        if NEGATIVE_PHRASES.iter().any(|p| lowered.contains(p)) {
            scores.negative += PHRASE_BOOST;
        }

        scores
    }

    /// Turn raw totals into a verdict
    pub fn decide(scores: LexiconScores) -> SentimentVerdict {
        let LexiconScores { positive, negative } = scores;
        let sentiment = if positive > negative && positive > 0.0 {
            Sentiment::Positive
        } else if negative > positive && negative > 0.0 {
            Sentiment::Negative
        } else {
            return SentimentVerdict::new(Sentiment::Neutral, NEUTRAL_SCORE, Signal::Lexicon);
        };

        let winning = positive.max(negative);
        let denominator = positive.max(0.0) + negative.max(0.0) + 0.1;
        let score = (winning / denominator * 10.0).clamp(0.0, 10.0);
        SentimentVerdict::new(sentiment, score, Signal::Lexicon)
    }
}

/// Default sentiment classifier
pub struct SentimentClassifier {
    name: String,
    praise: RuleSet,
    context: RuleSet,
    lexicon: LexiconScorer,
}

impl SentimentClassifier {
    /// Classifier with built-in praise rules and no domain context rules
    pub fn new() -> Result<Self> {
        Self::with_name("sentiment")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            praise: praise_rules()?,
            context: RuleSet::new(RuleLayer::Context),
            lexicon: LexiconScorer::new()?,
        })
    }

    /// Add domain context rules, evaluated after praise and before the lexicon
    pub fn with_context_rules(mut self, rules: RuleSet) -> Self {
        self.context.extend(rules);
        self
    }

    pub fn context_rule_count(&self) -> usize {
        self.context.len()
    }
}

impl Classifier for SentimentClassifier {
    fn classify(&self, text: &str) -> SentimentVerdict {
        if text.trim().is_empty() {
            return SentimentVerdict::empty();
        }

        if let Some(verdict) = emoji_verdict(text) {
            return verdict;
        }

        let lowered = text.to_lowercase();
        if let Some(verdict) = self.praise.evaluate(&lowered) {
            return verdict;
        }
        if let Some(verdict) = self.context.evaluate(&lowered) {
            return verdict;
        }

        LexiconScorer::decide(self.lexicon.score(&lowered))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
