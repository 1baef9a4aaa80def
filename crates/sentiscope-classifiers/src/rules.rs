//! Ordered override rules
//!
//! A rule pairs a text predicate with a fixed verdict. Rule sets are
//! evaluated in order and the first match wins, which keeps
//! domain-specific overrides out of the general lexicon scorer.

use crate::classifier::{SentimentVerdict, Signal};
use aho_corasick::{AhoCorasick, MatchKind};
use regex::{Regex, RegexBuilder};
use sentiscope_core::{Error, Result, Sentiment};
use std::fmt;
use std::sync::Arc;

/// Text predicate for an override rule
#[derive(Clone)]
pub enum RuleMatcher {
    /// Regular expression match against the lowercased text
    Pattern(Regex),
    /// Every group must contribute at least one term (co-occurrence)
    AllOf(Vec<AhoCorasick>),
    /// Arbitrary predicate over the lowercased text
    Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl RuleMatcher {
    /// Case-insensitive regex; the source is compiled as written
    pub fn pattern(pattern: &str) -> Result<Self> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Self::Pattern)
            .map_err(|e| Error::config(format!("invalid rule pattern '{pattern}': {e}")))
    }

    pub fn all_of<S: AsRef<str>>(groups: &[Vec<S>]) -> Result<Self> {
        if groups.is_empty() {
            return Err(Error::config("co-occurrence rule needs at least one term group"));
        }
        let matchers = groups
            .iter()
            .map(|terms| {
                let terms: Vec<String> = terms.iter().map(|t| t.as_ref().to_lowercase()).collect();
                if terms.is_empty() {
                    return Err(Error::config("co-occurrence term group is empty"));
                }
                AhoCorasick::builder()
                    .match_kind(MatchKind::LeftmostFirst)
                    .build(&terms)
                    .map_err(|e| Error::config(format!("failed to build term matcher: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::AllOf(matchers))
    }

    fn matches(&self, lowered: &str) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(lowered),
            Self::AllOf(groups) => groups.iter().all(|g| g.is_match(lowered)),
            Self::Custom(predicate) => predicate(lowered),
        }
    }
}

impl fmt::Debug for RuleMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::AllOf(groups) => f.debug_tuple("AllOf").field(&groups.len()).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A single override rule
#[derive(Debug, Clone)]
pub struct OverrideRule {
    pub name: String,
    pub matcher: RuleMatcher,
    pub sentiment: Sentiment,
    pub score: f32,
}

impl OverrideRule {
    pub fn new(
        name: impl Into<String>,
        matcher: RuleMatcher,
        sentiment: Sentiment,
        score: f32,
    ) -> Self {
        Self {
            name: name.into(),
            matcher,
            sentiment,
            score,
        }
    }
}

/// Which signal a rule set reports when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleLayer {
    Praise,
    Context,
}

/// Ordered collection of override rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    layer: RuleLayer,
    rules: Vec<OverrideRule>,
}

impl RuleSet {
    pub fn new(layer: RuleLayer) -> Self {
        Self {
            layer,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: OverrideRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: OverrideRule) {
        self.rules.push(rule);
    }

    /// Append another set's rules after this set's rules
    pub fn extend(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First matching rule's verdict. `lowered` must already be lowercase.
    pub fn evaluate(&self, lowered: &str) -> Option<SentimentVerdict> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(lowered))
            .map(|rule| {
                let signal = match self.layer {
                    RuleLayer::Praise => Signal::Praise(rule.name.clone()),
                    RuleLayer::Context => Signal::ContextRule(rule.name.clone()),
                };
                SentimentVerdict::new(rule.sentiment, rule.score, signal)
            })
    }
}

/// Context rules tuned for regional political commentary
///
/// Co-occurrence of a rival-party term with a victory or defeat term is a
/// strong stance signal in this domain even when no lexicon word appears.
pub fn political_commentary() -> Result<RuleSet> {
    let rival = vec!["opposition", "ycp", "tdp", "rival", "ప్రతిపక్ష", "వైసీపీ", "టీడీపీ"];
    let victory = vec!["win", "victory", "won", "landslide", "గెలుపు", "విజయం", "గెలిచ"];
    let defeat = vec!["defeat", "lost", "loses", "ఓటమి", "ఓడి"];
    let leader = vec!["cm", "chief minister", "mla", "ముఖ్యమంత్రి", "ఎమ్మెల్యే"];
    let development = vec!["development", "abhivruddhi", "అభివృద్ధి"];

    Ok(RuleSet::new(RuleLayer::Context)
        .with_rule(OverrideRule::new(
            "rival_victory",
            RuleMatcher::all_of(&[rival.clone(), victory])?,
            Sentiment::Positive,
            8.0,
        ))
        .with_rule(OverrideRule::new(
            "rival_defeat",
            RuleMatcher::all_of(&[rival, defeat])?,
            Sentiment::Positive,
            7.5,
        ))
        .with_rule(OverrideRule::new(
            "leader_development",
            RuleMatcher::all_of(&[leader, development])?,
            Sentiment::Positive,
            7.5,
        )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let set = RuleSet::new(RuleLayer::Context)
            .with_rule(OverrideRule::new(
                "first",
                RuleMatcher::pattern("budget").unwrap(),
                Sentiment::Negative,
                7.0,
            ))
            .with_rule(OverrideRule::new(
                "second",
                RuleMatcher::pattern("budget").unwrap(),
                Sentiment::Positive,
                9.0,
            ));

        let verdict = set.evaluate("the budget").unwrap();
        assert_eq!(verdict.sentiment, Sentiment::Negative);
        assert_eq!(verdict.signal, Signal::ContextRule("first".to_string()));
    }

    #[test]
    fn test_co_occurrence_requires_every_group() {
        let rules = political_commentary().unwrap();
        assert!(rules.evaluate("ycp will not win this time").is_some());
        assert!(rules.evaluate("ycp rally today").is_none());
        assert!(rules.evaluate("what a victory").is_none());
    }

    #[test]
    fn test_custom_predicate() {
        let set = RuleSet::new(RuleLayer::Context).with_rule(OverrideRule::new(
            "long",
            RuleMatcher::Custom(Arc::new(|t: &str| t.len() > 10)),
            Sentiment::Neutral,
            1.0,
        ));
        assert!(set.evaluate("short").is_none());
        assert_eq!(
            set.evaluate("quite a long comment").unwrap().sentiment,
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_empty_group_rejected() {
        let groups: Vec<Vec<&str>> = vec![vec![]];
        assert!(RuleMatcher::all_of(&groups).is_err());
    }
}
