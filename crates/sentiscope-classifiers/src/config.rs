//! Configuration for the classifier layers

use crate::rules::{political_commentary, OverrideRule, RuleLayer, RuleMatcher, RuleSet};
use crate::sentiment::SentimentClassifier;
use sentiscope_core::{Error, Result, Sentiment};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClassifierConfig {
    /// Enable the built-in political commentary context rules
    #[serde(default)]
    pub political_preset: bool,

    /// Extra context rules, evaluated after the preset
    #[serde(default)]
    pub context_rules: Vec<ContextRuleSpec>,
}

/// Context rule specification (for YAML/config files)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextRuleSpec {
    pub name: String,

    #[serde(flatten)]
    pub matcher: MatcherSpec,

    pub sentiment: Sentiment,

    #[serde(default = "default_rule_score")]
    pub score: f32,
}

/// Matcher specification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherSpec {
    /// Case-insensitive regular expression
    Pattern(String),
    /// Each inner list must contribute at least one term
    AllOf(Vec<Vec<String>>),
}

fn default_rule_score() -> f32 {
    7.5
}

impl ContextRuleSpec {
    pub fn to_rule(&self) -> Result<OverrideRule> {
        let matcher = match &self.matcher {
            MatcherSpec::Pattern(pattern) => RuleMatcher::pattern(pattern)?,
            MatcherSpec::AllOf(groups) => RuleMatcher::all_of(groups)?,
        };
        Ok(OverrideRule::new(
            self.name.clone(),
            matcher,
            self.sentiment,
            self.score,
        ))
    }
}

impl ClassifierConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse classifier config: {e}")))
    }

    /// Context rules in evaluation order
    pub fn context_rules(&self) -> Result<RuleSet> {
        let mut rules = RuleSet::new(RuleLayer::Context);
        if self.political_preset {
            rules.extend(political_commentary()?);
        }
        for spec in &self.context_rules {
            rules.push(spec.to_rule()?);
        }
        Ok(rules)
    }

    /// Build the configured sentiment classifier
    pub fn build_classifier(&self) -> Result<SentimentClassifier> {
        let rules = self.context_rules()?;
        info!(
            context_rules = rules.len(),
            political_preset = self.political_preset,
            "Initializing sentiment classifier"
        );
        Ok(SentimentClassifier::new()?.with_context_rules(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, Signal};

    #[test]
    fn test_parse_yaml_rules() {
        let yaml = r#"
political_preset: false
context_rules:
  - name: neutral_anchor
    pattern: "\\banchor\\b"
    sentiment: neutral
    score: 1.0
  - name: metro_opening
    all_of:
      - ["metro"]
      - ["opening", "inaugurat"]
    sentiment: positive
"#;
        let config = ClassifierConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.context_rules.len(), 2);
        assert_eq!(config.context_rules[1].score, 7.5);

        let classifier = config.build_classifier().unwrap();
        let verdict = classifier.classify("The anchor was terrible");
        assert_eq!(verdict.sentiment, Sentiment::Neutral);
        assert_eq!(verdict.signal, Signal::ContextRule("neutral_anchor".to_string()));

        let verdict = classifier.classify("Metro inauguration next week");
        assert_eq!(verdict.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_pattern_keeps_uppercase_escapes() {
        let yaml = r#"
context_rules:
  - name: rocks
    pattern: "^\\S+ rocks$"
    sentiment: positive
  - name: no_digits
    pattern: "^[A-Z]+ \\D+$"
    sentiment: negative
"#;
        let classifier = ClassifierConfig::from_yaml(yaml).unwrap().build_classifier().unwrap();

        let verdict = classifier.classify("metro rocks");
        assert_eq!(verdict.sentiment, Sentiment::Positive);
        assert_eq!(verdict.signal, Signal::ContextRule("rocks".to_string()));

        // Whitespace inside the first token must not match \S+
        assert_ne!(
            classifier.classify("the metro rocks").signal,
            Signal::ContextRule("rocks".to_string())
        );

        let verdict = classifier.classify("ROADS are broken");
        assert_eq!(verdict.signal, Signal::ContextRule("no_digits".to_string()));
    }

    #[test]
    fn test_preset_comes_first() {
        let config = ClassifierConfig {
            political_preset: true,
            context_rules: Vec::new(),
        };
        assert_eq!(config.context_rules().unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let yaml = r#"
context_rules:
  - name: broken
    pattern: "(unclosed"
    sentiment: positive
"#;
        let config = ClassifierConfig::from_yaml(yaml).unwrap();
        assert!(matches!(config.build_classifier(), Err(Error::Config(_))));
    }
}
