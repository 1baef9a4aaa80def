//! Built-in bilingual praise phrases (second classification layer)

use crate::rules::{OverrideRule, RuleLayer, RuleMatcher, RuleSet};
use sentiscope_core::{Result, Sentiment};

/// (name, pattern, score). Patterns run against lowercased text.
const PRAISE_PATTERNS: &[(&str, &str, f32)] = &[
    // "jai <name> garu", "<name> anna zindabad"
    (
        "honorific_salute",
        r"(?:jai|జై|long live)\s+\S+\s*(?:garu|gaaru|anna|sir|గారు|అన్న|సార్)",
        9.5,
    ),
    (
        "honorific_zindabad",
        r"\S+\s*(?:garu|anna|గారు|అన్న)\s*(?:zindabad|జిందాబాద్)",
        9.5,
    ),
    // Leading praise token
    (
        "leading_praise",
        r"^\s*(?:super|superb|hats\s*off|hatsoff|సూపర్|హ్యాట్సాఫ్|జై)(?:[\s!.,]|$)",
        8.5,
    ),
    // Admiration
    (
        "admiration",
        r"(?:great leader|true leader|well done|proud of (?:you|him|her)|keep it up|god bless|మంచి నాయకుడు|చాలా బాగుంది|గర్వంగా ఉంది)",
        8.0,
    ),
    // Gratitude addressed to someone
    (
        "gratitude",
        r"(?:thank you|thanks|ధన్యవాదాలు|థాంక్స్)\s*(?:sir|garu|anna|madam|గారు|అన్న|సార్)",
        7.5,
    ),
];

/// Praise rules in priority order
pub fn praise_rules() -> Result<RuleSet> {
    let mut set = RuleSet::new(RuleLayer::Praise);
    for (name, pattern, score) in PRAISE_PATTERNS {
        set.push(OverrideRule::new(
            *name,
            RuleMatcher::pattern(pattern)?,
            Sentiment::Positive,
            *score,
        ));
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Signal;

    fn name_of(text: &str) -> Option<String> {
        let rules = praise_rules().unwrap();
        rules
            .evaluate(&text.to_lowercase())
            .and_then(|v| match v.signal {
                Signal::Praise(name) => Some(name),
                _ => None,
            })
    }

    #[test]
    fn test_builtin_patterns_compile() {
        assert_eq!(praise_rules().unwrap().len(), PRAISE_PATTERNS.len());
    }

    #[test]
    fn test_honorific_salute() {
        assert_eq!(name_of("Jai Ramesh garu!!").as_deref(), Some("honorific_salute"));
        assert_eq!(name_of("జై రమేష్ గారు").as_deref(), Some("honorific_salute"));
    }

    #[test]
    fn test_leading_praise() {
        assert_eq!(name_of("Super speech").as_deref(), Some("leading_praise"));
        assert_eq!(name_of("hats off to the team").as_deref(), Some("leading_praise"));
        assert_eq!(name_of("సూపర్ అన్నా").as_deref(), Some("leading_praise"));
        assert_eq!(name_of("supermarket is dirty"), None);
    }

    #[test]
    fn test_gratitude_needs_addressee() {
        assert_eq!(name_of("thank you sir").as_deref(), Some("gratitude"));
        assert_eq!(name_of("thank you very much"), None);
    }
}
