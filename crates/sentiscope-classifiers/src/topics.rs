//! Keyword-based topic tagger
//!
//! Each category owns English and Telugu keywords. Telugu matches report
//! the English category name so distributions merge across languages.

use aho_corasick::AhoCorasick;
use sentiscope_core::{Comment, Error, Language, Result, Sentiment};

/// Fallback topic when nothing matches
pub const GENERAL_TOPIC: &str = "general";
pub const APPRECIATION_TOPIC: &str = "appreciation";
pub const COMPLAINTS_TOPIC: &str = "complaints";

struct CategorySpec {
    name: &'static str,
    english: &'static [&'static str],
    telugu: &'static [&'static str],
}

const CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        name: "infrastructure",
        english: &["road", "bridge", "highway", "flyover", "electricity", "power cut", "transport", "metro", "drainage"],
        telugu: &["రోడ్డు", "రోడ్లు", "వంతెన", "కరెంట్", "విద్యుత్", "రహదారి"],
    },
    CategorySpec {
        name: "water",
        english: &["water", "drinking water", "irrigation", "reservoir", "pipeline", "tank"],
        telugu: &["నీరు", "నీళ్ళు", "నీటి", "తాగునీరు", "సాగునీరు"],
    },
    CategorySpec {
        name: "education",
        english: &["school", "college", "education", "teacher", "student", "university", "scholarship"],
        telugu: &["పాఠశాల", "బడి", "విద్య", "కళాశాల", "విద్యార్థి", "టీచర్"],
    },
    CategorySpec {
        name: "healthcare",
        english: &["hospital", "health", "doctor", "medical", "medicine", "clinic", "ambulance"],
        telugu: &["ఆసుపత్రి", "వైద్య", "డాక్టర్", "ఆరోగ్య", "మందులు"],
    },
    CategorySpec {
        name: "agriculture",
        english: &["farmer", "farming", "crop", "agriculture", "harvest", "fertilizer", "seeds"],
        telugu: &["రైతు", "పంట", "వ్యవసాయ", "ఎరువు", "విత్తన"],
    },
    CategorySpec {
        name: "employment",
        english: &["job", "employment", "unemployment", "salary", "wages", "recruitment", "hiring"],
        telugu: &["ఉద్యోగ", "ఉపాధి", "నిరుద్యోగ", "జీతం"],
    },
    CategorySpec {
        name: "governance",
        english: &["government", "minister", "policy", "scheme", "corruption", "officials", "administration", "election"],
        telugu: &["ప్రభుత్వ", "మంత్రి", "పథకం", "అవినీతి", "అధికారులు", "ఎన్నికలు"],
    },
    CategorySpec {
        name: "development",
        english: &["development", "project", "progress", "investment", "industry", "construction"],
        telugu: &["అభివృద్ధి", "ప్రాజెక్ట్", "పెట్టుబడి", "పరిశ్రమ", "నిర్మాణం"],
    },
];

const GRATITUDE_TERMS: &[&str] = &["thank", "grateful", "appreciate", "ధన్యవాదాలు", "థాంక్స్", "కృతజ్ఞత"];
const COMPLAINT_TERMS: &[&str] = &[
    "complaint", "complain", "problem", "issue", "not working", "worst", "pathetic", "no response",
    "సమస్య", "ఫిర్యాదు", "పని చేయడం లేదు",
];

struct Category {
    name: &'static str,
    english: AhoCorasick,
    telugu: AhoCorasick,
}

/// Assigns topic tags to comment text
pub struct TopicTagger {
    categories: Vec<Category>,
    gratitude: AhoCorasick,
    complaints: AhoCorasick,
}

fn matcher(terms: &[&str], label: &str) -> Result<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(terms)
        .map_err(|e| Error::config(format!("Failed to build {label} topic matcher: {e}")))
}

impl TopicTagger {
    pub fn new() -> Result<Self> {
        let categories = CATEGORIES
            .iter()
            .map(|spec| {
                Ok(Category {
                    name: spec.name,
                    english: matcher(spec.english, spec.name)?,
                    telugu: matcher(spec.telugu, spec.name)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            categories,
            gratitude: matcher(GRATITUDE_TERMS, "gratitude")?,
            complaints: matcher(COMPLAINT_TERMS, "complaint")?,
        })
    }

    /// Topics for a text; never empty
    ///
    /// Telugu text is also checked against English keywords since mixed
    /// script comments are common.
    pub fn extract_topics(&self, text: &str, language: Language, sentiment: Sentiment) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut topics: Vec<String> = Vec::new();

        for category in &self.categories {
            let hit = category.english.is_match(&lowered)
                || (language == Language::Telugu && category.telugu.is_match(&lowered));
            if hit {
                topics.push(category.name.to_string());
            }
        }

        if sentiment == Sentiment::Positive && self.gratitude.is_match(&lowered) {
            topics.push(APPRECIATION_TOPIC.to_string());
        }
        if sentiment == Sentiment::Negative && self.complaints.is_match(&lowered) {
            topics.push(COMPLAINTS_TOPIC.to_string());
        }

        if topics.is_empty() {
            topics.push(GENERAL_TOPIC.to_string());
        }
        topics
    }

    /// Tag a comment in place. Comments that already carry topics are left
    /// untouched, so tagging twice is a no-op.
    pub fn tag(&self, comment: &mut Comment) {
        if !comment.topics.is_empty() {
            return;
        }
        comment.topics = self.extract_topics(&comment.text, comment.language, comment.sentiment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagger() -> TopicTagger {
        TopicTagger::new().unwrap()
    }

    #[test]
    fn test_english_categories() {
        let topics = tagger().extract_topics(
            "New hospital and roads near the school",
            Language::English,
            Sentiment::Neutral,
        );
        assert_eq!(topics, vec!["infrastructure", "education", "healthcare"]);
    }

    #[test]
    fn test_telugu_maps_to_english_names() {
        let topics = tagger().extract_topics("రైతులకు నీరు లేదు", Language::Telugu, Sentiment::Neutral);
        assert_eq!(topics, vec!["water", "agriculture"]);
    }

    #[test]
    fn test_sentiment_dependent_topics() {
        let t = tagger();
        let positive = t.extract_topics("thank you for this", Language::English, Sentiment::Positive);
        assert_eq!(positive, vec!["appreciation"]);

        // Gratitude without positive sentiment does not count
        let neutral = t.extract_topics("thank you for this", Language::English, Sentiment::Neutral);
        assert_eq!(neutral, vec!["general"]);

        let negative = t.extract_topics("same problem every day", Language::English, Sentiment::Negative);
        assert_eq!(negative, vec!["complaints"]);
    }

    #[test]
    fn test_fallback_to_general() {
        let topics = tagger().extract_topics("ok", Language::English, Sentiment::Neutral);
        assert_eq!(topics, vec![GENERAL_TOPIC]);
    }
}
