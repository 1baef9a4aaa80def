//! Deterministic sample data for platforms without credentials
//!
//! Output depends only on (platform, keyword, timeperiod) and the anchor
//! time, so a repeated search over the same anchor yields the same
//! comments. A small recurring author pool makes influencer ranking
//! meaningful on sample data too.

use crate::collector::{CollectorSource, FetchRequest, PlatformCollector};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sentiscope_classifiers::detect_language;
use sentiscope_core::{Platform, RawComment, RecordKind, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

const MIN_COMMENTS: usize = 18;
const MAX_COMMENTS: usize = 36;

/// `{kw}` is replaced with the search keyword
const ENGLISH_TEMPLATES: &[&str] = &[
    "Great work on {kw}, the new roads are excellent",
    "Thank you for the update on {kw}, really helpful",
    "Superb progress on {kw} this month",
    "{kw} has improved a lot, very happy with the hospital services",
    "Hats off to the team behind {kw}",
    "Water supply is still a problem, {kw} did nothing for our area",
    "Very disappointed with {kw}, the drainage is terrible",
    "{kw} is a waste of public money",
    "No jobs, no development, {kw} is a failure",
    "Schools near us still lack teachers despite {kw}",
    "When will the {kw} meeting be held?",
    "Watching the {kw} announcement today",
    "Any details on the {kw} budget?",
    "Shared the {kw} video with my family",
    "❤️❤️❤️",
    "👏👏👏 {kw}",
];

const TELUGU_TEMPLATES: &[&str] = &[
    "{kw} చాలా బాగుంది, రోడ్లు బాగున్నాయి",
    "సూపర్ {kw} పని",
    "ధన్యవాదాలు సార్, {kw} వల్ల మంచి జరిగింది",
    "{kw} వల్ల నీరు రావడం లేదు, చాలా సమస్య",
    "{kw} ఆసుపత్రి సేవలు దారుణం",
    "{kw} సమావేశం ఎప్పుడు?",
    "జై {kw}",
    "{kw} గురించి వార్తలు చూశాను",
];

/// Recurring authors, mixed scripts
const AUTHORS: &[&str] = &[
    "Ravi Kumar",
    "Lakshmi Devi",
    "Suresh Reddy",
    "Anita Sharma",
    "Venkat Rao",
    "Priya Nair",
    "Kiran",
    "Madhavi Latha",
    "Arjun Varma",
    "Sunitha",
    "Mohammed Irfan",
    "Deepika Rani",
];

/// Share of comments drawn from the Telugu templates
const TELUGU_RATIO: f64 = 0.3;

/// Sample data generator standing in for one platform
pub struct SampleCollector {
    platform: Platform,
    anchor: Option<DateTime<Utc>>,
}

impl SampleCollector {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            anchor: None,
        }
    }

    /// Fix the "now" timestamps are generated against
    pub fn with_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = Some(anchor);
        self
    }

    fn seed(&self, request: &FetchRequest) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.platform.key().as_bytes());
        hasher.update(b"|");
        hasher.update(request.keyword.trim().to_lowercase().as_bytes());
        hasher.update(b"|");
        hasher.update(request.timeperiod_days.to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Generate the sample comment set for a request
    pub fn generate(&self, request: &FetchRequest) -> Vec<RawComment> {
        let mut rng = StdRng::seed_from_u64(self.seed(request));
        let anchor = self.anchor.unwrap_or_else(Utc::now);
        let keyword = request.keyword.trim();
        let span_minutes = i64::from(request.lookback_days().max(1)) * 24 * 60;
        let count = rng.gen_range(MIN_COMMENTS..=MAX_COMMENTS);
        let prefix = self.platform.key();

        (0..count)
            .map(|index| {
                let template = if rng.gen_bool(TELUGU_RATIO) {
                    pick(&mut rng, TELUGU_TEMPLATES)
                } else {
                    pick(&mut rng, ENGLISH_TEMPLATES)
                };
                let author = pick(&mut rng, AUTHORS);
                let age = Duration::minutes(rng.gen_range(0..span_minutes));
                let external_id = format!("sample_{prefix}_{index:03}");
                let text = template.replace("{kw}", keyword);

                RawComment {
                    platform: self.platform.clone(),
                    source_url: sample_url(&self.platform, &external_id),
                    external_id,
                    user_name: author.to_string(),
                    user_id: Some(format!("{prefix}_{}", handle(author))),
                    language: detect_language(&text),
                    text,
                    engagement_score: rng.gen_range(0..120),
                    created_at: anchor.checked_sub_signed(age).unwrap_or(anchor),
                    record: RecordKind::Comment,
                }
            })
            .collect()
    }
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn handle(name: &str) -> String {
    name.split_whitespace().collect::<String>().to_lowercase()
}

fn sample_url(platform: &Platform, id: &str) -> String {
    match platform {
        Platform::YouTube => format!("https://www.youtube.com/watch?v={id}"),
        Platform::Twitter => format!("https://twitter.com/i/status/{id}"),
        Platform::Facebook => format!("https://www.facebook.com/{id}"),
        Platform::Instagram => format!("https://www.instagram.com/p/{id}"),
        Platform::Other(name) => format!("https://example.invalid/{}/{id}", name.to_lowercase()),
    }
}

#[async_trait]
impl PlatformCollector for SampleCollector {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawComment>> {
        // Title search targets one concrete video, which sample data cannot supply
        if request.video_title_search {
            return Ok(Vec::new());
        }
        let comments = self.generate(request);
        debug!(platform = %self.platform, count = comments.len(), "Generated sample comments");
        Ok(comments)
    }

    fn platform(&self) -> Platform {
        self.platform.clone()
    }

    fn source(&self) -> CollectorSource {
        CollectorSource::Sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_generation_is_deterministic() {
        let collector = SampleCollector::new(Platform::YouTube).with_anchor(anchor());
        let request = FetchRequest::new("Water Board", 7);
        assert_eq!(collector.generate(&request), collector.generate(&request));
    }

    #[test]
    fn test_inputs_change_output() {
        let anchor = anchor();
        let yt = SampleCollector::new(Platform::YouTube).with_anchor(anchor);
        let tw = SampleCollector::new(Platform::Twitter).with_anchor(anchor);
        let request = FetchRequest::new("water", 7);
        assert_ne!(yt.generate(&request), tw.generate(&request));
        assert_ne!(
            yt.generate(&request),
            yt.generate(&FetchRequest::new("water", 30))
        );
    }

    #[test]
    fn test_shape_of_sample_data() {
        let collector = SampleCollector::new(Platform::Facebook).with_anchor(anchor());
        let comments = collector.generate(&FetchRequest::new("roads", 10));

        assert!((MIN_COMMENTS..=MAX_COMMENTS).contains(&comments.len()));
        let earliest = anchor() - Duration::days(10);
        assert!(comments
            .iter()
            .all(|c| c.created_at <= anchor() && c.created_at > earliest));
        assert!(comments.iter().all(|c| c.text.contains("roads") || !c.text.contains("{kw}")));

        let ids: HashSet<_> = comments.iter().map(|c| &c.external_id).collect();
        assert_eq!(ids.len(), comments.len());

        // 18+ comments over 12 authors guarantees a repeat
        let authors: HashSet<_> = comments.iter().map(|c| &c.user_name).collect();
        assert!(authors.len() < comments.len());
    }

    #[test]
    fn test_language_follows_text() {
        let collector = SampleCollector::new(Platform::YouTube).with_anchor(anchor());
        let comments = collector.generate(&FetchRequest::new("water", 30));
        assert!(comments.iter().all(|c| c.language == detect_language(&c.text)));
    }

    #[test]
    fn test_huge_timeperiod_stays_in_range() {
        let collector = SampleCollector::new(Platform::Instagram).with_anchor(anchor());
        let comments = collector.generate(&FetchRequest::new("water", 200_000_000));

        let earliest = anchor() - Duration::days(i64::from(crate::collector::MAX_TIMEPERIOD_DAYS));
        assert!(!comments.is_empty());
        assert!(comments
            .iter()
            .all(|c| c.created_at <= anchor() && c.created_at >= earliest));
    }

    #[tokio::test]
    async fn test_title_search_yields_nothing() {
        let collector = SampleCollector::new(Platform::YouTube);
        let request = FetchRequest::new("Budget speech", 7).with_video_title_search(true);
        assert!(collector.fetch(&request).await.unwrap().is_empty());
    }
}
