//! Daily sentiment trend with smoothed gap days
//!
//! Days with comments carry exact percentages. Days without comments are
//! filled by perturbing the previous day's values by up to ±5 points so the
//! line stays continuous. Filled points are flagged `observed: false`; they
//! are smoothing, not data.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use sentiscope_core::{Comment, Sentiment, SentimentShare, TrendPoint};
use std::collections::BTreeMap;

/// Maximum perturbation applied to a filled day, in points
pub const GAP_JITTER: i32 = 5;

/// Filled days keep positive + negative at or below this
pub const GAP_POLAR_CAP: u32 = 95;

#[derive(Debug, Default, Clone, Copy)]
struct DayCounts {
    positive: usize,
    neutral: usize,
    negative: usize,
}

impl DayCounts {
    fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    fn share(&self) -> SentimentShare {
        SentimentShare::from_counts(self.positive, self.neutral, self.negative)
    }
}

/// Build one point per calendar day for the `days` days ending on `now`
///
/// `baseline` seeds the gap filler until the first observed day.
pub fn build_trend<R: Rng>(
    comments: &[&Comment],
    days: u32,
    now: DateTime<Utc>,
    baseline: SentimentShare,
    rng: &mut R,
) -> Vec<TrendPoint> {
    let days = days.max(1);
    let last_day = now.date_naive();
    let first_day = last_day - Duration::days(i64::from(days) - 1);

    let mut buckets: BTreeMap<NaiveDate, DayCounts> = BTreeMap::new();
    for comment in comments {
        let day = comment.created_at.date_naive();
        if day >= first_day && day <= last_day {
            buckets.entry(day).or_default().add(comment.sentiment);
        }
    }

    let mut last = baseline;
    first_day
        .iter_days()
        .take(days as usize)
        .map(|day| {
            let (share, observed) = match buckets.get(&day) {
                Some(counts) => (counts.share(), true),
                None => (jitter(last, rng), false),
            };
            last = share;
            TrendPoint {
                date: day.format("%Y-%m-%d").to_string(),
                positive: share.positive,
                neutral: share.neutral,
                negative: share.negative,
                observed,
            }
        })
        .collect()
}

/// Perturb a share by ±[`GAP_JITTER`], clamp, and cap the polar total
pub fn jitter<R: Rng>(last: SentimentShare, rng: &mut R) -> SentimentShare {
    let mut nudge = |value: u32| {
        let delta = rng.gen_range(-GAP_JITTER..=GAP_JITTER);
        (value as i32 + delta).clamp(0, 100) as u32
    };
    let mut positive = nudge(last.positive);
    let mut negative = nudge(last.negative);

    let polar = positive + negative;
    if polar > GAP_POLAR_CAP {
        let scale = f64::from(GAP_POLAR_CAP) / f64::from(polar);
        positive = (f64::from(positive) * scale).floor() as u32;
        negative = (f64::from(negative) * scale).floor() as u32;
    }

    SentimentShare::from_percentages(positive, negative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sentiscope_core::{Language, Platform, RawComment, RecordKind};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 18, 0, 0).unwrap()
    }

    fn comment(days_ago: i64, sentiment: Sentiment) -> Comment {
        let raw = RawComment {
            platform: Platform::YouTube,
            external_id: format!("{days_ago}"),
            user_name: "u".to_string(),
            user_id: None,
            text: "t".to_string(),
            language: Language::English,
            engagement_score: 0,
            created_at: now() - Duration::days(days_ago),
            source_url: String::new(),
            record: RecordKind::Comment,
        };
        let mut comment = Comment::from_raw("q", raw);
        comment.sentiment = sentiment;
        comment
    }

    #[test]
    fn test_one_point_per_day_ending_today() {
        let mut rng = StdRng::seed_from_u64(7);
        let trend = build_trend(&[], 30, now(), SentimentShare::from_percentages(50, 20), &mut rng);

        assert_eq!(trend.len(), 30);
        assert_eq!(trend.first().unwrap().date, "2024-06-01");
        assert_eq!(trend.last().unwrap().date, "2024-06-30");
        assert!(trend.iter().all(|p| !p.observed));
    }

    #[test]
    fn test_observed_days_are_exact() {
        let comments = vec![
            comment(0, Sentiment::Positive),
            comment(0, Sentiment::Positive),
            comment(0, Sentiment::Negative),
            comment(0, Sentiment::Neutral),
            comment(2, Sentiment::Negative),
            // Outside a 7-day window
            comment(10, Sentiment::Positive),
        ];
        let refs: Vec<&Comment> = comments.iter().collect();
        let mut rng = StdRng::seed_from_u64(1);
        let trend = build_trend(&refs, 7, now(), SentimentShare::default(), &mut rng);

        assert_eq!(trend.len(), 7);
        let today = trend.last().unwrap();
        assert!(today.observed);
        assert_eq!((today.positive, today.neutral, today.negative), (50, 25, 25));

        let two_days_ago = &trend[4];
        assert!(two_days_ago.observed);
        assert_eq!(two_days_ago.negative, 100);
        assert_eq!(trend.iter().filter(|p| p.observed).count(), 2);
    }

    #[test]
    fn test_gap_days_stay_near_previous_day() {
        let comments = vec![comment(5, Sentiment::Positive)];
        let refs: Vec<&Comment> = comments.iter().collect();
        let mut rng = StdRng::seed_from_u64(99);
        let trend = build_trend(&refs, 6, now(), SentimentShare::default(), &mut rng);

        assert!(trend[0].observed);
        for pair in trend.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            assert!((prev.positive as i32 - next.positive as i32).abs() <= GAP_JITTER * 3);
            assert!(next.positive + next.negative <= GAP_POLAR_CAP);
        }
    }

    proptest! {
        #[test]
        fn prop_jitter_stays_valid(
            positive in 0u32..=100,
            negative in 0u32..=100,
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let last = SentimentShare::from_percentages(positive, negative);
            let next = jitter(last, &mut rng);
            prop_assert_eq!(next.total(), 100);
            prop_assert!(next.positive + next.negative <= GAP_POLAR_CAP);
        }
    }
}
