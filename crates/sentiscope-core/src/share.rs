//! Sentiment percentage triples that always sum to 100

use serde::{Deserialize, Serialize};

/// Positive/neutral/negative percentages
///
/// Positive and negative are rounded independently and neutral takes the
/// remainder. When both round up past 100 the larger side absorbs the
/// excess, so a non-empty share always sums to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SentimentShare {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentShare {
    /// Build from raw counts. An empty set yields all zeros.
    pub fn from_counts(positive: usize, neutral: usize, negative: usize) -> Self {
        let total = positive + neutral + negative;
        if total == 0 {
            return Self::default();
        }
        let pct = |count: usize| (count as f64 * 100.0 / total as f64).round() as u32;
        Self::from_percentages(pct(positive), pct(negative))
    }

    /// Build from already-rounded positive and negative percentages
    pub fn from_percentages(positive: u32, negative: u32) -> Self {
        let mut positive = positive.min(100);
        let mut negative = negative.min(100);
        let overflow = (positive + negative).saturating_sub(100);
        if overflow > 0 {
            if positive >= negative {
                positive -= overflow;
            } else {
                negative -= overflow;
            }
        }
        Self {
            positive,
            neutral: 100 - positive - negative,
            negative,
        }
    }

    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_split() {
        let share = SentimentShare::from_counts(12, 5, 3);
        assert_eq!(
            share,
            SentimentShare {
                positive: 60,
                neutral: 25,
                negative: 15
            }
        );
    }

    #[test]
    fn test_thirds_sum_to_hundred() {
        let share = SentimentShare::from_counts(1, 1, 1);
        assert_eq!(share.positive, 33);
        assert_eq!(share.negative, 33);
        assert_eq!(share.neutral, 34);
    }

    #[test]
    fn test_double_round_up_is_reconciled() {
        // 0.5% and 99.5% both round up
        let share = SentimentShare::from_counts(1, 0, 199);
        assert_eq!(share.total(), 100);
        assert_eq!(share.neutral, 0);
        assert_eq!(share.positive, 1);
        assert_eq!(share.negative, 99);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(SentimentShare::from_counts(0, 0, 0).total(), 0);
    }

    proptest! {
        #[test]
        fn prop_non_empty_share_sums_to_hundred(p in 0usize..500, n in 0usize..500, q in 0usize..500) {
            prop_assume!(p + n + q > 0);
            let share = SentimentShare::from_counts(p, n, q);
            prop_assert_eq!(share.total(), 100);
        }

        #[test]
        fn prop_percentages_never_exceed_hundred(p in 0u32..150, n in 0u32..150) {
            let share = SentimentShare::from_percentages(p, n);
            prop_assert_eq!(share.total(), 100);
        }
    }
}
