//! Emoji heuristic (first classification layer)
//!
//! Comments made mostly of emoji carry little lexical signal, so emoji are
//! scored before any text pattern. Hearts, a known set of approving emoji,
//! or a burst of three or more emoji all classify as positive.

use crate::classifier::{SentimentVerdict, Signal};
use sentiscope_core::Sentiment;
use std::collections::HashMap;

const HEART_EMOJI: &[char] = &[
    '❤', '♥', '💕', '💖', '💗', '💓', '💞', '💘', '💝', '😍', '🥰', '❣', '💛', '💚', '💙', '💜',
    '🧡', '🤍', '😘',
];

const POSITIVE_EMOJI: &[char] = &[
    '🔥', '👍', '👏', '🙏', '💯', '🎉', '😊', '😀', '😃', '😄', '😁', '🙌', '💪', '⭐', '🌟', '✨',
    '👌', '🤩', '😎', '🥳', '🏆', '🎊', '☺',
];

const HEART_BASE: f32 = 8.5;
const POSITIVE_BASE: f32 = 8.0;
const BURST_BASE: f32 = 7.0;
const MAX_SCORE: f32 = 10.0;
const BURST_LEN: usize = 3;

/// Emoji statistics for one text
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmojiProfile {
    pub count: usize,
    pub hearts: usize,
    pub positives: usize,
    /// Longest run of adjacent emoji (whitespace breaks a run)
    pub longest_run: usize,
    /// Highest number of occurrences of a single emoji
    pub max_repeat: usize,
}

impl EmojiProfile {
    pub fn analyze(text: &str) -> Self {
        let mut profile = Self::default();
        let mut run = 0usize;
        let mut repeats: HashMap<char, usize> = HashMap::new();

        for c in text.chars() {
            if is_modifier(c) {
                continue;
            }
            if is_emoji(c) {
                profile.count += 1;
                run += 1;
                profile.longest_run = profile.longest_run.max(run);
                *repeats.entry(c).or_insert(0) += 1;
                if HEART_EMOJI.contains(&c) {
                    profile.hearts += 1;
                } else if POSITIVE_EMOJI.contains(&c) {
                    profile.positives += 1;
                }
            } else {
                run = 0;
            }
        }

        profile.max_repeat = repeats.values().copied().max().unwrap_or(0);
        profile
    }

    fn base_score(&self) -> Option<f32> {
        if self.hearts > 0 {
            Some(HEART_BASE)
        } else if self.positives > 0 {
            Some(POSITIVE_BASE)
        } else if self.longest_run >= BURST_LEN || self.max_repeat >= BURST_LEN {
            Some(BURST_BASE)
        } else {
            None
        }
    }
}

/// Positive verdict when the emoji profile qualifies, `None` otherwise
pub fn emoji_verdict(text: &str) -> Option<SentimentVerdict> {
    let profile = EmojiProfile::analyze(text);
    let base = profile.base_score()?;
    let extra = profile.count.saturating_sub(1) as f32;
    Some(SentimentVerdict::new(
        Sentiment::Positive,
        (base + extra).min(MAX_SCORE),
        Signal::Emoji,
    ))
}

fn is_emoji(c: char) -> bool {
    matches!(c as u32,
        0x1F300..=0x1F3FA
        | 0x1F400..=0x1F64F
        | 0x1F680..=0x1F6FF
        | 0x1F900..=0x1F9FF
        | 0x1FA70..=0x1FAFF
        | 0x2600..=0x27BF
        | 0x2B50
        | 0x2B55)
}

/// Joiners, variation selectors and skin tones attach to the previous emoji
fn is_modifier(c: char) -> bool {
    matches!(c as u32, 0x200D | 0xFE0E | 0xFE0F | 0x1F3FB..=0x1F3FF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heart_is_positive() {
        let verdict = emoji_verdict("love this ❤️").unwrap();
        assert_eq!(verdict.sentiment, Sentiment::Positive);
        assert_eq!(verdict.score, 8.5);
        assert_eq!(verdict.signal, Signal::Emoji);
    }

    #[test]
    fn test_score_scales_with_count_and_caps() {
        assert_eq!(emoji_verdict("👍👍").unwrap().score, 9.0);
        assert_eq!(emoji_verdict("🔥🔥🔥🔥🔥🔥").unwrap().score, 10.0);
    }

    #[test]
    fn test_burst_of_neutral_emoji() {
        let verdict = emoji_verdict("what 🤔🤔🤔").unwrap();
        assert_eq!(verdict.score, 9.0);

        // Spread out but repeated three times
        assert!(emoji_verdict("🤔 hmm 🤔 ok 🤔").is_some());
    }

    #[test]
    fn test_skin_tone_does_not_break_run() {
        let profile = EmojiProfile::analyze("👏🏽👏🏽");
        assert_eq!(profile.count, 2);
        assert_eq!(profile.longest_run, 2);
    }

    #[test]
    fn test_plain_text_has_no_verdict() {
        assert!(emoji_verdict("roads are broken").is_none());
        assert!(emoji_verdict("hmm 🤔").is_none());
    }
}
