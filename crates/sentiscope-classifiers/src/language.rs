//! Script-based language detection

use sentiscope_core::Language;

const TELUGU_BLOCK: std::ops::RangeInclusive<char> = '\u{0C00}'..='\u{0C7F}';

/// Telugu if any character falls in the Telugu block, English otherwise
pub fn detect_language(text: &str) -> Language {
    if text.chars().any(|c| TELUGU_BLOCK.contains(&c)) {
        Language::Telugu
    } else {
        Language::English
    }
}
