use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the pipeline scores. Anything outside Korean/English is
/// routed to `Other` and skipped by the keyword stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "KO")]
    Ko,
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "OTHER")]
    Other,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ko => "KO",
            Language::En => "EN",
            Language::Other => "OTHER",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const KOREAN_THRESHOLD: f64 = 0.10;
const CHINESE_THRESHOLD: f64 = 0.10;
const JAPANESE_THRESHOLD: f64 = 0.05;

pub struct LanguageDetector;

impl LanguageDetector {
    /// Classify text by character-class ratios over the non-whitespace
    /// count. Pure function, no configuration.
    pub fn detect(text: &str) -> Language {
        let total = text.chars().filter(|c| !c.is_whitespace()).count();
        if total == 0 {
            return Language::En;
        }
        let total = total as f64;

        let korean = text.chars().filter(|&c| Self::is_korean(c)).count() as f64;
        if korean / total > KOREAN_THRESHOLD {
            return Language::Ko;
        }

        let chinese = text.chars().filter(|&c| Self::is_chinese(c)).count() as f64;
        if chinese / total > CHINESE_THRESHOLD {
            return Language::Other;
        }

        let japanese = text.chars().filter(|&c| Self::is_japanese_kana(c)).count() as f64;
        if japanese / total > JAPANESE_THRESHOLD {
            return Language::Other;
        }

        Language::En
    }

    fn is_korean(c: char) -> bool {
        // Hangul Syllables: U+AC00–U+D7A3
        // Hangul Compatibility Jamo (consonants and vowels): U+3131–U+3163
        matches!(c, '\u{AC00}'..='\u{D7A3}' | '\u{3131}'..='\u{3163}')
    }

    fn is_chinese(c: char) -> bool {
        // CJK Unified Ideographs: U+4E00–U+9FFF
        matches!(c, '\u{4E00}'..='\u{9FFF}')
    }

    fn is_japanese_kana(c: char) -> bool {
        // Hiragana: U+3040–U+309F
        // Katakana: U+30A0–U+30FF
        matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}')
    }
}
