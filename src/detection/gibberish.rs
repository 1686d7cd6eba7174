use super::DetectionResult;
use lazy_static::lazy_static;
use regex::Regex;

/// Substrings that betray keyboard mashing. First hit wins.
const KEYBOARD_PATTERNS: [&str; 5] = ["qwert", "asdf", "zxcv", "12345", "abcde"];

/// Common English plus trade-correspondence vocabulary. Text with many
/// English-looking words but almost none from this list reads as word salad.
const COMMON_WORDS: [&str; 27] = [
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "has", "dear", "please", "thank", "regards", "order", "price", "shipment",
    "delivery", "payment", "product", "inquiry",
];

/// Text that is at least this fraction Hangul syllables is accepted as
/// legitimate Korean prose before any heuristic runs. Far more permissive
/// than the language detector's 0.10; dense Korean mail must never read as
/// gibberish.
const KOREAN_PASS_RATIO: f64 = 0.30;

const MIN_CONTENT_CHARS: usize = 5;

lazy_static! {
    // Runs of bare consonants/vowels that never form a syllable
    static ref JAMO_RUN: Regex = Regex::new(r"[ㄱ-ㅎㅏ-ㅣ]{3,}").unwrap();
    static ref ENGLISH_WORD: Regex = Regex::new(r"[a-zA-Z]{3,}").unwrap();
}

/// One meaninglessness heuristic: returns the points it contributes, 0 when
/// it does not fire. Keeping the rules as table rows lets each be unit
/// tested on its own and the set swapped without touching `detect`.
struct HeuristicRule {
    tag: &'static str,
    points: fn(&str) -> u32,
}

static RULES: &[HeuristicRule] = &[
    HeuristicRule {
        tag: "consecutive_jamo",
        points: jamo_run_points,
    },
    HeuristicRule {
        tag: "keyboard_pattern",
        points: keyboard_points,
    },
    HeuristicRule {
        tag: "repeated_chars",
        points: repeated_char_points,
    },
    HeuristicRule {
        tag: "excessive_special_chars",
        points: special_char_points,
    },
    HeuristicRule {
        tag: "no_meaningful_words",
        points: word_salad_points,
    },
];

fn jamo_run_points(text: &str) -> u32 {
    let runs = JAMO_RUN.find_iter(text).count() as u32;
    if runs > 0 {
        (runs * 10).min(30)
    } else {
        0
    }
}

fn keyboard_points(text: &str) -> u32 {
    let lower = text.to_lowercase();
    if KEYBOARD_PATTERNS.iter().any(|p| lower.contains(p)) {
        15
    } else {
        0
    }
}

// The regex crate has no backreferences, so repeated runs are found with a
// plain scan.
fn repeated_char_points(text: &str) -> u32 {
    let mut prev: Option<char> = None;
    let mut run = 0usize;
    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
            if run >= 5 {
                return 15;
            }
        } else {
            prev = Some(c);
            run = 1;
        }
    }
    0
}

fn special_char_points(text: &str) -> u32 {
    let total = text.chars().count().max(1);
    let special = text
        .chars()
        .filter(|&c| {
            !(c.is_alphanumeric() || c == '_' || c.is_whitespace() || is_hangul_syllable(c))
        })
        .count();
    if special as f64 / total as f64 > 0.30 {
        15
    } else {
        0
    }
}

fn word_salad_points(text: &str) -> u32 {
    let words: Vec<&str> = ENGLISH_WORD.find_iter(text).map(|m| m.as_str()).collect();
    if words.len() < 5 {
        return 0;
    }
    let known = words
        .iter()
        .filter(|w| COMMON_WORDS.contains(&w.to_lowercase().as_str()))
        .count();
    if (known as f64) / (words.len() as f64) < 0.10 {
        20
    } else {
        0
    }
}

fn is_hangul_syllable(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7A3}')
}

/// Scores how meaningless a text is. Empty input and dense Korean prose are
/// both terminal cases; everything else accumulates over the rule table.
#[derive(Debug, Default)]
pub struct GibberishDetector;

impl GibberishDetector {
    pub fn new() -> Self {
        GibberishDetector
    }

    pub fn detect(&self, text: &str) -> DetectionResult {
        let text = text.trim();
        if text.chars().count() < MIN_CONTENT_CHARS {
            return DetectionResult::new(100, vec!["empty_content"]);
        }

        let non_space = text.chars().filter(|&c| c != ' ').count().max(1);
        let syllables = text.chars().filter(|&c| is_hangul_syllable(c)).count();
        if syllables as f64 / non_space as f64 >= KOREAN_PASS_RATIO {
            return DetectionResult::clean();
        }

        let mut score = 0;
        let mut reasons = Vec::new();
        for rule in RULES {
            let points = (rule.points)(text);
            if points > 0 {
                score += points;
                reasons.push(rule.tag);
            }
        }

        DetectionResult::new(score, reasons)
    }
}
