use crate::config::{BonusConfig, JargonConfig, KeywordConfig};
use crate::detection::gibberish::GibberishDetector;
use crate::detection::spam::SpamDetector;
use crate::jargon::JargonNormalizer;
use crate::keywords::KeywordScorer;
use crate::language::{Language, LanguageDetector};
use crate::message::{InquiryMessage, ScoreBreakdown};
use std::path::Path;

/// Category weights. Buying intent dominates, trade terms second, product
/// clarity last. Must sum to exactly 1.0.
pub const CLARITY_WEIGHT: f64 = 0.15;
pub const INTENT_WEIGHT: f64 = 0.50;
pub const TERMS_WEIGHT: f64 = 0.35;

/// How many spam tags the rejection reason carries at most.
const MAX_SPAM_REASON_TAGS: usize = 3;
/// How many matched keywords the reason text quotes.
const REASON_KEYWORDS: usize = 5;
/// How many matched keywords the breakdown field carries.
const BREAKDOWN_KEYWORDS: usize = 10;

/// The scoring pipeline for one inquiry: language gate, gibberish gate,
/// jargon normalization, spam gate, keyword scoring, weighted aggregation.
/// All configuration is loaded once at construction; `calculate_score` is
/// pure and safe to call from any number of threads.
pub struct InquiryAnalyzer {
    gibberish: GibberishDetector,
    spam: SpamDetector,
    jargon: JargonNormalizer,
    keywords: KeywordScorer,
    bonus: BonusConfig,
}

impl InquiryAnalyzer {
    pub fn new(keywords: KeywordConfig, jargon: JargonConfig) -> Self {
        InquiryAnalyzer {
            gibberish: GibberishDetector::new(),
            spam: SpamDetector::new(),
            jargon: JargonNormalizer::new(&jargon),
            keywords: KeywordScorer::new(&keywords),
            bonus: keywords.bonus.clone(),
        }
    }

    /// Build from the external table files, degrading to empty tables when
    /// either is missing.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(keywords_path: P, jargon_path: Q) -> Self {
        let keywords = KeywordConfig::load(keywords_path);
        let jargon = JargonConfig::load(jargon_path);
        log::info!(
            "analyzer ready: {} clarity / {} intent / {} terms keywords, {} jargon rules",
            keywords.product_clarity.words.len(),
            keywords.buying_intent.words.len(),
            keywords.trade_terms.words.len(),
            jargon.korean_jargon.len()
        );
        Self::new(keywords, jargon)
    }

    /// Score one message. Always returns a breakdown, never an error: bad
    /// input degrades to zero scores with a reason, it does not raise.
    pub fn calculate_score(&self, message: &InquiryMessage) -> ScoreBreakdown {
        let full_text = message.full_text();

        let language = LanguageDetector::detect(&full_text);
        if language == Language::Other {
            return ScoreBreakdown::rejected(
                "unsupported language (KO/EN only)".to_string(),
                false,
                language,
            );
        }

        let gibberish = self.gibberish.detect(&full_text);
        if gibberish.flagged {
            log::debug!(
                "message rejected as gibberish (score {}): {:?}",
                gibberish.score,
                gibberish.reasons
            );
            return ScoreBreakdown::rejected(
                format!("meaningless content: {}", gibberish.reasons.join(", ")),
                true,
                language,
            );
        }

        let analysis_text = if language == Language::Ko {
            self.jargon.normalize(&full_text)
        } else {
            full_text
        };

        let spam = self.spam.detect(message, &analysis_text, gibberish.score);
        if spam.flagged {
            log::debug!(
                "message rejected as spam (score {}): {:?}",
                spam.score,
                spam.reasons
            );
            let tags: Vec<&str> = spam.reasons.iter().take(MAX_SPAM_REASON_TAGS).copied().collect();
            return ScoreBreakdown::rejected(
                format!("flagged as spam: {}", tags.join(", ")),
                true,
                language,
            );
        }

        let (mut scores, matched) = self.keywords.score(&analysis_text);

        // Thread replies and attachments both signal an engaged counterparty
        let subject = message.subject().to_lowercase();
        if subject.starts_with("re:") || subject.starts_with("fwd:") {
            scores.intent += self.bonus.thread_reply;
        }
        if message.has_attachment() {
            scores.intent += self.bonus.has_attachment;
        }

        let clarity = clamp_score(scores.clarity);
        let intent = clamp_score(scores.intent);
        let terms = clamp_score(scores.terms);

        let total = round1(clarity * CLARITY_WEIGHT + intent * INTENT_WEIGHT + terms * TERMS_WEIGHT);

        ScoreBreakdown {
            total,
            clarity,
            intent,
            terms,
            reason: generate_reason(clarity, intent, terms, &matched),
            keywords: matched
                .iter()
                .take(BREAKDOWN_KEYWORDS)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            is_spam: false,
            language,
        }
    }
}

fn clamp_score(value: i64) -> f64 {
    value.clamp(0, 100) as f64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Tiered natural-language justification for the scores.
fn generate_reason(clarity: f64, intent: f64, terms: f64, matched: &[String]) -> String {
    let mut parts: Vec<String> = Vec::new();

    if intent >= 70.0 {
        parts.push("strong purchase intent".to_string());
    } else if intent >= 40.0 {
        parts.push("moderate purchase intent".to_string());
    } else {
        parts.push("unclear intent".to_string());
    }

    if terms >= 60.0 {
        parts.push("concrete trade terms given".to_string());
    } else if terms >= 30.0 {
        parts.push("some trade terms mentioned".to_string());
    }

    if clarity >= 50.0 {
        parts.push("detailed product spec".to_string());
    } else if clarity >= 25.0 {
        parts.push("basic product info".to_string());
    }

    if !matched.is_empty() {
        let head: Vec<&str> = matched
            .iter()
            .take(REASON_KEYWORDS)
            .map(String::as_str)
            .collect();
        parts.push(format!("key terms: {}", head.join(", ")));
    }

    if parts.is_empty() {
        "needs further analysis".to_string()
    } else {
        parts.join(" | ")
    }
}
