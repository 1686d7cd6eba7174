use super::DetectionResult;
use crate::message::InquiryMessage;
use lazy_static::lazy_static;
use regex::Regex;

/// One spam rule: pattern, points, tag. Every matching rule adds.
struct SpamPattern {
    regex: Regex,
    tag: &'static str,
    points: u32,
}

fn pattern(source: &str, tag: &'static str, points: u32) -> SpamPattern {
    SpamPattern {
        // Table literals are fixed at compile time, a bad one is a bug
        regex: Regex::new(source).unwrap(),
        tag,
        points,
    }
}

lazy_static! {
    static ref SPAM_PATTERNS: Vec<SpamPattern> = vec![
        pattern(r"(?i)you\s*(have\s*)?won", "lottery_scam", 30),
        pattern(r"(?i)claim\s*(your\s*)?(prize|reward)", "prize_scam", 30),
        pattern(r"(?i)click\s*here", "click_bait", 20),
        pattern(r"(?i)act\s*now", "urgency_scam", 20),
        pattern(r"(?i)100%\s*(free|guaranteed)", "over_promise", 25),
        pattern(r"(?i)unsubscribe", "newsletter", 15),
        pattern(r"(?i)nigerian?\s*prince", "nigerian_scam", 50),
    ];
}

/// TLDs with abuse rates high enough that any sender from them is penalized.
const SUSPICIOUS_TLDS: [&str; 7] = [".xyz", ".tk", ".ml", ".ga", ".cf", ".gq", ".buzz"];

const SUSPICIOUS_DOMAIN_POINTS: u32 = 25;
const ALL_CAPS_SUBJECT_POINTS: u32 = 15;
const EXCESSIVE_EXCLAMATION_POINTS: u32 = 10;

/// Scores malicious/promotional intent. The score is seeded with the
/// gibberish score for the same message, so sub-threshold gibberish signal
/// carries forward into the spam decision.
#[derive(Debug, Default)]
pub struct SpamDetector;

impl SpamDetector {
    pub fn new() -> Self {
        SpamDetector
    }

    pub fn detect(
        &self,
        message: &InquiryMessage,
        text: &str,
        gibberish_score: u32,
    ) -> DetectionResult {
        let mut score = gibberish_score;
        let mut reasons = Vec::new();

        for rule in SPAM_PATTERNS.iter() {
            if rule.regex.is_match(text) {
                score += rule.points;
                reasons.push(rule.tag);
            }
        }

        let sender = message.sender_email().to_lowercase();
        if SUSPICIOUS_TLDS.iter().any(|tld| sender.ends_with(tld)) {
            score += SUSPICIOUS_DOMAIN_POINTS;
            reasons.push("suspicious_domain");
        }

        let subject = message.subject();
        if is_all_caps(subject) && subject.chars().count() > 10 {
            score += ALL_CAPS_SUBJECT_POINTS;
            reasons.push("all_caps_subject");
        }
        if subject.matches('!').count() > 3 {
            score += EXCESSIVE_EXCLAMATION_POINTS;
            reasons.push("excessive_exclamation");
        }

        DetectionResult::new(score, reasons)
    }
}

/// At least one cased letter and none of them lowercase.
fn is_all_caps(text: &str) -> bool {
    text.chars().any(|c| c.is_uppercase()) && !text.chars().any(|c| c.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(subject: &str, sender_email: &str) -> InquiryMessage {
        InquiryMessage {
            subject: Some(subject.to_string()),
            sender_email: Some(sender_email.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_text_scores_zero() {
        let detector = SpamDetector::new();
        let msg = message("Quotation request", "buyer@example.com");
        let result = detector.detect(&msg, "Please send your FOB price for 500 units.", 0);
        assert_eq!(result.score, 0);
        assert!(!result.flagged);
    }

    #[test]
    fn test_pattern_points_accumulate() {
        let detector = SpamDetector::new();
        let msg = InquiryMessage::default();
        // lottery_scam (30) + click_bait (20)
        let result = detector.detect(&msg, "You have won! Click here to collect.", 0);
        assert_eq!(result.score, 50);
        assert!(result.flagged);
        assert_eq!(result.reasons, vec!["lottery_scam", "click_bait"]);
    }

    #[test]
    fn test_gibberish_score_seeds_spam_score() {
        let detector = SpamDetector::new();
        let msg = InquiryMessage::default();
        let without_seed = detector.detect(&msg, "please unsubscribe me", 0);
        assert_eq!(without_seed.score, 15);
        assert!(!without_seed.flagged);

        // The same text tips over the threshold with a sub-flag gibberish score
        let with_seed = detector.detect(&msg, "please unsubscribe me", 35);
        assert_eq!(with_seed.score, 50);
        assert!(with_seed.flagged);
    }

    #[test]
    fn test_monotone_in_matched_patterns() {
        let detector = SpamDetector::new();
        let msg = InquiryMessage::default();
        let base = detector.detect(&msg, "act now", 0).score;
        let more = detector.detect(&msg, "act now and claim your prize", 0).score;
        assert!(more >= base);
    }

    #[test]
    fn test_suspicious_sender_domain() {
        let detector = SpamDetector::new();
        let msg = message("hello there", "winner@lottery.xyz");
        let result = detector.detect(&msg, "ordinary text", 0);
        assert_eq!(result.score, 25);
        assert_eq!(result.reasons, vec!["suspicious_domain"]);

        let msg = message("hello there", "Buyer@Company.TK");
        let result = detector.detect(&msg, "ordinary text", 0);
        assert_eq!(result.reasons, vec!["suspicious_domain"]);
    }

    #[test]
    fn test_all_caps_subject_needs_length() {
        let detector = SpamDetector::new();
        let long = message("URGENT BUSINESS OFFER", "a@example.com");
        let result = detector.detect(&long, "", 0);
        assert!(result.reasons.contains(&"all_caps_subject"));

        // Ten characters or fewer is exempt
        let short = message("URGENT", "a@example.com");
        let result = detector.detect(&short, "", 0);
        assert!(!result.reasons.contains(&"all_caps_subject"));

        let mixed = message("Urgent business offer today", "a@example.com");
        let result = detector.detect(&mixed, "", 0);
        assert!(!result.reasons.contains(&"all_caps_subject"));
    }

    #[test]
    fn test_excessive_exclamation() {
        let detector = SpamDetector::new();
        let msg = message("Deal!!!!", "a@example.com");
        let result = detector.detect(&msg, "", 0);
        assert!(result.reasons.contains(&"excessive_exclamation"));

        let msg = message("Deal!!!", "a@example.com");
        let result = detector.detect(&msg, "", 0);
        assert!(!result.reasons.contains(&"excessive_exclamation"));
    }

    #[test]
    fn test_lottery_scam_message_flags() {
        let detector = SpamDetector::new();
        let msg = message(
            "CONGRATULATIONS!!! YOU WON $1,000,000!!!",
            "winner@lottery.xyz",
        );
        let text = "CONGRATULATIONS!!! YOU WON $1,000,000!!!\nClick here NOW!!!";
        let result = detector.detect(&msg, text, 0);
        // lottery_scam + click_bait + suspicious_domain + all_caps + exclamations
        assert!(result.score >= 50);
        assert!(result.flagged);
        assert!(result.reasons.contains(&"lottery_scam"));
        assert!(result.reasons.contains(&"suspicious_domain"));
    }
}
