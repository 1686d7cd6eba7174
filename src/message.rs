use crate::language::Language;
use serde::{Deserialize, Serialize};

/// One inbound inquiry as delivered by the upstream mailbox glue.
///
/// Every field is optional: the scoring pipeline coerces absent values to
/// empty string / false and never rejects a message for missing fields.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InquiryMessage {
    pub subject: Option<String>,
    pub body: Option<String>,
    /// Preview text supplied by some mail providers; used when `body` is absent.
    pub snippet: Option<String>,
    /// Display form, e.g. `"Jane Doe <jane@example.com>"`.
    pub sender: Option<String>,
    pub sender_email: Option<String>,
    pub has_attachment: Option<bool>,
}

impl InquiryMessage {
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("")
    }

    /// Body text, falling back to the snippet when the body is absent.
    pub fn text_body(&self) -> &str {
        match self.body.as_deref() {
            Some(body) if !body.is_empty() => body,
            _ => self.snippet.as_deref().unwrap_or(""),
        }
    }

    pub fn sender_email(&self) -> &str {
        self.sender_email.as_deref().unwrap_or("")
    }

    pub fn has_attachment(&self) -> bool {
        self.has_attachment.unwrap_or(false)
    }

    /// Subject and body joined the way the detectors consume them.
    pub fn full_text(&self) -> String {
        format!("{}\n{}", self.subject(), self.text_body())
    }
}

/// Final scoring verdict for one message. Immutable value object, created
/// fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub clarity: f64,
    pub intent: f64,
    pub terms: f64,
    pub reason: String,
    /// First ten matched keywords, comma-joined.
    pub keywords: String,
    pub is_spam: bool,
    pub language: Language,
}

impl ScoreBreakdown {
    /// All-zero breakdown used by the terminal pipeline exits.
    pub fn rejected(reason: String, is_spam: bool, language: Language) -> Self {
        ScoreBreakdown {
            total: 0.0,
            clarity: 0.0,
            intent: 0.0,
            terms: 0.0,
            reason,
            keywords: String::new(),
            is_spam,
            language,
        }
    }
}
