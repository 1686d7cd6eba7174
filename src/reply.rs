use crate::config::{ReplyBackend, ReplyConfig};
use crate::language::Language;
use crate::message::InquiryMessage;
use anyhow::{anyhow, Context};
use serde::Serialize;
use serde_json::json;

/// A suggested reply for a scored inquiry. Consumes only the message
/// surface (subject, body, sender); it never feeds back into scoring.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyDraft {
    pub subject: String,
    pub body: String,
    pub language: Language,
    pub sender_name: String,
    pub key_points: Vec<String>,
    pub tone: String,
}

/// What the counterparty is asking for, as far as templates care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplyIntent {
    Order,
    Quotation,
    Inquiry,
}

impl ReplyIntent {
    fn as_str(&self) -> &'static str {
        match self {
            ReplyIntent::Order => "order",
            ReplyIntent::Quotation => "quotation",
            ReplyIntent::Inquiry => "inquiry",
        }
    }
}

const ORDER_CUES: [&str; 6] = ["order", "po", "purchase", "발주", "주문", "proforma"];
const QUOTATION_CUES: [&str; 6] = ["quote", "quotation", "price", "견적", "단가", "cost"];

fn detect_intent(subject: &str, body: &str) -> ReplyIntent {
    let text = format!("{subject} {body}").to_lowercase();
    if ORDER_CUES.iter().any(|cue| text.contains(cue)) {
        ReplyIntent::Order
    } else if QUOTATION_CUES.iter().any(|cue| text.contains(cue)) {
        ReplyIntent::Quotation
    } else {
        ReplyIntent::Inquiry
    }
}

/// `"Jane Doe <jane@example.com>"` → `"Jane Doe"`, with a neutral fallback
/// for bare addresses and empty senders.
fn extract_sender_name(sender: &str) -> String {
    let name = sender.split('<').next().unwrap_or("").trim();
    let name = name.trim_matches(|c| c == '"' || c == '\'').trim();
    if name.is_empty() || name.contains('@') {
        "Sir/Madam".to_string()
    } else {
        name.to_string()
    }
}

/// Reply drafting only needs to pick between Korean and everything else.
fn reply_language(text: &str) -> Language {
    let total = text.chars().filter(|&c| c != ' ').count();
    if total == 0 {
        return Language::En;
    }
    let syllables = text
        .chars()
        .filter(|c| matches!(c, '\u{AC00}'..='\u{D7A3}'))
        .count();
    if syllables as f64 / total as f64 > 0.10 {
        Language::Ko
    } else {
        Language::En
    }
}

const KO_INQUIRY: &str = "안녕하세요,\n\n보내주신 문의사항('{subject}')은 현재 담당부서에서 상세히 검토 중에 있습니다.\n\n내용 확인이 완료되는 대로 신속히 추가 답변 드리겠습니다.\n\n감사합니다,\n해외영업팀 드림";
const KO_QUOTATION: &str = "안녕하세요,\n\n요청하신 견적 관련 문의에 감사드립니다.\n\n검토 후 정식 견적서를 송부해 드리겠습니다.\n추가 문의사항이 있으시면 말씀해 주세요.\n\n감사합니다,\n해외영업팀 드림";
const KO_ORDER: &str = "안녕하세요,\n\n발주 관련 문의에 감사드립니다.\n\n말씀하신 내용을 확인하여 빠른 시일 내에\nProforma Invoice와 함께 상세 회신 드리겠습니다.\n\n감사합니다,\n해외영업팀 드림";

const EN_INQUIRY: &str = "Dear {sender_name},\n\nThank you for your inquiry regarding '{subject}'.\n\nWe are currently reviewing your request in detail and will get back to you shortly with more information.\n\nBest regards,\nExport Sales Team";
const EN_QUOTATION: &str = "Dear {sender_name},\n\nThank you for your interest in our products.\n\nWe are preparing a formal quotation based on your requirements and will send it to you soon.\n\nPlease feel free to contact us if you have any questions.\n\nBest regards,\nExport Sales Team";
const EN_ORDER: &str = "Dear {sender_name},\n\nThank you for your purchase order inquiry.\n\nWe are reviewing the details and will send you a Proforma Invoice along with our confirmation shortly.\n\nBest regards,\nExport Sales Team";

/// Fixed-template drafting, the degraded mode used when no generation
/// service is configured.
#[derive(Debug, Default)]
pub struct TemplateDrafter;

impl TemplateDrafter {
    pub fn draft(&self, message: &InquiryMessage) -> ReplyDraft {
        let subject = message.subject();
        let body = message.text_body();
        let sender_name = extract_sender_name(message.sender.as_deref().unwrap_or(""));
        let language = reply_language(&format!("{subject} {body}"));
        let intent = detect_intent(subject, body);

        let template = match (language, intent) {
            (Language::Ko, ReplyIntent::Order) => KO_ORDER,
            (Language::Ko, ReplyIntent::Quotation) => KO_QUOTATION,
            (Language::Ko, _) => KO_INQUIRY,
            (_, ReplyIntent::Order) => EN_ORDER,
            (_, ReplyIntent::Quotation) => EN_QUOTATION,
            (_, _) => EN_INQUIRY,
        };

        let short_subject: String = subject.chars().take(50).collect();
        let body = template
            .replace("{sender_name}", &sender_name)
            .replace("{subject}", &short_subject);

        ReplyDraft {
            subject: format!("Re: {subject}"),
            body,
            language,
            sender_name,
            key_points: vec![intent.as_str().to_string()],
            tone: "formal".to_string(),
        }
    }
}

/// Drafting through an OpenAI-compatible chat completions endpoint.
pub struct RemoteDrafter {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl RemoteDrafter {
    pub fn new(config: &ReplyConfig) -> Self {
        RemoteDrafter {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    async fn draft(&self, message: &InquiryMessage) -> anyhow::Result<ReplyDraft> {
        let subject = message.subject();
        let body = message.text_body();
        let sender_name = extract_sender_name(message.sender.as_deref().unwrap_or(""));
        let language = reply_language(&format!("{subject} {body}"));
        let intent = detect_intent(subject, body);

        let lang_instruction = match language {
            Language::Ko => "in Korean",
            _ => "in English",
        };
        let truncated_body: String = body.chars().take(1500).collect();
        let prompt = format!(
            "You are a professional export sales representative. \
             Generate a polite and professional reply email {lang_instruction}.\n\n\
             Original Email:\nSubject: {subject}\nContent: {truncated_body}\n\n\
             Requirements:\n\
             1. Acknowledge receipt of their inquiry\n\
             2. Mention that you are reviewing their request\n\
             3. Promise a detailed follow-up soon\n\
             4. Keep it concise (under 150 words)\n\
             5. Do NOT include email headers, just the body text\n\
             6. Start with an appropriate greeting using the sender name: {sender_name}\n\n\
             Return ONLY the email body text, nothing else."
        );

        let request = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0.7,
            "max_tokens": 500,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("reply generation request failed")?
            .error_for_status()
            .context("reply generation service returned an error")?;

        let payload: serde_json::Value = response
            .json()
            .await
            .context("reply generation response was not JSON")?;
        let reply_body = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("reply generation response missing content"))?
            .trim()
            .to_string();

        Ok(ReplyDraft {
            subject: format!("Re: {subject}"),
            body: reply_body,
            language,
            sender_name,
            key_points: vec![intent.as_str().to_string()],
            tone: "formal".to_string(),
        })
    }
}

/// Reply-draft capability, selected once at construction and never switched
/// mid-run. `Template` is the self-contained degraded mode; `Remote` calls
/// an external generation service and falls back to the template output if
/// the call fails.
pub enum ReplyEngine {
    Template(TemplateDrafter),
    Remote(RemoteDrafter),
}

impl ReplyEngine {
    pub fn from_config(config: &ReplyConfig) -> Self {
        match config.backend {
            ReplyBackend::Remote if !config.api_key.is_empty() => {
                log::info!("reply drafting via remote service ({})", config.model);
                ReplyEngine::Remote(RemoteDrafter::new(config))
            }
            ReplyBackend::Remote => {
                log::warn!("remote reply backend selected but no api key set, using templates");
                ReplyEngine::Template(TemplateDrafter)
            }
            ReplyBackend::Template => ReplyEngine::Template(TemplateDrafter),
        }
    }

    pub fn is_template_only(&self) -> bool {
        matches!(self, ReplyEngine::Template(_))
    }

    pub async fn draft(&self, message: &InquiryMessage) -> ReplyDraft {
        match self {
            ReplyEngine::Template(drafter) => drafter.draft(message),
            ReplyEngine::Remote(drafter) => match drafter.draft(message).await {
                Ok(draft) => draft,
                Err(e) => {
                    log::error!("remote reply drafting failed, using template: {e:#}");
                    TemplateDrafter.draft(message)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(subject: &str, body: &str, sender: &str) -> InquiryMessage {
        InquiryMessage {
            subject: Some(subject.to_string()),
            body: Some(body.to_string()),
            sender: Some(sender.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_sender_name_extraction() {
        assert_eq!(
            extract_sender_name("Jane Doe <jane@example.com>"),
            "Jane Doe"
        );
        assert_eq!(
            extract_sender_name("\"Kim Chulsoo\" <kim@example.kr>"),
            "Kim Chulsoo"
        );
        assert_eq!(extract_sender_name("jane@example.com"), "Sir/Madam");
        assert_eq!(extract_sender_name(""), "Sir/Madam");
    }

    #[test]
    fn test_intent_detection() {
        assert_eq!(
            detect_intent("Purchase order", "see attached PO"),
            ReplyIntent::Order
        );
        assert_eq!(
            detect_intent("Question", "please quote your best price"),
            ReplyIntent::Quotation
        );
        assert_eq!(
            detect_intent("Hello", "introducing our company"),
            ReplyIntent::Inquiry
        );
        // Korean cues work without jargon normalization
        assert_eq!(detect_intent("견적 요청", ""), ReplyIntent::Quotation);
    }

    #[test]
    fn test_template_reply_english_quotation() {
        let draft = TemplateDrafter.draft(&message(
            "Price inquiry for LED bulbs",
            "Could you quote 500 units?",
            "Jane Doe <jane@example.com>",
        ));
        assert_eq!(draft.subject, "Re: Price inquiry for LED bulbs");
        assert_eq!(draft.language, Language::En);
        assert!(draft.body.starts_with("Dear Jane Doe,"));
        assert!(draft.body.contains("formal quotation"));
        assert_eq!(draft.key_points, vec!["quotation"]);
        assert_eq!(draft.tone, "formal");
    }

    #[test]
    fn test_template_reply_korean_order() {
        let draft = TemplateDrafter.draft(&message(
            "발주 문의드립니다",
            "납기와 함께 Proforma Invoice 부탁드립니다.",
            "kim@example.kr",
        ));
        assert_eq!(draft.language, Language::Ko);
        assert!(draft.body.contains("발주 관련 문의에 감사드립니다"));
        assert_eq!(draft.key_points, vec!["order"]);
    }

    #[test]
    fn test_template_subject_interpolation_truncates() {
        let long_subject = "x".repeat(80);
        let draft = TemplateDrafter.draft(&message(&long_subject, "hello there", "a <a@b.com>"));
        // Quoted subject inside the body is capped at 50 characters
        assert!(draft.body.contains(&"x".repeat(50)));
        assert!(!draft.body.contains(&"x".repeat(51)));
        // The reply subject keeps the full original
        assert_eq!(draft.subject, format!("Re: {long_subject}"));
    }

    #[test]
    fn test_engine_selection() {
        let engine = ReplyEngine::from_config(&ReplyConfig::default());
        assert!(engine.is_template_only());

        let remote_without_key = ReplyConfig {
            backend: ReplyBackend::Remote,
            ..Default::default()
        };
        assert!(ReplyEngine::from_config(&remote_without_key).is_template_only());

        let remote = ReplyConfig {
            backend: ReplyBackend::Remote,
            api_key: "sk-test".to_string(),
            ..Default::default()
        };
        assert!(!ReplyEngine::from_config(&remote).is_template_only());
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_template() {
        let config = ReplyConfig {
            backend: ReplyBackend::Remote,
            endpoint: "http://127.0.0.1:9".to_string(),
            api_key: "sk-test".to_string(),
            ..Default::default()
        };
        let engine = ReplyEngine::from_config(&config);
        let draft = engine
            .draft(&message("Price inquiry", "please quote", "Jane <j@e.com>"))
            .await;
        // Unreachable endpoint degrades to the template output
        assert!(draft.body.contains("Best regards"));
        assert_eq!(draft.key_points, vec!["quotation"]);
    }
}
