pub mod analyzer;
pub mod config;
pub mod detection;
pub mod jargon;
pub mod keywords;
pub mod language;
pub mod message;
pub mod pool;
pub mod reply;

pub use analyzer::InquiryAnalyzer;
pub use config::{EngineConfig, JargonConfig, KeywordConfig};
pub use detection::DetectionResult;
pub use language::{Language, LanguageDetector};
pub use message::{InquiryMessage, ScoreBreakdown};
pub use pool::AnalyzerPool;
pub use reply::{ReplyDraft, ReplyEngine};
