use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

/// Deserialize a JSON object into a vector of pairs, keeping the order the
/// entries appear in the file. Keyword matching and jargon substitution are
/// both order-dependent, so a plain `HashMap` would change results between
/// runs.
fn ordered_pairs<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct PairsVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of string keys to values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry()? {
                pairs.push((key, value));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor(PhantomData))
}

/// One keyword category: word → points, in file order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeywordCategory {
    #[serde(deserialize_with = "ordered_pairs")]
    pub words: Vec<(String, i64)>,
}

/// Flat bonus adjustments applied by the aggregator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BonusConfig {
    pub thread_reply: i64,
    pub has_attachment: i64,
}

impl Default for BonusConfig {
    fn default() -> Self {
        BonusConfig {
            thread_reply: 20,
            has_attachment: 10,
        }
    }
}

/// Keyword point tables, loaded once at analyzer construction and never
/// mutated afterwards. A missing or unreadable file degrades to the empty
/// table (keyword sub-scores all come out 0) instead of failing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub product_clarity: KeywordCategory,
    pub buying_intent: KeywordCategory,
    pub trade_terms: KeywordCategory,
    pub spam_keywords: KeywordCategory,
    pub bonus: BonusConfig,
}

impl KeywordConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        load_or_empty(path.as_ref(), "keyword config")
    }
}

/// Korean trade slang → canonical English terms, in file order. Same
/// load-or-empty contract as the keyword table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JargonConfig {
    #[serde(deserialize_with = "ordered_pairs")]
    pub korean_jargon: Vec<(String, String)>,
}

impl JargonConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        load_or_empty(path.as_ref(), "jargon map")
    }
}

fn load_or_empty<T: Default + for<'de> Deserialize<'de>>(path: &Path, what: &str) -> T {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!(
                "{} not readable at {}: {e} - continuing with empty table",
                what,
                path.display()
            );
            return T::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!(
                "{} at {} is not valid JSON: {e} - continuing with empty table",
                what,
                path.display()
            );
            T::default()
        }
    }
}

/// Which backend drafts reply suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyBackend {
    Template,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    pub backend: ReplyBackend,
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        ReplyConfig {
            backend: ReplyBackend::Template,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
        }
    }
}

/// Top-level engine settings (YAML). Points at the keyword/jargon tables
/// and sizes the worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub keywords_path: String,
    pub jargon_path: String,
    pub pool_capacity: usize,
    pub reply: ReplyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            keywords_path: "config/keywords.json".to_string(),
            jargon_path: "config/jargon_map.json".to_string(),
            pool_capacity: crate::pool::DEFAULT_POOL_CAPACITY,
            reply: ReplyConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load engine settings. A missing file falls back to defaults; a file
    /// that exists but does not parse is a hard error so a typo cannot
    /// silently change behavior.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(
                "engine config {} not found, using defaults",
                path.display()
            );
            return Ok(EngineConfig::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
