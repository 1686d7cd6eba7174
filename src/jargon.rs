use crate::config::JargonConfig;
use regex::{NoExpand, Regex};

/// Rewrites Korean trade slang into canonical English terms before keyword
/// matching. Substitutions run in map-file order, and nothing stops a later
/// rule from matching text an earlier rule produced; that cascading behavior
/// is part of the contract.
pub struct JargonNormalizer {
    rules: Vec<(Regex, String)>,
}

impl JargonNormalizer {
    pub fn new(config: &JargonConfig) -> Self {
        let rules = config
            .korean_jargon
            .iter()
            .filter_map(|(ko, en)| {
                match Regex::new(&format!("(?i){}", regex::escape(ko))) {
                    Ok(regex) => Some((regex, en.clone())),
                    Err(e) => {
                        log::warn!("skipping jargon rule {ko:?}: {e}");
                        None
                    }
                }
            })
            .collect();
        JargonNormalizer { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Case-insensitive substring replacement of each jargon phrase, in
    /// rule order.
    pub fn normalize(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (regex, replacement) in &self.rules {
            out = regex
                .replace_all(&out, NoExpand(replacement.as_str()))
                .into_owned();
        }
        out
    }
}
