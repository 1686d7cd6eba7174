use crate::config::KeywordConfig;

/// Raw per-category sums before bonuses and clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordScores {
    pub clarity: i64,
    pub intent: i64,
    pub terms: i64,
}

struct Entry {
    word: String,
    lower: String,
    points: i64,
}

fn compile(words: &[(String, i64)]) -> Vec<Entry> {
    words
        .iter()
        .map(|(word, points)| Entry {
            word: word.clone(),
            lower: word.to_lowercase(),
            points: *points,
        })
        .collect()
}

/// Sum the points of every entry whose word occurs in `text`, recording
/// matches in table order.
fn scan(entries: &[Entry], text: &str, matched: &mut Vec<String>) -> i64 {
    let mut sum = 0;
    for entry in entries {
        if text.contains(&entry.lower) {
            sum += entry.points;
            matched.push(entry.word.clone());
        }
    }
    sum
}

/// Computes the clarity/intent/terms sub-scores from the configured point
/// tables. Matching is case-insensitive substring containment, not
/// tokenized: "order" matches inside "reorder".
pub struct KeywordScorer {
    clarity: Vec<Entry>,
    intent: Vec<Entry>,
    terms: Vec<Entry>,
    spam: Vec<Entry>,
}

impl KeywordScorer {
    pub fn new(config: &KeywordConfig) -> Self {
        KeywordScorer {
            clarity: compile(&config.product_clarity.words),
            intent: compile(&config.buying_intent.words),
            terms: compile(&config.trade_terms.words),
            spam: compile(&config.spam_keywords.words),
        }
    }

    /// Returns the three sub-scores plus every matched keyword, in category
    /// order (clarity, intent, terms) then table order. Duplicate matches
    /// across categories stay duplicated.
    pub fn score(&self, text: &str) -> (KeywordScores, Vec<String>) {
        let text = text.to_lowercase();
        let mut scores = KeywordScores::default();
        let mut matched = Vec::new();

        scores.clarity = scan(&self.clarity, &text, &mut matched);
        scores.intent = scan(&self.intent, &text, &mut matched);
        scores.terms = scan(&self.terms, &text, &mut matched);

        // Spam keywords subtract from every category, each clamped at zero
        // independently per subtraction
        for entry in self.spam.iter() {
            if text.contains(&entry.lower) {
                scores.clarity = (scores.clarity - entry.points).max(0);
                scores.intent = (scores.intent - entry.points).max(0);
                scores.terms = (scores.terms - entry.points).max(0);
            }
        }

        (scores, matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordCategory;

    fn scorer() -> KeywordScorer {
        let owned = |pairs: &[(&str, i64)]| KeywordCategory {
            words: pairs
                .iter()
                .map(|(w, p)| (w.to_string(), *p))
                .collect(),
        };
        KeywordScorer::new(&KeywordConfig {
            product_clarity: owned(&[("model", 10), ("specification", 15)]),
            buying_intent: owned(&[("purchase", 25), ("order", 20), ("quotation", 20)]),
            trade_terms: owned(&[("fob", 25), ("moq", 20), ("payment", 15)]),
            spam_keywords: owned(&[("casino", 30)]),
            bonus: Default::default(),
        })
    }

    #[test]
    fn test_category_sums() {
        let (scores, matched) = scorer().score("Purchase order with FOB terms, payment by TT");
        assert_eq!(scores.clarity, 0);
        assert_eq!(scores.intent, 45);
        assert_eq!(scores.terms, 40);
        assert_eq!(matched, vec!["purchase", "order", "fob", "payment"]);
    }

    #[test]
    fn test_substring_not_tokenized() {
        let (scores, matched) = scorer().score("we would like to reorder");
        assert_eq!(scores.intent, 20);
        assert_eq!(matched, vec!["order"]);
    }

    #[test]
    fn test_match_order_is_category_then_table_order() {
        let (_, matched) = scorer().score("quotation for model X, order via FOB");
        // clarity first, then intent in table order, then terms
        assert_eq!(matched, vec!["model", "order", "quotation", "fob"]);
    }

    #[test]
    fn test_each_keyword_counts_once() {
        let (scores, _) = scorer().score("order order order");
        assert_eq!(scores.intent, 20);
    }

    #[test]
    fn test_spam_penalty_hits_all_categories_with_floor() {
        let (scores, matched) = scorer().score("purchase a model at the casino with payment");
        // clarity 10, intent 25, terms 15, each minus 30 with floor 0
        assert_eq!(scores.clarity, 0);
        assert_eq!(scores.intent, 0);
        assert_eq!(scores.terms, 0);
        // Spam keywords are penalties, not matches
        assert_eq!(matched, vec!["model", "purchase", "payment"]);
    }

    #[test]
    fn test_empty_config_scores_zero() {
        let scorer = KeywordScorer::new(&KeywordConfig::default());
        let (scores, matched) = scorer.score("purchase order FOB quotation");
        assert_eq!(scores, KeywordScores::default());
        assert!(matched.is_empty());
    }
}
