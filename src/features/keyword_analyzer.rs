use crate::rules::KeywordRules;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordResult {
    pub score: f64,
    /// Matched phrases in table order, not text order.
    pub detected_keywords: Vec<String>,
}

/// Substring search for known phishing phrases.
#[derive(Debug, Clone)]
pub struct KeywordAnalyzer {
    rules: KeywordRules,
}

impl KeywordAnalyzer {
    pub fn new(rules: KeywordRules) -> Self {
        Self { rules }
    }

    pub fn analyze(&self, text: &str) -> KeywordResult {
        let text = text.to_lowercase();
        let mut result = KeywordResult::default();

        for (phrase, weight) in self.rules.iter() {
            if text.contains(phrase) {
                log::debug!("Keyword '{}' matched (+{:.2})", phrase, weight);
                result.score += weight;
                result.detected_keywords.push(phrase.to_string());
            }
        }

        result
    }
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new(crate::rules::RuleSet::builtin().keywords)
    }
}
