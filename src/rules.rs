//! Compiled rule tables.
//!
//! Each table is built once from a [`Config`] and never mutated afterwards,
//! so a single [`RuleSet`] can be shared by any number of concurrent
//! analyses.

use crate::config::Config;
use regex::{Regex, RegexBuilder};

/// Phrase table for the keyword analyzer, in definition order.
#[derive(Debug, Clone)]
pub struct KeywordRules {
    entries: Vec<(String, f64)>,
}

impl KeywordRules {
    /// Phrases are lower-cased because matching runs on lower-cased text.
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(phrase, weight)| (phrase.to_lowercase(), weight))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(p, w)| (p.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Suspicious top-level-domain suffixes such as `.tk`.
#[derive(Debug, Clone)]
pub struct TldRules {
    suffixes: Vec<String>,
}

impl TldRules {
    pub fn new(suffixes: Vec<String>) -> Self {
        Self {
            suffixes: suffixes.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Every suffix the host ends with. Overlapping suffixes all count.
    pub fn matches<'a>(&'a self, host: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.suffixes
            .iter()
            .filter(move |suffix| host.ends_with(suffix.as_str()))
            .map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }
}

/// Case-insensitive regex signatures of spoofed or throwaway sender addresses.
#[derive(Debug, Clone)]
pub struct SenderPatternRules {
    patterns: Vec<(String, Regex)>,
}

impl SenderPatternRules {
    pub fn new(patterns: &[String]) -> anyhow::Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| anyhow::anyhow!("Invalid regex pattern '{}': {}", pattern, e))?;
            compiled.push((pattern.clone(), regex));
        }
        Ok(Self { patterns: compiled })
    }

    /// Source text of every pattern found in `address`, in table order.
    pub fn matches<'a>(&'a self, address: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.patterns
            .iter()
            .filter(move |(_, regex)| regex.is_match(address))
            .map(|(source, _)| source.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// The three tables together, as handed to the analyzers.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub keywords: KeywordRules,
    pub tlds: TldRules,
    pub senders: SenderPatternRules,
}

impl RuleSet {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;
        let rules = Self {
            keywords: KeywordRules::new(
                config
                    .keywords
                    .iter()
                    .map(|rule| (rule.phrase.clone(), rule.weight))
                    .collect(),
            ),
            tlds: TldRules::new(config.suspicious_tlds.clone()),
            senders: SenderPatternRules::new(&config.sender_patterns)?,
        };
        log::debug!(
            "Compiled rule set: {} keywords, {} TLD suffixes, {} sender patterns",
            rules.keywords.len(),
            rules.tlds.len(),
            rules.senders.len()
        );
        Ok(rules)
    }

    /// The built-in tables. These are known to compile.
    pub fn builtin() -> Self {
        Self::from_config(&Config::default()).expect("built-in rule tables compile")
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordRule;

    #[test]
    fn test_keyword_phrases_lowercased_in_order() {
        let rules = KeywordRules::new(vec![
            ("Click Here".to_string(), 0.2),
            ("urgent".to_string(), 0.3),
        ]);
        let phrases: Vec<&str> = rules.iter().map(|(p, _)| p).collect();
        assert_eq!(phrases, vec!["click here", "urgent"]);
    }

    #[test]
    fn test_overlapping_tld_suffixes_all_match() {
        let rules = TldRules::new(vec![".tk".to_string(), "k".to_string(), ".ml".to_string()]);
        let matched: Vec<&str> = rules.matches("pay.tk").collect();
        assert_eq!(matched, vec![".tk", "k"]);
    }

    #[test]
    fn test_sender_patterns_case_insensitive() {
        let rules = SenderPatternRules::new(&[r"security[_-]?alert".to_string()]).unwrap();
        assert_eq!(rules.matches("SECURITY-ALERT@bank.com").count(), 1);
        assert_eq!(rules.matches("alice@bank.com").count(), 0);
    }

    #[test]
    fn test_invalid_sender_pattern_is_reported() {
        let err = SenderPatternRules::new(&["(unclosed".to_string()]).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_from_config_validates_tables() {
        let mut config = Config::default();
        config.keywords.push(KeywordRule::new("refund", -0.1));
        assert!(RuleSet::from_config(&config).is_err());

        let builtin = RuleSet::builtin();
        assert_eq!(builtin.keywords.len(), 33);
        assert_eq!(builtin.tlds.len(), 15);
        assert_eq!(builtin.senders.len(), 15);
    }
}
