use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rule tables driving the three analyzers.
///
/// The defaults are the compiled-in tables. A YAML file may list any subset
/// of the three tables; omitted ones keep their built-in contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_keywords")]
    pub keywords: Vec<KeywordRule>,
    #[serde(default = "default_suspicious_tlds")]
    pub suspicious_tlds: Vec<String>,
    #[serde(default = "default_sender_patterns")]
    pub sender_patterns: Vec<String>,
}

/// A phrase and the weight it adds when found in the message text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub phrase: String,
    pub weight: f64,
}

impl KeywordRule {
    pub fn new(phrase: &str, weight: f64) -> Self {
        Self {
            phrase: phrase.to_string(),
            weight,
        }
    }
}

fn default_keywords() -> Vec<KeywordRule> {
    vec![
        // General phishing language
        KeywordRule::new("urgent", 0.3),
        KeywordRule::new("account suspended", 0.4),
        KeywordRule::new("verify your account", 0.4),
        KeywordRule::new("login attempt", 0.3),
        KeywordRule::new("unusual activity", 0.3),
        KeywordRule::new("password expired", 0.4),
        KeywordRule::new("security alert", 0.3),
        KeywordRule::new("click here", 0.2),
        KeywordRule::new("confirm identity", 0.4),
        KeywordRule::new("unusual login", 0.3),
        KeywordRule::new("limited time", 0.2),
        KeywordRule::new("account closure", 0.4),
        KeywordRule::new("suspicious activity", 0.4),
        // Marketplace payment scams
        KeywordRule::new("external payment", 0.8),
        KeywordRule::new("paypal only", 0.7),
        KeywordRule::new("western union", 0.8),
        KeywordRule::new("direct payment", 0.7),
        KeywordRule::new("contact outside", 0.6),
        KeywordRule::new("whatsapp", 0.5),
        KeywordRule::new("telegram", 0.5),
        KeywordRule::new("bonus offer", 0.4),
        KeywordRule::new("special promotion", 0.4),
        KeywordRule::new("fiverr support team", 0.5),
        KeywordRule::new("account verification required", 0.6),
        KeywordRule::new("order completed", 0.4),
        KeywordRule::new("payment pending", 0.4),
        KeywordRule::new("urgent payment", 0.6),
        KeywordRule::new("refund processing", 0.5),
        KeywordRule::new("additional fee", 0.5),
        KeywordRule::new("cryptocurrency", 0.7),
        KeywordRule::new("bitcoin payment", 0.8),
        KeywordRule::new("private email", 0.6),
        KeywordRule::new("skype chat", 0.5),
    ]
}

fn default_suspicious_tlds() -> Vec<String> {
    [
        // Free registrations, heavily abused
        ".tk", ".ml", ".ga", ".cf", ".gq",
        ".zip", ".review", ".country", ".kim", ".science",
        ".work", ".party", ".gdn", ".stream", ".download",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_sender_patterns() -> Vec<String> {
    [
        r"^\d+@",
        r"[a-zA-Z0-9]+\d{4,}@",
        r"security[_-]?alert",
        r"account[_-]?verify",
        r"support[_-]?\d+",
        r"fiverr[._-]?support\d*@",
        r"fiverr[._-]?security@",
        r"fiverr[._-]?payment@",
        r"fiverr[._-]?verify@",
        r"fiverr[._-]?team@",
        r"admin[._-]?fiverr@",
        r"support[._-]?team[._-]?\d*@",
        r"verification[._-]?team@",
        r"payment[._-]?support@",
        r"account[._-]?security@",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keywords: default_keywords(),
            suspicious_tlds: default_suspicious_tlds(),
            sender_patterns: default_sender_patterns(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config '{}': {}", path, e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config '{}': {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Checks table contents that serde cannot express. Regex syntax is
    /// checked later, when the sender patterns are compiled.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for rule in &self.keywords {
            if rule.phrase.trim().is_empty() {
                anyhow::bail!("Keyword phrase must not be empty");
            }
            if !rule.weight.is_finite() || !(0.0..=1.0).contains(&rule.weight) {
                anyhow::bail!(
                    "Keyword '{}' has weight {} outside [0, 1]",
                    rule.phrase,
                    rule.weight
                );
            }
            if !seen.insert(rule.phrase.to_lowercase()) {
                anyhow::bail!("Duplicate keyword phrase '{}'", rule.phrase);
            }
        }

        if self.suspicious_tlds.iter().any(|tld| tld.trim().is_empty()) {
            anyhow::bail!("Suspicious TLD suffix must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.keywords.len(), 33);
        assert_eq!(config.suspicious_tlds.len(), 15);
        assert_eq!(config.sender_patterns.len(), 15);
        assert_eq!(config.keywords[0], KeywordRule::new("urgent", 0.3));
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let mut config = Config::default();
        config.keywords.push(KeywordRule::new("gift card", 1.5));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gift card"));

        let mut config = Config::default();
        config.keywords.push(KeywordRule::new("gift card", f64::NAN));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_and_empty_entries() {
        let mut config = Config::default();
        config.keywords.push(KeywordRule::new("URGENT", 0.1));
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.keywords.push(KeywordRule::new("  ", 0.1));
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.suspicious_tlds.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "phish-scorer-config-{}.yaml",
            std::process::id()
        ));
        let path = path.to_string_lossy().to_string();

        let config = Config::default();
        config.to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_keeps_builtin_tables() {
        let yaml = "keywords:\n  - phrase: gift card\n    weight: 0.5\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.keywords, vec![KeywordRule::new("gift card", 0.5)]);
        assert_eq!(config.suspicious_tlds, Config::default().suspicious_tlds);
        assert_eq!(config.sender_patterns, Config::default().sender_patterns);
    }

    #[test]
    fn test_from_file_reports_missing_path() {
        let err = Config::from_file("/nonexistent/phish-scorer.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/phish-scorer.yaml"));
    }
}
