pub mod header_analyzer;
pub mod keyword_analyzer;
pub mod url_analyzer;

use serde::{Deserialize, Serialize};

pub use header_analyzer::{HeaderAnalyzer, HeaderResult};
pub use keyword_analyzer::{KeywordAnalyzer, KeywordResult};
pub use url_analyzer::{UrlAnalyzer, UrlFinding};

/// One triggered heuristic and what it contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub label: String,
    pub weight: f64,
}

/// Ordered findings for one analyzed item. The score is the plain sum of
/// the weights; nothing is clamped here.
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    findings: Vec<Finding>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: impl Into<String>, weight: f64) {
        let label = label.into();
        log::debug!("{} (+{:.2})", label, weight);
        self.findings.push(Finding { label, weight });
    }

    pub fn score(&self) -> f64 {
        self.findings.iter().fold(0.0, |total, f| total + f.weight)
    }

    pub fn into_reasons(self) -> Vec<String> {
        self.findings.into_iter().map(|f| f.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_sums_in_order() {
        let mut evidence = Evidence::new();
        evidence.add("first", 0.4);
        evidence.add("second", 0.4);
        assert!((evidence.score() - 0.8).abs() < 1e-9);
        assert_eq!(evidence.into_reasons(), vec!["first", "second"]);
    }

    #[test]
    fn test_empty_evidence_scores_zero() {
        assert_eq!(Evidence::new().score(), 0.0);
    }
}
