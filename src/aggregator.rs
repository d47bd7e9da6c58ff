//! Risk Aggregator
//!
//! Runs the URL, keyword and header analyzers over one message, sums their
//! scores, clamps the total to 1.0 and maps it onto a risk level with a
//! matching recommendation.

use crate::config::Config;
use crate::features::{
    HeaderAnalyzer, HeaderResult, KeywordAnalyzer, KeywordResult, UrlAnalyzer, UrlFinding,
};
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const HIGH_THRESHOLD: f64 = 0.7;
const MEDIUM_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Thresholds are inclusive lower bounds, checked from High down.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= HIGH_THRESHOLD => RiskLevel::High,
            s if s >= MEDIUM_THRESHOLD => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::High => "Block this message immediately",
            RiskLevel::Medium => "Review message carefully before taking any action",
            RiskLevel::Low => "Message appears to be legitimate but always exercise caution",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    pub url_analysis: Vec<UrlFinding>,
    pub keyword_analysis: KeywordResult,
    pub header_analysis: Option<HeaderResult>,
    pub recommendations: Vec<String>,
}

/// Holds the three analyzers over one immutable rule set. Analysis takes
/// `&self` only, so one aggregator can serve many threads.
#[derive(Debug, Clone)]
pub struct RiskAggregator {
    urls: UrlAnalyzer,
    keywords: KeywordAnalyzer,
    headers: HeaderAnalyzer,
}

impl Default for RiskAggregator {
    fn default() -> Self {
        Self::new(RuleSet::builtin())
    }
}

impl RiskAggregator {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            urls: UrlAnalyzer::new(rules.tlds),
            keywords: KeywordAnalyzer::new(rules.keywords),
            headers: HeaderAnalyzer::new(rules.senders),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(RuleSet::from_config(config)?))
    }

    /// Scores one message. Header analysis only runs when a non-empty
    /// header map is given; otherwise it contributes nothing.
    pub fn analyze(
        &self,
        message_text: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> AnalysisReport {
        let url_analysis = self.urls.analyze(message_text);
        let url_score = url_analysis
            .iter()
            .fold(0.0, |total, f| total + f.risk_score);

        let keyword_analysis = self.keywords.analyze(message_text);
        let keyword_score = keyword_analysis.score;

        let header_analysis = headers
            .filter(|h| !h.is_empty())
            .map(|h| self.headers.analyze(h));
        let header_score = header_analysis.as_ref().map_or(0.0, |h| h.score);

        let raw_total = url_score + keyword_score + header_score;
        let overall_risk_score = raw_total.min(1.0);
        let risk_level = RiskLevel::from_score(overall_risk_score);

        log::info!(
            "Analysis complete: urls={:.2} keywords={:.2} headers={:.2} raw={:.2} score={:.2} level={}",
            url_score,
            keyword_score,
            header_score,
            raw_total,
            overall_risk_score,
            risk_level
        );

        AnalysisReport {
            overall_risk_score,
            risk_level,
            url_analysis,
            keyword_analysis,
            header_analysis,
            recommendations: vec![risk_level.recommendation().to_string()],
        }
    }
}
