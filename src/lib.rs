pub mod aggregator;
pub mod config;
pub mod domain_utils;
pub mod features;
pub mod message;
pub mod report;
pub mod rules;

pub use aggregator::{AnalysisReport, RiskAggregator, RiskLevel};
pub use config::{Config, KeywordRule};
pub use features::{Finding, HeaderResult, KeywordResult, UrlFinding};
pub use message::ParsedMessage;
pub use rules::{KeywordRules, RuleSet, SenderPatternRules, TldRules};
