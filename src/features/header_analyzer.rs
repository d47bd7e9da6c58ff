use super::Evidence;
use crate::domain_utils::DomainUtils;
use crate::rules::SenderPatternRules;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const REPLY_TO_MISMATCH_WEIGHT: f64 = 0.4;
const SENDER_PATTERN_WEIGHT: f64 = 0.3;
const MISSING_HEADER_WEIGHT: f64 = 0.2;

/// Headers whose absence counts against the message.
pub const AUTHENTICITY_HEADERS: [&str; 3] = ["received", "authentication-results", "dkim-signature"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderResult {
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Consistency checks over a handful of header fields. Keys are expected
/// lower-cased; any other spelling counts as absent.
///
/// Absent authenticity headers are always flagged, even for minimal but
/// legitimate header sets.
#[derive(Debug, Clone)]
pub struct HeaderAnalyzer {
    senders: SenderPatternRules,
}

impl HeaderAnalyzer {
    pub fn new(senders: SenderPatternRules) -> Self {
        Self { senders }
    }

    pub fn analyze(&self, headers: &HashMap<String, String>) -> HeaderResult {
        let mut evidence = Evidence::new();
        let from = headers.get("from");
        let reply_to = headers.get("reply-to");

        if let (Some(from), Some(reply_to)) = (from, reply_to) {
            let from_domain = DomainUtils::extract_domain(from);
            let reply_domain = DomainUtils::extract_domain(reply_to);
            if from_domain != reply_domain {
                log::debug!(
                    "Reply-To domain '{}' differs from From domain '{}'",
                    reply_domain,
                    from_domain
                );
                evidence.add("Reply-To domain mismatch", REPLY_TO_MISMATCH_WEIGHT);
            }
        }

        if let Some(from) = from {
            for pattern in self.senders.matches(from) {
                evidence.add(
                    format!("Suspicious sender pattern: {}", pattern),
                    SENDER_PATTERN_WEIGHT,
                );
            }
        }

        for header in AUTHENTICITY_HEADERS {
            if !headers.contains_key(header) {
                evidence.add(
                    format!("Missing important header: {}", header),
                    MISSING_HEADER_WEIGHT,
                );
            }
        }

        HeaderResult {
            score: evidence.score(),
            reasons: evidence.into_reasons(),
        }
    }
}

impl Default for HeaderAnalyzer {
    fn default() -> Self {
        Self::new(crate::rules::RuleSet::builtin().senders)
    }
}
