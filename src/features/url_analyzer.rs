use super::Evidence;
use crate::domain_utils::DomainUtils;
use crate::rules::TldRules;
use regex::Regex;
use serde::{Deserialize, Serialize};

const SUSPICIOUS_TLD_WEIGHT: f64 = 0.4;
const IP_HOST_WEIGHT: f64 = 0.5;
const MANY_SUBDOMAINS_WEIGHT: f64 = 0.3;
const ENCODED_CHARS_WEIGHT: f64 = 0.3;

/// Risk assessment of a single URL occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlFinding {
    pub url: String,
    pub risk_score: f64,
    pub reasons: Vec<String>,
}

/// Pulls http(s) URLs out of free text and scores their structure.
#[derive(Debug, Clone)]
pub struct UrlAnalyzer {
    url_regex: Regex,
    ipv4_regex: Regex,
    tlds: TldRules,
}

impl UrlAnalyzer {
    pub fn new(tlds: TldRules) -> Self {
        Self {
            // Letters, digits, the ASCII run from `$` to `_`, a few extra
            // punctuation marks, and percent escapes.
            url_regex: Regex::new(r"https?://(?:[a-zA-Z0-9$-_@.&+!*\\(),]|%[0-9a-fA-F]{2})+")
                .unwrap(),
            ipv4_regex: Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+$").unwrap(),
            tlds,
        }
    }

    /// Every URL in `text`, in order of appearance. Repeats are kept.
    pub fn extract_urls<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.url_regex.find_iter(text).map(|m| m.as_str()).collect()
    }

    pub fn analyze(&self, text: &str) -> Vec<UrlFinding> {
        self.extract_urls(text)
            .into_iter()
            .map(|url| self.score_url(url))
            .collect()
    }

    pub fn score_url(&self, url: &str) -> UrlFinding {
        let mut evidence = Evidence::new();
        let host = DomainUtils::url_host(url);
        let host_lower = host.to_lowercase();

        for tld in self.tlds.matches(&host_lower) {
            evidence.add(format!("Suspicious TLD: {}", tld), SUSPICIOUS_TLD_WEIGHT);
        }

        if self.ipv4_regex.is_match(host) {
            evidence.add("IP address used instead of domain name", IP_HOST_WEIGHT);
        }

        if DomainUtils::dot_count(host) > 2 {
            evidence.add("Multiple subdomains detected", MANY_SUBDOMAINS_WEIGHT);
        }

        if url.contains('%') {
            evidence.add("URL contains encoded characters", ENCODED_CHARS_WEIGHT);
        }

        let risk_score = evidence.score();
        log::debug!("URL {} scored {:.2}", url, risk_score);

        UrlFinding {
            url: url.to_string(),
            risk_score,
            reasons: evidence.into_reasons(),
        }
    }
}

impl Default for UrlAnalyzer {
    fn default() -> Self {
        Self::new(crate::rules::RuleSet::builtin().tlds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_extracts_urls_in_order_with_repeats() {
        let analyzer = UrlAnalyzer::default();
        let text = "see https://a.com/x and http://b.org, then https://a.com/x again";
        assert_eq!(
            analyzer.extract_urls(text),
            vec!["https://a.com/x", "http://b.org,", "https://a.com/x"]
        );
    }

    #[test]
    fn test_url_stops_at_characters_outside_the_grammar() {
        let analyzer = UrlAnalyzer::default();
        let urls = analyzer.extract_urls("go <http://x.com/a#frag> \"https://y.com/b\"");
        assert_eq!(urls, vec!["http://x.com/a", "https://y.com/b"]);
    }

    #[test]
    fn test_no_urls_yields_empty() {
        let analyzer = UrlAnalyzer::default();
        assert!(analyzer.analyze("nothing to see here, ftp://old.site").is_empty());
        assert!(analyzer.analyze("").is_empty());
    }

    #[test]
    fn test_suspicious_tld_case_insensitive() {
        let analyzer = UrlAnalyzer::default();
        let finding = analyzer.score_url("http://PAY.TK/login");
        assert!(approx(finding.risk_score, 0.4));
        assert_eq!(finding.reasons, vec!["Suspicious TLD: .tk"]);
    }

    #[test]
    fn test_each_overlapping_suffix_counts() {
        let analyzer = UrlAnalyzer::new(TldRules::new(vec![
            ".tk".to_string(),
            "tk".to_string(),
        ]));
        let finding = analyzer.score_url("http://pay.tk/");
        assert!(approx(finding.risk_score, 0.8));
        assert_eq!(finding.reasons.len(), 2);
    }

    #[test]
    fn test_ip_address_host() {
        let analyzer = UrlAnalyzer::default();
        let finding = analyzer.score_url("http://192.168.10.5/admin");
        // Three dots also trips the subdomain rule.
        assert!(approx(finding.risk_score, 0.8));
        assert_eq!(
            finding.reasons,
            vec![
                "IP address used instead of domain name",
                "Multiple subdomains detected"
            ]
        );

        let with_port = analyzer.score_url("http://192.168.10.5:8080/admin");
        assert!(!with_port
            .reasons
            .contains(&"IP address used instead of domain name".to_string()));
    }

    #[test]
    fn test_subdomain_threshold() {
        let analyzer = UrlAnalyzer::default();
        assert!(approx(analyzer.score_url("https://www.example.com/").risk_score, 0.0));
        let finding = analyzer.score_url("https://login.secure.example.com/");
        assert!(approx(finding.risk_score, 0.3));
        assert_eq!(finding.reasons, vec!["Multiple subdomains detected"]);
    }

    #[test]
    fn test_percent_encoding() {
        let analyzer = UrlAnalyzer::default();
        let finding = analyzer.score_url("https://example.com/%2e%2e/login");
        assert!(approx(finding.risk_score, 0.3));
        assert_eq!(finding.reasons, vec!["URL contains encoded characters"]);
    }

    #[test]
    fn test_rules_stack_without_clamping() {
        let analyzer = UrlAnalyzer::default();
        let findings = analyzer.analyze("http://a.b.c.evil.tk/%41");
        assert_eq!(findings.len(), 1);
        assert!(approx(findings[0].risk_score, 1.0));
        assert_eq!(findings[0].reasons.len(), 3);

        let stacked = UrlAnalyzer::new(TldRules::new(vec![
            ".tk".to_string(),
            "k".to_string(),
            ".evil.tk".to_string(),
        ]))
        .score_url("http://a.b.c.evil.tk/%41");
        assert!(stacked.risk_score > 1.0);
    }

    #[test]
    fn test_unicode_text_does_not_break_scanning() {
        let analyzer = UrlAnalyzer::default();
        let findings = analyzer.analyze("Привет 👋 http://пример.tk http://ok.com/ü");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].url, "http://ok.com/");
    }
}
