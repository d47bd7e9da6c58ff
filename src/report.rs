use crate::aggregator::AnalysisReport;
use std::fmt;

/// Console rendering of a report.
pub fn render_text(report: &AnalysisReport) -> String {
    TextReport(report).to_string()
}

/// Text layout of a report; write errors reach the caller.
pub struct TextReport<'a>(pub &'a AnalysisReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(f, "Phishing Detection Results:")?;
        writeln!(f, "{}", "-".repeat(50))?;
        writeln!(f, "Risk Level: {}", report.risk_level)?;
        writeln!(f, "Overall Risk Score: {:.2}", report.overall_risk_score)?;

        writeln!(f, "\nDetected Keywords:")?;
        for keyword in &report.keyword_analysis.detected_keywords {
            writeln!(f, "- {}", keyword)?;
        }

        writeln!(f, "\nSuspicious URLs:")?;
        for finding in &report.url_analysis {
            writeln!(f, "- {}", finding.url)?;
            writeln!(f, "  Risk Score: {:.2}", finding.risk_score)?;
            for reason in &finding.reasons {
                writeln!(f, "  • {}", reason)?;
            }
        }

        if let Some(header) = &report.header_analysis {
            writeln!(f, "\nHeader Analysis (score {:.2}):", header.score)?;
            for reason in &header.reasons {
                writeln!(f, "- {}", reason)?;
            }
        }

        writeln!(f, "\nRecommendations:")?;
        for recommendation in &report.recommendations {
            writeln!(f, "- {}", recommendation)?;
        }

        Ok(())
    }
}
