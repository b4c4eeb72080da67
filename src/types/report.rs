//! The reviewer report: the only object handed back to callers

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{
    ActionItem, CriterionAssessment, CriterionId, MissingItem, Severity, StructureCheckResult,
};

/// Structured scores plus the rendered Markdown document, produced together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerReport {
    pub generated_at: DateTime<Utc>,
    pub scheme_id: String,
    pub scheme_name: String,
    /// SHA-256 of the draft text (hex)
    pub draft_digest: String,
    pub draft_word_count: usize,
    pub draft_section_count: usize,
    pub structure_checks: Vec<StructureCheckResult>,
    /// Excellence, Impact, Implementation in that order
    pub criteria: Vec<CriterionAssessment>,
    pub overall_score: f64,
    pub overall_max_score: f64,
    pub overall_threshold: f64,
    pub overall_passed: bool,
    pub all_strengths: Vec<String>,
    pub all_weaknesses: Vec<String>,
    pub missing_items: Vec<MissingItem>,
    pub action_items: Vec<ActionItem>,
    pub markdown_report: String,
}

impl ReviewerReport {
    pub fn criterion(&self, id: CriterionId) -> Option<&CriterionAssessment> {
        self.criteria.iter().find(|c| c.criterion == id)
    }

    pub fn required_missing_count(&self) -> usize {
        self.missing_items
            .iter()
            .filter(|m| m.severity == Severity::Required)
            .count()
    }

    /// Total minutes of the action plan
    pub fn action_plan_minutes(&self) -> u32 {
        self.action_items.iter().map(|a| a.time_estimate_minutes).sum()
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let mut lines = Vec::new();
        for c in &self.criteria {
            let status = if c.passed { "PASS".green().bold() } else { "FAIL".red().bold() };
            lines.push(format!(
                "{} {:<15} {:.1}/{:.0}  (threshold {:.1}, coverage {:.0}%)",
                status,
                c.title,
                c.score,
                c.max_score,
                c.threshold,
                c.adjusted_coverage * 100.0
            ));
        }
        let overall = format!(
            "Overall {:.1}/{:.0} (threshold {:.1})",
            self.overall_score, self.overall_max_score, self.overall_threshold
        );
        lines.push(if self.overall_passed {
            overall.green().bold().to_string()
        } else {
            overall.red().bold().to_string()
        });
        lines.push(
            format!(
                "Missing: {} required, {} recommended | Next actions: {} ({} min)",
                self.required_missing_count(),
                self.missing_items.len() - self.required_missing_count(),
                self.action_items.len(),
                self.action_plan_minutes()
            )
            .dimmed()
            .to_string(),
        );
        lines.join("\n")
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let mut parts: Vec<String> = self
            .criteria
            .iter()
            .map(|c| format!("{}={:.1}/{:.0} passed={}", c.criterion, c.score, c.max_score, c.passed))
            .collect();
        parts.push(format!(
            "overall={:.1}/{:.0} passed={}",
            self.overall_score, self.overall_max_score, self.overall_passed
        ));
        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use crate::types::SchemeDescriptor;

    #[test]
    fn test_parseable_string_lists_every_criterion() {
        let report = crate::score("", &SchemeDescriptor::horizon_europe()).unwrap();
        assert_eq!(
            report.to_parseable_string(),
            "excellence=0.0/5 passed=false | impact=0.0/5 passed=false | \
             implementation=0.0/5 passed=false | overall=0.0/15 passed=false"
        );
    }

    #[test]
    fn test_terminal_string_summarises_gaps() {
        colored::control::set_override(false);
        let report = crate::score("", &SchemeDescriptor::horizon_europe()).unwrap();
        let text = report.to_terminal_string();
        assert!(text.contains("FAIL Excellence"));
        assert!(text.contains("Overall 0.0/15 (threshold 10.0)"));
        assert!(text.contains(&format!("{} required", report.required_missing_count())));
    }
}
