//! Markdown rendering of a finished report
//!
//! Pure presentation: reads already-final numbers, never recomputes a score,
//! and never reads `markdown_report` itself, so rendering twice is a no-op.

use chrono::SecondsFormat;

use crate::types::{
    ActionItem, CriterionAssessment, MissingItem, ReviewerReport, Severity, SignalResult,
    StructureCheckResult,
};
use crate::STRENGTH_CONFIDENCE;

/// Below this a signal is shown as absent in the breakdown table
const WARN_CONFIDENCE: f64 = 0.35;

const RULE: &str = "---";

#[derive(Debug, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &ReviewerReport) -> String {
        let overall_banner = if report.overall_passed {
            format!(
                "> ✅ **OVERALL: PASS**: score {:.1}/{} · all criterion thresholds met",
                report.overall_score, report.overall_max_score
            )
        } else {
            format!(
                "> ❌ **OVERALL: BELOW THRESHOLD**: score {:.1}/{} · see missing items below",
                report.overall_score, report.overall_max_score
            )
        };

        let sections: Vec<String> = vec![
            "# Reviewer Report".to_string(),
            String::new(),
            format!(
                "> **Scheme:** {} · **Generated:** {}",
                report.scheme_name,
                report.generated_at.format("%Y-%m-%d")
            ),
            "> **⚠ Heuristic assessment only.** Not a prediction of the evaluation outcome. Same draft → same report.".to_string(),
            String::new(),
            overall_banner,
            String::new(),
            RULE.to_string(),
            String::new(),
            "## Score Summary".to_string(),
            String::new(),
            summary_table(report),
            String::new(),
            RULE.to_string(),
            String::new(),
            "## Structure Checks".to_string(),
            String::new(),
            structure_checks(&report.structure_checks),
            String::new(),
            RULE.to_string(),
            String::new(),
            "## Criterion Assessments".to_string(),
            String::new(),
            report
                .criteria
                .iter()
                .map(criterion_section)
                .collect::<Vec<_>>()
                .join(&format!("\n\n{}\n\n", RULE)),
            String::new(),
            RULE.to_string(),
            String::new(),
            "## All Strengths".to_string(),
            String::new(),
            bullets(
                &report.all_strengths,
                "✅",
                "_No signals at strength level across all criteria._",
            ),
            String::new(),
            "## All Weaknesses".to_string(),
            String::new(),
            bullets(&report.all_weaknesses, "⚠️", "_No major weaknesses detected._"),
            String::new(),
            RULE.to_string(),
            String::new(),
            "## Missing Items Checklist".to_string(),
            String::new(),
            missing_items(&report.missing_items),
            String::new(),
            RULE.to_string(),
            String::new(),
            "## Next 30 Minutes: Action Plan".to_string(),
            String::new(),
            action_plan(&report.action_items),
            String::new(),
            RULE.to_string(),
            String::new(),
            "## Transparency Note".to_string(),
            String::new(),
            transparency_note(report),
            String::new(),
        ];
        sections.join("\n")
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn score_emoji(score: f64, threshold: f64) -> &'static str {
    if score >= threshold + 1.5 {
        "🟢"
    } else if score >= threshold {
        "🟡"
    } else {
        "🔴"
    }
}

fn pass_label(passed: bool) -> &'static str {
    if passed {
        "✅ PASS"
    } else {
        "❌ BELOW THRESHOLD"
    }
}

fn pct(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}

fn bar(coverage: f64, width: usize) -> String {
    let filled = ((coverage.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn bullets(items: &[String], icon: &str, empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .map(|item| format!("- {} {}", icon, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pipes inside cell text would split the Markdown table
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

// =============================================================================
// SECTIONS
// =============================================================================

fn summary_table(report: &ReviewerReport) -> String {
    let mut lines = vec![
        "| Criterion | Score | Threshold | Status | Coverage |".to_string(),
        "|-----------|:-----:|:---------:|--------|----------|".to_string(),
    ];
    for c in &report.criteria {
        lines.push(format!(
            "| {} **{}** | **{:.1}** / {} | ≥ {:.1} | {} | `{}` {} |",
            score_emoji(c.score, c.threshold),
            c.title,
            c.score,
            c.max_score,
            c.threshold,
            pass_label(c.passed),
            bar(c.adjusted_coverage, 15),
            pct(c.adjusted_coverage)
        ));
    }
    lines.push("| | | | | |".to_string());
    lines.push(format!(
        "| {} **Total** | **{:.1}** / {} | ≥ {:.1} | {} | |",
        if report.overall_passed { "✅" } else { "❌" },
        report.overall_score,
        report.overall_max_score,
        report.overall_threshold,
        pass_label(report.overall_passed)
    ));
    lines.join("\n")
}

fn structure_checks(checks: &[StructureCheckResult]) -> String {
    checks
        .iter()
        .map(|c| {
            format!(
                "- {} **{}**: {}",
                if c.present { "✅" } else { "❌" },
                c.label,
                c.detail
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn signal_icon(signal: &SignalResult) -> &'static str {
    if signal.confidence >= STRENGTH_CONFIDENCE {
        "✅"
    } else if signal.confidence >= WARN_CONFIDENCE {
        "⚠️"
    } else {
        "❌"
    }
}

fn signal_table(c: &CriterionAssessment) -> String {
    let mut lines = vec![
        "| | Signal | Confidence | Weight | Detail |".to_string(),
        "|---|--------|:----------:|:------:|--------|".to_string(),
    ];
    for s in &c.signals {
        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            signal_icon(s),
            s.label,
            pct(s.confidence),
            pct(s.weight),
            cell(&s.detail)
        ));
    }
    lines.join("\n")
}

fn criterion_section(c: &CriterionAssessment) -> String {
    let status = if c.passed {
        format!("> ✅ **PASS**: {}", c.rationale)
    } else {
        format!("> ❌ **BELOW THRESHOLD**: {}", c.rationale)
    };
    let coverage = format!(
        "**Coverage:** `{}` {}  |  **Score:** {:.1} / {}  |  **Threshold:** ≥ {:.1}",
        bar(c.adjusted_coverage, 20),
        pct(c.adjusted_coverage),
        c.score,
        c.max_score,
        c.threshold
    );
    let evidence: Vec<String> = c
        .signals
        .iter()
        .filter(|s| s.found)
        .filter_map(|s| {
            s.evidence
                .first()
                .map(|e| format!("  - **{}**: `{}`", s.label, e.replace('`', "'")))
        })
        .collect();
    let evidence_block = if evidence.is_empty() {
        String::new()
    } else {
        format!("**Evidence snippets:**\n{}", evidence.join("\n"))
    };

    [
        format!("### {}: {:.1} / {}", c.title, c.score, c.max_score),
        String::new(),
        status,
        String::new(),
        coverage,
        String::new(),
        "#### Strengths".to_string(),
        bullets(
            &c.strengths,
            "✅",
            "_No signals at ≥65% confidence for this criterion._",
        ),
        String::new(),
        "#### Weaknesses".to_string(),
        bullets(&c.weaknesses, "⚠️", "_No major weaknesses detected._"),
        String::new(),
        "<details>".to_string(),
        "<summary>Signal breakdown (click to expand)</summary>".to_string(),
        String::new(),
        signal_table(c),
        String::new(),
        evidence_block,
        String::new(),
        "</details>".to_string(),
    ]
    .join("\n")
}

fn missing_group(lines: &mut Vec<String>, heading: &str, items: &[&MissingItem]) {
    if items.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    lines.push(String::new());
    for item in items {
        lines.push(format!("- [ ] **[{}] {}**", item.criterion_title, item.label));
        lines.push(format!("  > {}", item.how_to_fix));
        lines.push(format!(
            "  > _Estimated time: {} min · Score impact: {}_",
            item.time_estimate_minutes, item.estimated_score_impact
        ));
        lines.push(String::new());
    }
}

fn missing_items(items: &[MissingItem]) -> String {
    if items.is_empty() {
        return "_No missing items: all signals have adequate coverage._".to_string();
    }
    let required: Vec<&MissingItem> = items
        .iter()
        .filter(|i| i.severity == Severity::Required)
        .collect();
    let recommended: Vec<&MissingItem> = items
        .iter()
        .filter(|i| i.severity == Severity::Recommended)
        .collect();

    let mut lines = Vec::new();
    missing_group(&mut lines, "#### 🔴 Required: fix before submission", &required);
    missing_group(&mut lines, "#### 🟡 Recommended: will improve score", &recommended);
    lines.join("\n")
}

fn urgency_cell(action: &ActionItem) -> String {
    format!("{} **{}**", action.urgency.emoji(), action.priority)
}

fn action_plan(actions: &[ActionItem]) -> String {
    if actions.is_empty() {
        return "_No actions needed: all signals are well covered._".to_string();
    }
    let total: u32 = actions.iter().map(|a| a.time_estimate_minutes).sum();
    let mut lines = vec![
        format!("> Total estimated time: **~{} minutes**", total),
        String::new(),
        "| # | Time | Section | Action | Score impact |".to_string(),
        "|:---:|:----:|:-------:|--------|-------------|".to_string(),
    ];
    for a in actions {
        lines.push(format!(
            "| {} | {} min | `{}` | {} | {} |",
            urgency_cell(a),
            a.time_estimate_minutes,
            a.section,
            cell(&a.action),
            a.score_impact
        ));
    }
    lines.join("\n")
}

fn transparency_note(report: &ReviewerReport) -> String {
    let formula = [
        "```",
        "For each criterion:",
        "  rawCoverage        = Σ(signal.weight × signal.confidence) / Σ(signal.weight)",
        "  adjustedCoverage   = clamp(rawCoverage + structureAdjustment, 0, 1)",
        "  score              = coverageToScore(adjustedCoverage)   →  round(adjustedCoverage × 5 × 2) / 2   (0.5 steps)",
        "",
        "Coverage → score breakpoints:",
        "  0.00 → 0.0   0.10 → 0.5   0.20 → 1.0   0.30 → 1.5   0.40 → 2.0",
        "  0.50 → 2.5   0.55 → 3.0 ← threshold     0.70 → 3.5   0.80 → 4.0",
        "  0.90 → 4.5   1.00 → 5.0",
        "```",
    ]
    .join("\n");

    let derivations = report
        .criteria
        .iter()
        .map(|c| {
            [
                "<details>".to_string(),
                format!(
                    "<summary><strong>{}</strong> derivation (click to expand)</summary>",
                    c.title
                ),
                String::new(),
                "```".to_string(),
                c.derivation.clone(),
                "```".to_string(),
                String::new(),
                "</details>".to_string(),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    [
        "This report is generated **deterministically** from the draft text.".to_string(),
        "The same draft always produces the same report.".to_string(),
        String::new(),
        "### Scoring formula".to_string(),
        formula,
        String::new(),
        format!(
            "Pass rule: every criterion at or above its threshold AND total ≥ {:.1}.",
            report.overall_threshold
        ),
        "Score impact estimates raise one signal to 75% confidence and re-run the formula; they are marginal, not joint, forecasts.".to_string(),
        String::new(),
        "### Per-criterion derivations".to_string(),
        derivations,
        String::new(),
        format!(
            "**Draft statistics:** {} words · {} headings",
            report.draft_word_count, report.draft_section_count
        ),
        format!("**Draft SHA-256:** `{}`", report.draft_digest),
        format!(
            "**Generated:** {}",
            report.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        format!("**Scheme:** `{}`", report.scheme_id),
    ]
    .join("\n")
}
