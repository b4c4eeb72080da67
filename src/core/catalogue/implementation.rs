//! Implementation signals (§3): work plan, management, consortium, resources

use lazy_static::lazy_static;
use regex::Regex;

use super::impact::{RE_D1_1, RE_DMP};
use super::{
    count, distinct, find_table, flag, sat, table_lines, vocabulary_check, yes_no, Evidence,
    Signal,
};
use crate::types::{CriterionId, RawCheckResult};

lazy_static! {
    // =========================================================================
    // Work plan identifiers: WP1, WP 2, Work Package 3, MS4, MS 5, Milestone 6, D2.1
    // =========================================================================
    static ref RE_WORK_PACKAGE: Regex = Regex::new(
        r"\b(?:WP\s*|(?i:work[- ]package)\s*)(\d{1,2})\b"
    ).unwrap();
    static ref RE_WP_IN_TABLE: Regex = Regex::new(r"\bWP\s*\d").unwrap();
    static ref RE_MILESTONE: Regex = Regex::new(
        r"\b(?:MS\s*|(?i:milestone)\s*)(\d{1,2})\b"
    ).unwrap();
    static ref RE_MILESTONE_MONTH: Regex = Regex::new(
        r"\b(?:MS\s*\d{1,2}|(?i:milestone)\s*\d{1,2})\b[^\n]{0,20}?\b(?:M|(?i:month)\s*)\d{1,3}\b"
    ).unwrap();
    static ref RE_DELIVERABLE: Regex = Regex::new(r"\bD(\d{1,2}\.\d{1,2})\b").unwrap();

    // =========================================================================
    // Timeline: Gantt vocabulary and month ranges "M1 – M24"
    // =========================================================================
    static ref RE_TIMELINE: Regex = Regex::new(
        r"(?i)\b(?:gantt|timeline|timetable|schedule|critical path)\b"
    ).unwrap();
    static ref RE_MONTH_RANGE: Regex = Regex::new(
        r"\bM\d{1,2}\s*(?:[-–─]+|to)\s*M\d{1,2}\b"
    ).unwrap();

    static ref RE_GOVERNANCE: Regex = Regex::new(
        r"(?i)\b(?:project coordinator|coordinator|steering committee|management (?:board|structure|team)|general assembly|advisory board|WP leaders?|work package leaders?|decision[- ]making|conflict resolution|governance|quality assurance)\b"
    ).unwrap();

    // =========================================================================
    // Risk register: Likelihood/Mitigation table, R-numbered rows, vocabulary
    // =========================================================================
    static ref RE_LIKELIHOOD: Regex = Regex::new(r"(?i)likelihood|probability").unwrap();
    static ref RE_MITIGATION: Regex = Regex::new(r"(?i)mitigation").unwrap();
    static ref RE_RISK_ROW: Regex = Regex::new(r"^\s*\|\s*R\d{1,2}\b").unwrap();
    static ref RE_RISK: Regex = Regex::new(
        r"(?i)\b(?:risk register|risks?|likelihood|probability|mitigation|contingency|severity)\b"
    ).unwrap();

    static ref RE_CONSORTIUM: Regex = Regex::new(
        r"(?i)\b(?:complementar(?:y|ity)|consortium|partners?|expertise|multidisciplinary|interdisciplinary|capabilit(?:y|ies))\b"
    ).unwrap();
    static ref RE_PARTNER_TABLE: Regex = Regex::new(r"(?i)^\s*\|\s*partner\s*\|").unwrap();

    // =========================================================================
    // Resources: cost vocabulary and monetary amounts
    // =========================================================================
    static ref RE_BUDGET: Regex = Regex::new(
        r"(?i)\b(?:budget|person[- ]months?|PMs?|personnel(?: costs?)?|equipment|travel|subcontracting|value for money|justif(?:y|ied|ication))\b"
    ).unwrap();
    static ref RE_AMOUNT: Regex = Regex::new(
        r"€\s?\d|\b\d+(?:[.,]\d+)?\s?(?:EUR|M€|k€)|\b\d{1,3}(?:,\d{3})+\b"
    ).unwrap();
}

pub(super) fn signals() -> Vec<Signal> {
    vec![
        Signal {
            id: "work_packages_defined",
            label: "Work packages defined",
            description: "Numbered work packages, ideally summarised in a table",
            criterion: CriterionId::Implementation,
            weight: 0.18,
            required_for_threshold: true,
            section_hint: "3.1 Work plan and resources",
            how_to_fix: "Break the work plan into 4-7 numbered work packages (WP1 ...) with a summary table of lead, start, end and person-months.",
            time_estimate_minutes: 45,
            check: Box::new(check_work_packages),
        },
        Signal {
            id: "milestones_present",
            label: "Milestones with dates",
            description: "Numbered milestones tied to project months",
            criterion: CriterionId::Implementation,
            weight: 0.12,
            required_for_threshold: true,
            section_hint: "3.1 Work plan and resources",
            how_to_fix: "List numbered milestones with their due month (\"MS1 (M6): ...\") and a means of verification.",
            time_estimate_minutes: 20,
            check: Box::new(check_milestones),
        },
        Signal {
            id: "deliverables_present",
            label: "Deliverables listed",
            description: "Numbered deliverables (D1.1, D2.1, ...) including the DMP",
            criterion: CriterionId::Implementation,
            weight: 0.12,
            required_for_threshold: false,
            section_hint: "3.1 Work plan and resources",
            how_to_fix: "List numbered deliverables per work package (D1.1, D2.1 ...) with due months; include the DMP as D1.1.",
            time_estimate_minutes: 20,
            check: Box::new(check_deliverables),
        },
        Signal {
            id: "timeline_gantt",
            label: "Timeline / Gantt",
            description: "Gantt chart or timeline with month ranges per work package",
            criterion: CriterionId::Implementation,
            weight: 0.08,
            required_for_threshold: false,
            section_hint: "3.1 Work plan and resources",
            how_to_fix: "Add a Gantt overview with month ranges per work package (\"WP2 M1 – M30\") and the critical path.",
            time_estimate_minutes: 20,
            check: Box::new(check_timeline),
        },
        Signal {
            id: "governance_structure",
            label: "Governance structure",
            description: "Management bodies, roles and decision-making procedures",
            criterion: CriterionId::Implementation,
            weight: 0.12,
            required_for_threshold: false,
            section_hint: "3.2 Management structure and procedures",
            how_to_fix: "Describe the coordinator, steering committee and WP leaders, plus decision-making and conflict resolution rules.",
            time_estimate_minutes: 20,
            check: Box::new(check_governance),
        },
        Signal {
            id: "risk_register",
            label: "Risk register",
            description: "Risk table with likelihood, impact and mitigation measures",
            criterion: CriterionId::Implementation,
            weight: 0.16,
            required_for_threshold: true,
            section_hint: "3.2 Management structure and procedures",
            how_to_fix: "Add a risk table with columns Risk | Likelihood | Impact | Mitigation | Owner and at least four numbered risks (R1 ...).",
            time_estimate_minutes: 30,
            check: Box::new(check_risk_register),
        },
        Signal {
            id: "consortium_complementarity",
            label: "Consortium complementarity",
            description: "Partner roles and complementary expertise",
            criterion: CriterionId::Implementation,
            weight: 0.12,
            required_for_threshold: false,
            section_hint: "3.3 Consortium as a whole",
            how_to_fix: "Add a partner table (Partner | Country | Type | Key expertise) and explain how the expertise is complementary.",
            time_estimate_minutes: 20,
            check: Box::new(check_consortium),
        },
        Signal {
            id: "budget_justification",
            label: "Budget justification",
            description: "Person-months and cost categories justified with amounts",
            criterion: CriterionId::Implementation,
            weight: 0.10,
            required_for_threshold: false,
            section_hint: "3.4 Resources and costs",
            how_to_fix: "Justify person-months per WP and the main cost categories (personnel, equipment, travel) with amounts in EUR.",
            time_estimate_minutes: 25,
            check: Box::new(check_budget),
        },
    ]
}

/// 0.8 × sat(distinct WP numbers, 5) + 0.2 × WP table
fn check_work_packages(text: &str) -> RawCheckResult {
    let n = distinct(&RE_WORK_PACKAGE, text);
    let table_row = table_lines(text).find(|line| RE_WP_IN_TABLE.is_match(line));
    if n == 0 && table_row.is_none() {
        return RawCheckResult::absent("No work packages found (expected WP1, WP2, ...).");
    }
    let table = table_row.is_some();
    let confidence = (0.8 * sat(n, 5) + 0.2 * flag(table)).min(1.0);
    let mut evidence = Evidence::new();
    if let Some(row) = table_row {
        evidence = evidence.line(row);
    }
    RawCheckResult::new(
        confidence,
        evidence.matches(&RE_WORK_PACKAGE, text).into_vec(),
        format!(
            "{} distinct work package(s), WP table {}: 0.8 × sat({}, 5) + 0.2 × {} = {:.2}",
            n,
            yes_no(table),
            n,
            flag(table),
            confidence
        ),
    )
}

/// 0.6 × sat(distinct milestones, 4) + 0.4 × sat(milestones with a month, 3)
fn check_milestones(text: &str) -> RawCheckResult {
    let n = distinct(&RE_MILESTONE, text);
    let dated = count(&RE_MILESTONE_MONTH, text);
    if n == 0 {
        return RawCheckResult::absent("No numbered milestones found (expected MS1, MS2, ...).");
    }
    let confidence = (0.6 * sat(n, 4) + 0.4 * sat(dated, 3)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new().matches(&RE_MILESTONE, text).into_vec(),
        format!(
            "{} distinct milestone(s), {} with a due month: 0.6 × sat({}, 4) + 0.4 × sat({}, 3) = {:.2}",
            n, dated, n, dated, confidence
        ),
    )
}

/// 0.8 × sat(distinct deliverables, 4) + 0.2 × (D1.1 and DMP present)
fn check_deliverables(text: &str) -> RawCheckResult {
    let n = distinct(&RE_DELIVERABLE, text);
    if n == 0 {
        return RawCheckResult::absent("No numbered deliverables found (expected D1.1, D2.1, ...).");
    }
    let dmp_bonus = RE_D1_1.is_match(text) && RE_DMP.is_match(text);
    let confidence = (0.8 * sat(n, 4) + 0.2 * flag(dmp_bonus)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new().matches(&RE_DELIVERABLE, text).into_vec(),
        format!(
            "{} distinct deliverable(s), D1.1 DMP {}: 0.8 × sat({}, 4) + 0.2 × {} = {:.2}",
            n,
            yes_no(dmp_bonus),
            n,
            flag(dmp_bonus),
            confidence
        ),
    )
}

/// 0.5 × sat(timeline vocabulary, 2) + 0.5 × sat(month ranges, 3)
fn check_timeline(text: &str) -> RawCheckResult {
    let k = count(&RE_TIMELINE, text);
    let ranges = count(&RE_MONTH_RANGE, text);
    if k == 0 && ranges == 0 {
        return RawCheckResult::absent("No timeline or Gantt chart found.");
    }
    let confidence = (0.5 * sat(k, 2) + 0.5 * sat(ranges, 3)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new()
            .matches(&RE_TIMELINE, text)
            .matches(&RE_MONTH_RANGE, text)
            .into_vec(),
        format!(
            "{} timeline term(s), {} month range(s): 0.5 × sat({}, 2) + 0.5 × sat({}, 3) = {:.2}",
            k, ranges, k, ranges, confidence
        ),
    )
}

fn check_governance(text: &str) -> RawCheckResult {
    vocabulary_check(text, &RE_GOVERNANCE, 5, "governance term")
}

/// 0.45 × Likelihood/Mitigation header + 0.3 × sat(R-numbered rows, 3) + 0.25 × sat(risk vocabulary, 4)
fn check_risk_register(text: &str) -> RawCheckResult {
    let table = find_table(text, |line| {
        RE_LIKELIHOOD.is_match(line) && RE_MITIGATION.is_match(line)
    });
    let rows = table_lines(text).filter(|line| RE_RISK_ROW.is_match(line)).count();
    let k = count(&RE_RISK, text);
    if table.is_none() && rows == 0 && k == 0 {
        return RawCheckResult::absent("No risk register or risk discussion found.");
    }
    let header = table.is_some();
    let confidence = (0.45 * flag(header) + 0.3 * sat(rows, 3) + 0.25 * sat(k, 4)).min(1.0);
    let mut evidence = Evidence::new();
    if let Some(table) = &table {
        evidence = evidence.line(&table.header);
    }
    for row in table_lines(text).filter(|line| RE_RISK_ROW.is_match(line)) {
        evidence = evidence.line(row);
    }
    RawCheckResult::new(
        confidence,
        evidence.matches(&RE_RISK, text).into_vec(),
        format!(
            "Likelihood/Mitigation table {}, {} numbered risk row(s), {} risk term(s): 0.45 × {} + 0.3 × sat({}, 3) + 0.25 × sat({}, 4) = {:.2}",
            yes_no(header),
            rows,
            k,
            flag(header),
            rows,
            k,
            confidence
        ),
    )
}

/// 0.75 × sat(consortium vocabulary, 6) + 0.25 × partner table
fn check_consortium(text: &str) -> RawCheckResult {
    let k = count(&RE_CONSORTIUM, text);
    let table_row = table_lines(text).find(|line| RE_PARTNER_TABLE.is_match(line));
    if k == 0 && table_row.is_none() {
        return RawCheckResult::absent("No consortium description found.");
    }
    let table = table_row.is_some();
    let confidence = (0.75 * sat(k, 6) + 0.25 * flag(table)).min(1.0);
    let mut evidence = Evidence::new();
    if let Some(row) = table_row {
        evidence = evidence.line(row);
    }
    RawCheckResult::new(
        confidence,
        evidence.matches(&RE_CONSORTIUM, text).into_vec(),
        format!(
            "{} consortium term(s), partner table {}: 0.75 × sat({}, 6) + 0.25 × {} = {:.2}",
            k,
            yes_no(table),
            k,
            flag(table),
            confidence
        ),
    )
}

/// 0.6 × sat(budget vocabulary, 5) + 0.4 × sat(monetary amounts, 3)
fn check_budget(text: &str) -> RawCheckResult {
    let k = count(&RE_BUDGET, text);
    let amounts = count(&RE_AMOUNT, text);
    if k == 0 && amounts == 0 {
        return RawCheckResult::absent("No budget justification found.");
    }
    let confidence = (0.6 * sat(k, 5) + 0.4 * sat(amounts, 3)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new()
            .matches(&RE_BUDGET, text)
            .matches(&RE_AMOUNT, text)
            .into_vec(),
        format!(
            "{} cost term(s), {} amount(s): 0.6 × sat({}, 5) + 0.4 × sat({}, 3) = {:.2}",
            k, amounts, k, amounts, confidence
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_work_packages() {
        let draft = "
            WP1: Management (M1–M48)
            WP2: Data Infrastructure (M1–M30)
            WP3: Co-Design (M1–M24)
            WP4: Pilot Deployment (M18–M46)
            WP5: Dissemination (M1–M48)
            WP1 leads project coordination. WP2 and WP3 work in parallel.
        ";
        let result = check_work_packages(draft);
        assert!(result.found);
        assert!(result.confidence >= 0.75, "got {}", result.confidence);
    }

    #[test]
    fn test_single_work_package_is_weak() {
        let result = check_work_packages("Work Package 1 covers project management activities.");
        assert!(result.found);
        assert!(result.confidence < 0.50);
    }

    #[test]
    fn test_no_work_packages() {
        let result =
            check_work_packages("The work plan is organized around three main research activities.");
        assert!(!result.found);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_work_package_table() {
        let draft = "| WP | Title | Lead |\n| WP1 | Management | WUR |\n| WP2 | Research | CNR |";
        let result = check_work_packages(draft);
        assert!(result.found);
        assert!(result.confidence > 0.3);
    }

    #[test]
    fn test_milestones_with_months() {
        let draft = "MS1 (M6): DMP submitted.\nMS2 (M24): AI engine validated.\nMS3 (M36): Pilot Season 1 complete.";
        let result = check_milestones(draft);
        assert!(result.confidence >= 0.65, "got {}", result.confidence);
        assert_eq!(
            check_milestones("Progress will be tracked through regular meetings.").confidence,
            0.0
        );
    }

    #[test]
    fn test_spaced_identifiers_are_counted() {
        let wps = check_work_packages("WP 1: Management. WP 2: Data. WP 3: Models. WP 4: Pilots. WP 5: Outreach.");
        assert!(wps.found);
        assert!(wps.confidence >= 0.75, "got {}", wps.confidence);

        let milestones = check_milestones("MS 1 (M6): DMP submitted.\nMS 2 (M24): Engine validated.\nMS 3 (M36): Pilots done.");
        assert!(milestones.found);
        assert!(milestones.confidence >= 0.65, "got {}", milestones.confidence);
        // "MS 1" and "MS1" are the same milestone
        assert_eq!(
            check_milestones("MS 1 (M6) and MS1 again.").confidence,
            check_milestones("MS1 (M6) only.").confidence
        );
    }

    #[test]
    fn test_deliverables_with_dmp_bonus() {
        let draft = "D1.1: Data Management Plan (Month 6)\nD2.1: AI engine report (Month 24)\nD4.1: Pilot report (Month 46)";
        let result = check_deliverables(draft);
        assert!(result.confidence >= 0.60, "got {}", result.confidence);
        assert!(result.detail.contains("D1.1 DMP yes"));
        assert_eq!(check_deliverables("The project will produce excellent outputs.").confidence, 0.0);
    }

    #[test]
    fn test_risk_table_scores_high() {
        let draft = "
            Risk register:
            | Risk | Likelihood | Impact | Mitigation |
            |------|-----------|--------|-----------|
            | R1 Technical | H | H | Alternative model |
            | R2 Consortium | L | H | Documentation |
        ";
        let result = check_risk_register(draft);
        assert!(result.found);
        assert!(result.confidence >= 0.75, "got {}", result.confidence);
    }

    #[test]
    fn test_risk_prose_is_moderate() {
        let result = check_risk_register(
            "Risks include technical failure (likelihood: medium, mitigation: alternative approach).",
        );
        assert!(result.confidence > 0.0 && result.confidence < 0.75);
    }

    #[test]
    fn test_risk_register_keyword_fires() {
        let result =
            check_risk_register("A risk register will be maintained throughout the project lifecycle.");
        assert!(result.found);
        assert_eq!(
            check_risk_register("The management structure ensures effective coordination among partners.")
                .confidence,
            0.0
        );
    }

    #[test]
    fn test_budget_amounts() {
        let result = check_budget("Budget: €3.8M. Personnel 720,000 and travel 40,000 EUR.");
        assert!(result.found);
        assert!(result.detail.contains("amount(s)"));
    }
}
