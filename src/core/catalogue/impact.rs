//! Impact signals (§2): outcomes, KPIs, exploitation, open science

use lazy_static::lazy_static;
use regex::Regex;

use super::{count, find_table, flag, sat, vocabulary_check, yes_no, Evidence, Signal};
use crate::types::{CriterionId, RawCheckResult};

lazy_static! {
    // =========================================================================
    // Expected outcomes tied to the call text
    // =========================================================================
    static ref RE_EXPECTED_OUTCOME: Regex = Regex::new(
        r"(?i)\bexpected (?:outcomes?|impacts?)\b"
    ).unwrap();
    static ref RE_CALL_REFERENCE: Regex = Regex::new(
        r"(?i)\b(?:the call|call's|topic|work programme|destination)\b"
    ).unwrap();
    static ref RE_OUTCOME_LINK: Regex = Regex::new(
        r"(?i)(?:→|->|\bdelivered (?:via|through|by)\b|\baddress(?:es|ed)? (?:by|through)\b|\bcontribut(?:es|ing) to\b)"
    ).unwrap();

    // =========================================================================
    // KPIs: a Baseline/Target table plus indicator vocabulary
    // =========================================================================
    static ref RE_BASELINE: Regex = Regex::new(r"(?i)baseline").unwrap();
    static ref RE_TARGET: Regex = Regex::new(r"(?i)target").unwrap();
    static ref RE_KPI: Regex = Regex::new(
        r"(?i)\b(?:KPIs?|key performance indicators?|indicators?)\b"
    ).unwrap();
    static ref RE_PERCENT_TARGET: Regex = Regex::new(
        r"(?:≥|≤|>=|<=)\s?\d+(?:\.\d+)?\s?%"
    ).unwrap();

    static ref RE_TARGET_GROUP: Regex = Regex::new(
        r"(?i)\b(?:beneficiar(?:y|ies)|target groups?|end[- ]users?|stakeholders?|user groups?|policymakers?|practitioners|citizens|SMEs?)\b"
    ).unwrap();
    static ref RE_EXPLOITATION: Regex = Regex::new(
        r"(?i)\b(?:exploitation|commerciali[sz](?:e|es|ation)|IP strategy|intellectual property|licen[cs](?:e|es|ing)|patents?|market entry|business model|spin-?offs?|subscription model|trade secrets?)\b"
    ).unwrap();
    static ref RE_DISSEMINATION: Regex = Regex::new(
        r"(?i)\b(?:dissemination|journals?|conferences?|workshops?|website|newsletters?|social media|webinars?|press releases?)\b"
    ).unwrap();

    // =========================================================================
    // Open science: open access, FAIR (case-sensitive), repositories, DMP
    // =========================================================================
    static ref RE_OPEN_ACCESS: Regex = Regex::new(
        r"(?i)\b(?:open access|gold OA|green OA)\b"
    ).unwrap();
    static ref RE_FAIR: Regex = Regex::new(r"\bFAIR\b").unwrap();
    static ref RE_REPOSITORY: Regex = Regex::new(
        r"(?i)\b(?:zenodo|open data|open[- ]source|CC BY|creative commons|repositor(?:y|ies)|github)\b"
    ).unwrap();
    pub(super) static ref RE_DMP: Regex = Regex::new(
        r"(?i)\b(?:data management plan|DMP)\b"
    ).unwrap();
    pub(super) static ref RE_D1_1: Regex = Regex::new(r"\bD1\.1\b").unwrap();
    static ref RE_MONTH_SIX: Regex = Regex::new(r"(?i)\b(?:month\s*6|M6)\b").unwrap();
}

pub(super) fn signals() -> Vec<Signal> {
    vec![
        Signal {
            id: "expected_outcomes_linked",
            label: "Expected outcomes linked to the call",
            description: "Project results mapped explicitly to the topic's expected outcomes",
            criterion: CriterionId::Impact,
            weight: 0.20,
            required_for_threshold: true,
            section_hint: "2.1 Project's pathways towards impact",
            how_to_fix: "Quote each expected outcome of the call and state which project result delivers it (\"Expected Outcome 1 → delivered via ...\").",
            time_estimate_minutes: 25,
            check: Box::new(check_expected_outcomes),
        },
        Signal {
            id: "kpi_table",
            label: "KPI table with baselines and targets",
            description: "Quantified indicators with baseline and target values",
            criterion: CriterionId::Impact,
            weight: 0.20,
            required_for_threshold: true,
            section_hint: "2.1 Project's pathways towards impact",
            how_to_fix: "Add a KPI table with columns Indicator | Baseline | Target | Timeline and at least three quantified rows.",
            time_estimate_minutes: 30,
            check: Box::new(check_kpi_table),
        },
        Signal {
            id: "target_groups",
            label: "Target groups identified",
            description: "Beneficiaries, end-users and stakeholders named",
            criterion: CriterionId::Impact,
            weight: 0.10,
            required_for_threshold: false,
            section_hint: "2.1 Project's pathways towards impact",
            how_to_fix: "Name the target groups (end-users, policymakers, SMEs, ...) and what each gains from the results.",
            time_estimate_minutes: 10,
            check: Box::new(check_target_groups),
        },
        Signal {
            id: "exploitation_plan",
            label: "Exploitation plan",
            description: "IP strategy, licensing and route to market for the results",
            criterion: CriterionId::Impact,
            weight: 0.15,
            required_for_threshold: true,
            section_hint: "2.2 Measures to maximise impact",
            how_to_fix: "Describe who exploits which result, the IP strategy (licence, patents, trade secrets) and the market entry route.",
            time_estimate_minutes: 25,
            check: Box::new(check_exploitation),
        },
        Signal {
            id: "dissemination_channels",
            label: "Dissemination channels",
            description: "Named journals, conferences and communication channels",
            criterion: CriterionId::Impact,
            weight: 0.12,
            required_for_threshold: false,
            section_hint: "2.3 Communication, dissemination and exploitation",
            how_to_fix: "Name target journals, conferences and the project website or newsletter, with timing.",
            time_estimate_minutes: 15,
            check: Box::new(check_dissemination),
        },
        Signal {
            id: "open_access_commitment",
            label: "Open access and FAIR data",
            description: "Open access publishing and FAIR data commitments",
            criterion: CriterionId::Impact,
            weight: 0.13,
            required_for_threshold: false,
            section_hint: "2.4 Open science practices",
            how_to_fix: "Commit to immediate open access for publications and FAIR data in a named repository (e.g. Zenodo, CC BY 4.0).",
            time_estimate_minutes: 10,
            check: Box::new(check_open_access),
        },
        Signal {
            id: "dmp_referenced",
            label: "Data Management Plan",
            description: "Data Management Plan as deliverable D1.1 by Month 6",
            criterion: CriterionId::Impact,
            weight: 0.10,
            required_for_threshold: false,
            section_hint: "2.4 Open science practices",
            how_to_fix: "Reference the Data Management Plan as deliverable D1.1, due by Month 6.",
            time_estimate_minutes: 10,
            check: Box::new(check_dmp),
        },
    ]
}

/// 0.5 × sat(expected outcomes, 2) + 0.2 × sat(call references, 1) + 0.3 × sat(links, 2)
fn check_expected_outcomes(text: &str) -> RawCheckResult {
    let outcomes = count(&RE_EXPECTED_OUTCOME, text);
    let calls = count(&RE_CALL_REFERENCE, text);
    let links = count(&RE_OUTCOME_LINK, text);
    if outcomes + calls + links == 0 {
        return RawCheckResult::absent("No expected outcomes or call references found.");
    }
    let confidence = (0.5 * sat(outcomes, 2) + 0.2 * sat(calls, 1) + 0.3 * sat(links, 2)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new()
            .matches(&RE_EXPECTED_OUTCOME, text)
            .matches(&RE_CALL_REFERENCE, text)
            .matches(&RE_OUTCOME_LINK, text)
            .into_vec(),
        format!(
            "{} expected-outcome mention(s), {} call reference(s), {} explicit link(s): 0.5 × sat({}, 2) + 0.2 × sat({}, 1) + 0.3 × sat({}, 2) = {:.2}",
            outcomes, calls, links, outcomes, calls, links, confidence
        ),
    )
}

/// 0.55 × header + 0.3 × sat(data rows, 2) + 0.15 × sat(KPI terms + % targets, 3)
fn check_kpi_table(text: &str) -> RawCheckResult {
    let table = find_table(text, |line| RE_BASELINE.is_match(line) && RE_TARGET.is_match(line));
    let rows = table.as_ref().map(|t| t.data_rows).unwrap_or(0);
    let terms = count(&RE_KPI, text) + count(&RE_PERCENT_TARGET, text);
    if table.is_none() && terms == 0 {
        return RawCheckResult::absent("No KPI table or quantified indicators found.");
    }

    let header = table.is_some();
    let confidence = (0.55 * flag(header) + 0.3 * sat(rows, 2) + 0.15 * sat(terms, 3)).min(1.0);
    let mut evidence = Evidence::new();
    if let Some(table) = &table {
        evidence = evidence.line(&table.header);
    }
    RawCheckResult::new(
        confidence,
        evidence
            .matches(&RE_KPI, text)
            .matches(&RE_PERCENT_TARGET, text)
            .into_vec(),
        format!(
            "Baseline/Target table {}, {} data row(s), {} indicator term(s): 0.55 × {} + 0.3 × sat({}, 2) + 0.15 × sat({}, 3) = {:.2}",
            yes_no(header),
            rows,
            terms,
            flag(header),
            rows,
            terms,
            confidence
        ),
    )
}

fn check_target_groups(text: &str) -> RawCheckResult {
    vocabulary_check(text, &RE_TARGET_GROUP, 4, "target group")
}

fn check_exploitation(text: &str) -> RawCheckResult {
    vocabulary_check(text, &RE_EXPLOITATION, 4, "exploitation term")
}

fn check_dissemination(text: &str) -> RawCheckResult {
    vocabulary_check(text, &RE_DISSEMINATION, 4, "dissemination channel")
}

/// 0.4 × open access + 0.35 × FAIR + 0.25 × sat(repositories and licences, 2)
fn check_open_access(text: &str) -> RawCheckResult {
    let oa = RE_OPEN_ACCESS.is_match(text);
    let fair = RE_FAIR.is_match(text);
    let repos = count(&RE_REPOSITORY, text);
    if !oa && !fair && repos == 0 {
        return RawCheckResult::absent("No open access or FAIR data commitment found.");
    }
    let confidence = (0.4 * flag(oa) + 0.35 * flag(fair) + 0.25 * sat(repos, 2)).min(1.0);
    RawCheckResult::new(
        confidence,
        Evidence::new()
            .matches(&RE_OPEN_ACCESS, text)
            .matches(&RE_FAIR, text)
            .matches(&RE_REPOSITORY, text)
            .into_vec(),
        format!(
            "open access {}, FAIR {}, {} repository mention(s): 0.4 × {} + 0.35 × {} + 0.25 × sat({}, 2) = {:.2}",
            yes_no(oa),
            yes_no(fair),
            repos,
            flag(oa),
            flag(fair),
            repos,
            confidence
        ),
    )
}

/// DMP × (0.5 + 0.25 × D1.1 + 0.25 × Month 6)
fn check_dmp(text: &str) -> RawCheckResult {
    if !RE_DMP.is_match(text) {
        return RawCheckResult::absent("No Data Management Plan mentioned.");
    }
    let d11 = RE_D1_1.is_match(text);
    let m6 = RE_MONTH_SIX.is_match(text);
    let confidence = 0.5 + 0.25 * flag(d11) + 0.25 * flag(m6);
    RawCheckResult::new(
        confidence,
        Evidence::new()
            .matches(&RE_DMP, text)
            .matches(&RE_D1_1, text)
            .into_vec(),
        format!(
            "DMP mentioned, D1.1 {}, Month 6 {}: 0.5 + 0.25 × {} + 0.25 × {} = {:.2}",
            yes_no(d11),
            yes_no(m6),
            flag(d11),
            flag(m6),
            confidence
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_kpi_table() {
        let draft = "
            | Indicator | Baseline | Target | Timeline |
            |-----------|----------|--------|---------|
            | Water use (m³/ha) | 500 | ≤425 | Month 44 |
            | Fertiliser (kg N) | 120 | ≤108 | Month 44 |
        ";
        let result = check_kpi_table(draft);
        assert!(result.found);
        assert!(result.confidence >= 0.80, "got {}", result.confidence);
    }

    #[test]
    fn test_percentage_targets_without_table() {
        let result = check_kpi_table(
            "We target ≥15% reduction in water use and ≥10% reduction in fertiliser.",
        );
        assert!(result.found);
        assert!(result.confidence > 0.0 && result.confidence < 0.80);
    }

    #[test]
    fn test_no_kpi_content() {
        let result = check_kpi_table(
            "The project will have positive impacts on farming communities in Europe.",
        );
        assert!(!result.found);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_kpi_evidence_includes_header() {
        let result = check_kpi_table("| Indicator | Baseline | Target |\n| Water | 500 | 425 |");
        assert!(result
            .evidence
            .iter()
            .any(|e| e.contains("Indicator") || e.contains("Baseline")));
    }

    #[test]
    fn test_open_access_and_fair() {
        let result = check_open_access(
            "All publications will be immediately open access. Data deposited in Zenodo following FAIR principles.",
        );
        assert!(result.confidence >= 0.75, "got {}", result.confidence);
        assert_eq!(check_open_access("Results will be shared with the consortium.").confidence, 0.0);
    }

    #[test]
    fn test_fair_is_case_sensitive() {
        assert_eq!(check_open_access("A fair share of the budget.").confidence, 0.0);
    }

    #[test]
    fn test_dmp_full_reference() {
        let result = check_dmp("A Data Management Plan (D1.1) will be submitted by Month 6.");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(check_dmp("Data will be collected from field sensors.").confidence, 0.0);
    }

    #[test]
    fn test_dmp_mention_alone_is_half() {
        let result = check_dmp("We will write a DMP.");
        assert!(result.found);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_expected_outcomes_linked() {
        let draft = "The project addresses the call's expected outcomes:\n- Expected Outcome 1 → delivered via our AI engine\n- Expected Outcome 2 → via WP5";
        let result = check_expected_outcomes(draft);
        assert!(result.confidence >= 0.9, "got {}", result.confidence);
    }
}
