//! Signal Catalogue: the fixed set of content signals scored per criterion
//!
//! Every signal is a pure function of the draft text. Counts are turned into
//! confidences with [`sat`]; composite signals combine several sub-checks with
//! fixed weights and spell out the substituted formula in their `detail`.
//!
//! The catalogue is built once per process and only ever read afterwards.

mod excellence;
mod impact;
mod implementation;

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use crate::types::{CriterionId, RawCheckResult, SignalResult};
use crate::{EVIDENCE_MAX_CHARS, EVIDENCE_MAX_SNIPPETS};

lazy_static! {
    static ref CATALOGUE: SignalCatalogue = SignalCatalogue::build();

    // =========================================================================
    // Markdown tables: a row starts and ends with a pipe, separators are
    // made only of pipes, colons, dashes and spaces
    // =========================================================================
    static ref RE_TABLE_LINE: Regex = Regex::new(r"^\s*\|.*\|").unwrap();
    static ref RE_TABLE_SEPARATOR: Regex = Regex::new(r"^[\s|:\-]+$").unwrap();
    static ref RE_DIGIT: Regex = Regex::new(r"\d").unwrap();
}

/// Detection capability shared by every signal
pub trait SignalCheck: Send + Sync {
    fn check(&self, draft: &str) -> RawCheckResult;
}

impl<F> SignalCheck for F
where
    F: Fn(&str) -> RawCheckResult + Send + Sync,
{
    fn check(&self, draft: &str) -> RawCheckResult {
        self(draft)
    }
}

/// Static definition of one content signal
pub struct Signal {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub criterion: CriterionId,
    /// Share of the criterion's coverage
    pub weight: f64,
    /// Load-bearing for passing the criterion threshold
    pub required_for_threshold: bool,
    pub section_hint: &'static str,
    pub how_to_fix: &'static str,
    pub time_estimate_minutes: u32,
    pub check: Box<dyn SignalCheck>,
}

impl Signal {
    /// Run the check and merge its result with this signal's metadata
    pub fn run(&self, draft: &str) -> SignalResult {
        let raw = self.check.check(draft);
        SignalResult {
            signal_id: self.id.to_string(),
            label: self.label.to_string(),
            description: self.description.to_string(),
            criterion: self.criterion,
            weight: self.weight,
            required_for_threshold: self.required_for_threshold,
            section_hint: self.section_hint.to_string(),
            how_to_fix: self.how_to_fix.to_string(),
            time_estimate_minutes: self.time_estimate_minutes,
            found: raw.found,
            confidence: raw.confidence,
            evidence: raw.evidence,
            detail: raw.detail,
        }
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("criterion", &self.criterion)
            .field("weight", &self.weight)
            .field("required_for_threshold", &self.required_for_threshold)
            .finish_non_exhaustive()
    }
}

/// Immutable registry of all signals
#[derive(Debug)]
pub struct SignalCatalogue {
    signals: Vec<Signal>,
}

impl SignalCatalogue {
    fn build() -> Self {
        let mut signals = excellence::signals();
        signals.extend(impact::signals());
        signals.extend(implementation::signals());
        Self { signals }
    }

    pub fn all(&self) -> &[Signal] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.id == id)
    }

    /// Signals of one criterion, in catalogue order
    pub fn for_criterion(&self, criterion: CriterionId) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(move |s| s.criterion == criterion)
    }

    pub fn weight_total(&self, criterion: CriterionId) -> f64 {
        self.for_criterion(criterion).map(|s| s.weight).sum()
    }
}

/// The process-wide catalogue
pub fn catalogue() -> &'static SignalCatalogue {
    &CATALOGUE
}

// =============================================================================
// SHARED DETECTION HELPERS
// =============================================================================

/// Saturation: `min(1, count / saturation)`
pub fn sat(count: usize, saturation: usize) -> f64 {
    if saturation == 0 {
        return if count > 0 { 1.0 } else { 0.0 };
    }
    (count as f64 / saturation as f64).min(1.0)
}

/// 1.0 when the sub-check holds
pub(crate) fn flag(present: bool) -> f64 {
    if present {
        1.0
    } else {
        0.0
    }
}

pub(crate) fn yes_no(present: bool) -> &'static str {
    if present {
        "yes"
    } else {
        "no"
    }
}

pub(crate) fn count(re: &Regex, text: &str) -> usize {
    re.find_iter(text).count()
}

/// Number of distinct values of capture group 1
pub(crate) fn distinct(re: &Regex, text: &str) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    for caps in re.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            if !seen.contains(&m.as_str()) {
                seen.push(m.as_str());
            }
        }
    }
    seen.len()
}

pub(crate) fn table_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| RE_TABLE_LINE.is_match(line))
}

/// A Markdown table whose header row satisfied a predicate
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableScan {
    pub header: String,
    /// Non-separator rows below a matching header that contain a number
    pub data_rows: usize,
}

/// Walk the draft's tables looking for a header row; rows are counted until the table ends
pub(crate) fn find_table<P>(text: &str, is_header: P) -> Option<TableScan>
where
    P: Fn(&str) -> bool,
{
    let mut scan: Option<TableScan> = None;
    let mut inside = false;

    for line in text.lines() {
        if !RE_TABLE_LINE.is_match(line) {
            inside = false;
            continue;
        }
        if !inside && is_header(line) {
            inside = true;
            if scan.is_none() {
                scan = Some(TableScan {
                    header: line.to_string(),
                    data_rows: 0,
                });
            }
            continue;
        }
        if inside && !RE_TABLE_SEPARATOR.is_match(line) && RE_DIGIT.is_match(line) {
            if let Some(scan) = scan.as_mut() {
                scan.data_rows += 1;
            }
        }
    }
    scan
}

/// Collects up to three verbatim excerpts: the trimmed line around each match
#[derive(Debug, Default)]
pub(crate) struct Evidence {
    excerpts: Vec<String>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_full(&self) -> bool {
        self.excerpts.len() >= EVIDENCE_MAX_SNIPPETS
    }

    pub fn line(mut self, line: &str) -> Self {
        let trimmed = line.trim();
        if self.is_full() || trimmed.is_empty() {
            return self;
        }
        let excerpt = truncate_excerpt(trimmed);
        if !self.excerpts.contains(&excerpt) {
            self.excerpts.push(excerpt);
        }
        self
    }

    pub fn matches(mut self, re: &Regex, text: &str) -> Self {
        for m in re.find_iter(text) {
            if self.is_full() {
                break;
            }
            let start = text[..m.start()].rfind('\n').map(|i| i + 1).unwrap_or(0);
            let end = text[m.end()..]
                .find('\n')
                .map(|i| m.end() + i)
                .unwrap_or(text.len());
            self = self.line(&text[start..end]);
        }
        self
    }

    pub fn into_vec(self) -> Vec<String> {
        self.excerpts
    }
}

/// Cut to EVIDENCE_MAX_CHARS characters, ellipsis included
fn truncate_excerpt(line: &str) -> String {
    if line.chars().count() <= EVIDENCE_MAX_CHARS {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(EVIDENCE_MAX_CHARS - 1).collect();
    cut.push('…');
    cut
}

/// Single-pattern vocabulary signal: `sat(matches, saturation)`
pub(crate) fn vocabulary_check(
    text: &str,
    re: &Regex,
    saturation: usize,
    noun: &str,
) -> RawCheckResult {
    let n = count(re, text);
    if n == 0 {
        return RawCheckResult::absent(format!("No {} found.", noun));
    }
    let confidence = sat(n, saturation);
    RawCheckResult::new(
        confidence,
        Evidence::new().matches(re, text).into_vec(),
        format!(
            "{} {} mention(s): sat({}, {}) = {:.2}",
            n, noun, n, saturation, confidence
        ),
    )
}

// =============================================================================
// TESTS
// =============================================================================
