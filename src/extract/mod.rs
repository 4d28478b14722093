// src/extract/mod.rs

//! Recover typed records from labelled sections of a [`Grid`].
//!
//! Extraction never fails. A missing section degrades to an empty or default
//! value and an unparseable number falls back to a per-field literal, so the
//! only error a caller can see is the fetch itself.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sheets::cell;

pub mod category;
pub mod dashboard;
pub mod flat;
pub mod section;
pub mod types;

pub use category::extract_category;
pub use dashboard::extract_dashboard;
pub use flat::{extract_flat_table, TableLabels, COMPETITOR_LABELS, METRIC_LABELS};
pub use section::{ScanState, SectionRows, SectionScan, Step};
pub use types::*;

static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("numeric prefix pattern should compile")
});

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern should compile"));

/// Lenient float read: leading whitespace is ignored and the longest numeric
/// prefix wins, so `"56%"` is 56. Non-finite results are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let prefix = NUMERIC_PREFIX.find(raw.trim_start())?;
    prefix
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// [`parse_number`] on a possibly absent cell, with a fallback.
pub fn number_or(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(parse_number).unwrap_or(default)
}

/// Metadata key for a header cell: drop `(`, `)` and `%`, lower-case, and
/// squeeze out all whitespace. `"Brand Visibility (%)"` → `"brandvisibility"`.
pub fn normalize_key(header: &str) -> String {
    let stripped: String = header
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '%'))
        .collect();
    WHITESPACE
        .replace_all(stripped.trim(), "")
        .to_lowercase()
}

/// True when the row's first cell is exactly `label`.
pub fn first_cell_is(row: &[String], label: &str) -> bool {
    cell(row, 0) == Some(label)
}

/// True when the row's first cell contains `marker`, ignoring case.
pub fn has_marker(row: &[String], marker: &str) -> bool {
    cell(row, 0)
        .map(|c| c.to_uppercase().contains(&marker.to_uppercase()))
        .unwrap_or(false)
}
