//! Style description checks for the `descriptions` field
//!
//! Descriptions are advisory hints to generation. A malformed field is
//! removed, but an unrecognized attribute only produces a warning and the
//! text is kept as written.

use crate::diagnostics::{Diagnostics, FindingKind, Location};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Gender token, lowercase free-text phrase, or a BPM clause
static ATTRIBUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(male|female|[a-z\s]+|the bpm is \d+)$").expect("attribute pattern is valid")
});

/// Outcome of checking a `descriptions` value
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionOutcome {
    /// Field stays in the corrected record
    pub keep: bool,
    pub diagnostics: Diagnostics,
}

/// Whether a single trimmed attribute matches the recommended vocabulary
pub fn is_recognized_attribute(attribute: &str) -> bool {
    ATTRIBUTE_PATTERN.is_match(attribute)
}

/// Check a `descriptions` value
pub fn validate_descriptions(value: &Value, line: usize) -> DescriptionOutcome {
    let location = Location::line(line);
    let mut diagnostics = Diagnostics::new();

    let text = match value.as_str() {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            diagnostics.error(
                location,
                FindingKind::SchemaViolation,
                "'descriptions' must be a non-empty string",
            );
            diagnostics.correction(
                location,
                FindingKind::SchemaViolation,
                "Removed invalid 'descriptions'",
            );
            return DescriptionOutcome {
                keep: false,
                diagnostics,
            };
        }
    };

    let attributes: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect();

    if attributes.is_empty() {
        diagnostics.error(
            location,
            FindingKind::SchemaViolation,
            "'descriptions' must contain at least one attribute",
        );
        diagnostics.correction(
            location,
            FindingKind::SchemaViolation,
            "Removed empty 'descriptions'",
        );
        return DescriptionOutcome {
            keep: false,
            diagnostics,
        };
    }

    for attribute in attributes.iter().filter(|a| !is_recognized_attribute(a)) {
        diagnostics.warning(
            location,
            FindingKind::AdvisoryMismatch,
            format!(
                "Unrecognized attribute '{}' in 'descriptions'. Recommended: gender (male, female), \
                 timbre (dark, bright), genre (pop, jazz), emotion (sad, energetic), \
                 instrument (piano, drums), BPM (the bpm is 120)",
                attribute
            ),
        );
    }

    debug!(
        "Line {}: {} style attribute(s), {} unrecognized",
        line,
        attributes.len(),
        diagnostics.len()
    );
    DescriptionOutcome {
        keep: true,
        diagnostics,
    }
}
