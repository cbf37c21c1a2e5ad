//! Diagnostics collected while validating a request stream
//!
//! Diagnostics are append-only values scoped to one input line. They never
//! touch the record they describe; the driver merges them in line order and
//! derives the file-level [`Verdict`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Report section a diagnostic belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Correction,
    Suggestion,
}

/// What went wrong, independent of how it is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    /// Line is not a JSON object; dropped from output
    MalformedRecord,
    /// Missing or invalid top-level field; replaced or removed
    SchemaViolation,
    /// Bad structural tag or segment shape; rewritten
    GrammarViolation,
    /// Placeholder content had to be invented
    ContentFabrication,
    /// Unrecognized advisory value; reported only
    AdvisoryMismatch,
}

impl FindingKind {
    /// Findings whose repair leaves a record that is not trustworthy as-is
    pub fn requires_manual_fix(&self) -> bool {
        matches!(self, FindingKind::MalformedRecord | FindingKind::ContentFabrication)
    }
}

/// Position of a finding in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub segment: Option<usize>,
}

impl Location {
    pub fn line(line: usize) -> Self {
        Self { line, segment: None }
    }

    pub fn segment(line: usize, segment: usize) -> Self {
        Self {
            line,
            segment: Some(segment),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segment {
            Some(segment) => write!(f, "Line {}, Segment {}", self.line, segment),
            None => write!(f, "Line {}", self.line),
        }
    }
}

/// One finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line_number: usize,
    pub segment_number: Option<usize>,
    pub severity: Severity,
    pub kind: FindingKind,
    pub message: String,
}

impl Diagnostic {
    pub fn location(&self) -> Location {
        Location {
            line: self.line_number,
            segment: self.segment_number,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self.message)
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        location: Location,
        severity: Severity,
        kind: FindingKind,
        message: impl Into<String>,
    ) {
        self.items.push(Diagnostic {
            line_number: location.line,
            segment_number: location.segment,
            severity,
            kind,
            message: message.into(),
        });
    }

    pub fn error(&mut self, location: Location, kind: FindingKind, message: impl Into<String>) {
        self.push(location, Severity::Error, kind, message);
    }

    pub fn warning(&mut self, location: Location, kind: FindingKind, message: impl Into<String>) {
        self.push(location, Severity::Warning, kind, message);
    }

    pub fn correction(&mut self, location: Location, kind: FindingKind, message: impl Into<String>) {
        self.push(location, Severity::Correction, kind, message);
    }

    pub fn suggestion(&mut self, location: Location, kind: FindingKind, message: impl Into<String>) {
        self.push(location, Severity::Suggestion, kind, message);
    }

    /// Append another collection, keeping its order
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Findings of one severity, in order
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.severity == severity)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.with_severity(severity).count()
    }

    pub fn requires_manual_fix(&self) -> bool {
        self.items.iter().any(|d| d.kind.requires_manual_fix())
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_diagnostics(self)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// File-level classification driving the exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// No errors or warnings
    Clean,
    /// Every finding was repaired mechanically
    AutoCorrected,
    /// At least one repair fabricated content or a line was dropped
    ManualFixRequired,
}

impl Verdict {
    pub fn from_diagnostics(diagnostics: &Diagnostics) -> Self {
        if diagnostics.requires_manual_fix() {
            Verdict::ManualFixRequired
        } else if diagnostics
            .iter()
            .any(|d| matches!(d.severity, Severity::Error | Severity::Warning))
        {
            Verdict::AutoCorrected
        } else {
            Verdict::Clean
        }
    }

    /// Whether the corrected stream may be fed downstream untouched
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, Verdict::ManualFixRequired)
    }

    /// Process exit status for this verdict
    pub fn exit_status(&self) -> u8 {
        if self.is_acceptable() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verdict::Clean => "Clean",
            Verdict::AutoCorrected => "AutoCorrected",
            Verdict::ManualFixRequired => "ManualFixRequired",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(Location::line(3).to_string(), "Line 3");
        assert_eq!(Location::segment(3, 2).to_string(), "Line 3, Segment 2");
    }

    #[test]
    fn test_empty_is_clean() {
        assert_eq!(Diagnostics::new().verdict(), Verdict::Clean);
    }

    #[test]
    fn test_suggestion_alone_stays_clean() {
        let mut d = Diagnostics::new();
        d.suggestion(Location::line(1), FindingKind::SchemaViolation, "hint");
        assert_eq!(d.verdict(), Verdict::Clean);
    }

    #[test]
    fn test_warning_is_auto_corrected() {
        let mut d = Diagnostics::new();
        d.warning(Location::line(1), FindingKind::AdvisoryMismatch, "odd attribute");
        assert_eq!(d.verdict(), Verdict::AutoCorrected);
        assert_eq!(d.verdict().exit_status(), 0);
    }

    #[test]
    fn test_fabrication_forces_manual_fix() {
        let mut d = Diagnostics::new();
        d.error(Location::line(1), FindingKind::SchemaViolation, "bad idx");
        d.correction(Location::segment(1, 1), FindingKind::ContentFabrication, "placeholder");
        assert_eq!(d.verdict(), Verdict::ManualFixRequired);
        assert_eq!(d.verdict().exit_status(), 1);
    }

    #[test]
    fn test_severity_filter_keeps_order() {
        let mut d = Diagnostics::new();
        d.error(Location::line(1), FindingKind::SchemaViolation, "a");
        d.correction(Location::line(1), FindingKind::SchemaViolation, "b");
        d.error(Location::line(2), FindingKind::GrammarViolation, "c");
        let errors: Vec<_> = d.with_severity(Severity::Error).map(|x| x.message.as_str()).collect();
        assert_eq!(errors, ["a", "c"]);
        assert_eq!(d.count(Severity::Correction), 1);
        assert_eq!(d.iter().nth(1).unwrap().to_string(), "Line 1: b");
    }
}
