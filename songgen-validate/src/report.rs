//! Validation report
//!
//! Console rendering groups findings into flat sections (errors, warnings,
//! corrections, suggestions) followed by a single summary line. The same
//! report can be exported as JSON.

use crate::diagnostics::{Diagnostics, Severity, Verdict};
use crate::driver::ProcessedStream;
use crate::error::{ValidateError, ValidateResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Outcome of one validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub lines_read: usize,
    pub records_written: usize,
    pub lines_dropped: usize,
    pub verdict: Verdict,
    pub diagnostics: Diagnostics,
}

impl ValidationReport {
    pub fn new(input: &Path, output: &Path, stream: ProcessedStream) -> Self {
        Self {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            generated_at: Utc::now(),
            lines_read: stream.lines_read,
            records_written: stream.records.len(),
            lines_dropped: stream.lines_dropped,
            verdict: stream.diagnostics.verdict(),
            diagnostics: stream.diagnostics,
        }
    }

    /// Section listing followed by the summary line
    pub fn render(&self) -> String {
        let mut out = String::new();
        let sections = [
            (Severity::Error, "Errors found:"),
            (Severity::Warning, "Warnings:"),
            (Severity::Correction, "Corrections applied:"),
            (Severity::Suggestion, "Suggestions for manual fixes:"),
        ];
        for (severity, heading) in sections {
            let mut entries = self.diagnostics.with_severity(severity).peekable();
            if entries.peek().is_none() {
                continue;
            }
            let _ = writeln!(out, "{}", heading);
            for diagnostic in entries {
                let _ = writeln!(out, "  - {}", diagnostic);
            }
        }
        let _ = writeln!(out, "{}", self.summary_line());
        out
    }

    pub fn summary_line(&self) -> String {
        match self.verdict {
            Verdict::Clean => format!(
                "Validation successful [{}]: No errors or warnings found in '{}'. Output written to '{}'",
                self.verdict,
                self.input_path.display(),
                self.output_path.display()
            ),
            Verdict::AutoCorrected => format!(
                "Validation completed [{}]: All errors were auto-corrected. Corrected file saved to '{}'",
                self.verdict,
                self.output_path.display()
            ),
            Verdict::ManualFixRequired => format!(
                "Validation completed [{}]: Some errors were auto-corrected, but manual fixes are needed. \
                 Partially corrected file saved to '{}'",
                self.verdict,
                self.output_path.display()
            ),
        }
    }

    /// Final one-sentence outcome printed after the report
    pub fn closing_line(&self) -> &'static str {
        if self.verdict.is_acceptable() {
            "JSONL file is valid or was fully corrected for song generation"
        } else {
            "JSONL file contains errors requiring manual fixes"
        }
    }

    /// Write the report as pretty JSON
    pub fn export_json(&self, path: &Path) -> ValidateResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json + "\n").map_err(|source| ValidateError::WriteOutput {
            path: path.to_path_buf(),
            source,
        })
    }
}
