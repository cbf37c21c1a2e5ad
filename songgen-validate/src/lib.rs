//! songgen-validate library interface
//!
//! Validation and auto-correction engine for song-generation request streams
//! (newline-delimited JSON). Each record is checked against the structural
//! tag grammar and the request schema, repaired where possible, and
//! diagnosed. The corrected stream is what the generation pipeline consumes.

pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod genre;
pub mod grammar;
pub mod record;
pub mod report;
pub mod validators;

pub use crate::diagnostics::{Diagnostic, Diagnostics, FindingKind, Severity, Verdict};
pub use crate::driver::{default_output_path, process_line, StreamDriver};
pub use crate::error::{ValidateError, ValidateResult};
pub use crate::genre::Genre;
pub use crate::grammar::StructureTag;
pub use crate::record::SongRecord;
pub use crate::report::ValidationReport;
