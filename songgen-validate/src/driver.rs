//! Stream driver
//!
//! Reads newline-delimited request records, validates each line, and writes
//! the corrected stream in input order. Lines are independent: each one is
//! parsed, corrected and diagnosed on its own, so with more than one worker
//! they are spread over a fixed pool of threads and re-ordered by line number
//! before writing.

use crate::diagnostics::{Diagnostics, FindingKind, Location};
use crate::error::{ValidateError, ValidateResult};
use crate::record::{RecordParseError, SongRecord, FIELD_LYRIC};
use crate::report::ValidationReport;
use crate::validators::{correct_lyric_field, validate_record, RecordRules};
use songgen_common::config::ValidatorConfig;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info, warn};

/// Result of validating one input line
#[derive(Debug, Clone, PartialEq)]
pub struct LineResult {
    /// 1-based input line number
    pub line_number: usize,
    /// Corrected record, `None` when the line was dropped
    pub record: Option<SongRecord>,
    pub diagnostics: Diagnostics,
}

/// All corrected records and merged diagnostics of one stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedStream {
    pub records: Vec<SongRecord>,
    pub diagnostics: Diagnostics,
    pub lines_read: usize,
    pub lines_dropped: usize,
}

/// Validate and correct one raw input line
pub fn process_line(line_number: usize, text: &str, rules: &RecordRules) -> LineResult {
    let record = match SongRecord::parse_line(text) {
        Ok(record) => record,
        Err(e) => {
            warn!(line = line_number, error = %e, "Dropping malformed line");
            return LineResult {
                line_number,
                record: None,
                diagnostics: malformed_line(line_number, &e),
            };
        }
    };

    let outcome = validate_record(record, line_number, rules);
    let mut record = outcome.record;
    let mut diagnostics = outcome.diagnostics;

    let lyric = correct_lyric_field(record.get(FIELD_LYRIC), line_number);
    record.set(FIELD_LYRIC, lyric.lyric);
    diagnostics.extend(lyric.diagnostics);

    debug!(line = line_number, findings = diagnostics.len(), "Line validated");

    LineResult {
        line_number,
        record: Some(record),
        diagnostics,
    }
}

fn malformed_line(line_number: usize, error: &RecordParseError) -> Diagnostics {
    let location = Location::line(line_number);
    let mut diagnostics = Diagnostics::new();
    let message = match error {
        RecordParseError::InvalidJson(_) => "Invalid JSON format".to_string(),
        RecordParseError::NotAnObject(kind) => {
            format!("Invalid JSON format: expected an object, found {}", kind)
        }
    };
    diagnostics.error(location, FindingKind::MalformedRecord, message);
    diagnostics.suggestion(
        location,
        FindingKind::MalformedRecord,
        "Ensure the line is valid JSON (e.g., check quotes, commas)",
    );
    diagnostics
}

/// Default output location: `corrected_<input file name>` beside the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.jsonl".to_string());
    input.with_file_name(format!("corrected_{}", name))
}

/// Write records as newline-delimited JSON
pub fn write_records<W: Write>(records: &[SongRecord], writer: &mut W) -> io::Result<()> {
    for record in records {
        let line = record.to_json_line().map_err(io::Error::from)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Drives validation over a whole record stream
#[derive(Debug, Clone)]
pub struct StreamDriver {
    rules: RecordRules,
    workers: usize,
}

impl Default for StreamDriver {
    fn default() -> Self {
        Self::new(RecordRules::default(), 1)
    }
}

impl StreamDriver {
    /// Create driver; `workers` below 1 is treated as 1
    pub fn new(rules: RecordRules, workers: usize) -> Self {
        Self {
            rules,
            workers: workers.max(1),
        }
    }

    pub fn from_config(config: &ValidatorConfig) -> ValidateResult<Self> {
        let rules = RecordRules::from_config(&config.validation)?;
        Ok(Self::new(rules, config.runtime.workers))
    }

    /// Validate every line of `reader`
    pub fn process_reader<R: BufRead>(&self, reader: R) -> io::Result<ProcessedStream> {
        let lines = reader.lines().collect::<io::Result<Vec<String>>>()?;
        Ok(self.process_lines(lines))
    }

    /// Validate already-split lines (numbered from 1)
    pub fn process_lines(&self, lines: Vec<String>) -> ProcessedStream {
        let lines_read = lines.len();
        let mut results = if self.workers > 1 && lines_read > 1 {
            self.process_parallel(&lines)
        } else {
            lines
                .iter()
                .enumerate()
                .map(|(i, text)| process_line(i + 1, text, &self.rules))
                .collect()
        };

        flag_duplicate_ids(&mut results);

        let mut stream = ProcessedStream {
            lines_read,
            ..ProcessedStream::default()
        };
        for result in results {
            stream.diagnostics.extend(result.diagnostics);
            match result.record {
                Some(record) => stream.records.push(record),
                None => stream.lines_dropped += 1,
            }
        }
        stream
    }

    /// Fixed worker pool; results come back in input order
    fn process_parallel(&self, lines: &[String]) -> Vec<LineResult> {
        let workers = self.workers.min(lines.len());
        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            for worker_id in 0..workers {
                let tx = tx.clone();
                let next = &next;
                let rules = &self.rules;
                scope.spawn(move || {
                    let mut handled = 0usize;
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(text) = lines.get(index) else {
                            break;
                        };
                        if tx.send(process_line(index + 1, text, rules)).is_err() {
                            break;
                        }
                        handled += 1;
                    }
                    debug!(worker_id, handled, "Validation worker finished");
                });
            }
        });
        drop(tx);

        let mut results: Vec<LineResult> = rx.into_iter().collect();
        results.sort_by_key(|r| r.line_number);
        results
    }

    /// Validate `input` and write the corrected stream to `output`
    pub fn run(&self, input: &Path, output: &Path) -> ValidateResult<ValidationReport> {
        if !input.exists() {
            return Err(ValidateError::InputNotFound(input.to_path_buf()));
        }
        info!(input = %input.display(), workers = self.workers, "Validating request stream");

        let read_error = |source| ValidateError::ReadInput {
            path: input.to_path_buf(),
            source,
        };
        let file = File::open(input).map_err(read_error)?;
        let stream = self.process_reader(BufReader::new(file)).map_err(read_error)?;

        let write_error = |source| ValidateError::WriteOutput {
            path: output.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(output).map_err(write_error)?);
        write_records(&stream.records, &mut writer).map_err(write_error)?;
        writer.flush().map_err(write_error)?;

        info!(
            lines = stream.lines_read,
            written = stream.records.len(),
            dropped = stream.lines_dropped,
            output = %output.display(),
            "Corrected stream written"
        );

        Ok(ValidationReport::new(input, output, stream))
    }
}

/// Warn on identifiers already used by an earlier line
///
/// The generator names its audio after `idx`, so a repeat silently
/// overwrites the earlier song. Records are left as they are.
fn flag_duplicate_ids(results: &mut [LineResult]) {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for result in results.iter_mut() {
        let Some(id) = result.record.as_ref().and_then(|r| r.id()) else {
            continue;
        };
        match first_seen.get(id) {
            Some(&first_line) => {
                let message = format!(
                    "'idx' '{}' duplicates line {}; generated audio for both records shares one file name",
                    id, first_line
                );
                result.diagnostics.warning(
                    Location::line(result.line_number),
                    FindingKind::AdvisoryMismatch,
                    message,
                );
            }
            None => {
                first_seen.insert(id.to_string(), result.line_number);
            }
        }
    }
}
