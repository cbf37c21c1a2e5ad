//! Record schema validator
//!
//! Checks the top-level fields of a request record: identifier, the mutually
//! exclusive prompt fields, and the optional style description. The lyric
//! field is handled by [`super::lyric_corrector`].
//!
//! Order of checks:
//! 1. `idx` present and a non-empty string, else synthesized
//! 2. `prompt_audio_path` and `auto_prompt_audio_type` not both present
//! 3. `prompt_audio_path` is an existing file with the lossless extension
//! 4. `auto_prompt_audio_type` (if still present) names a supported genre
//! 5. `descriptions` is a non-empty attribute list

use super::style_validator::validate_descriptions;
use crate::diagnostics::{Diagnostics, FindingKind, Location};
use crate::genre::Genre;
use crate::record::{
    json_type_name, SongRecord, FIELD_DESCRIPTIONS, FIELD_GENRE, FIELD_ID, FIELD_REFERENCE_AUDIO,
};
use serde_json::Value;
use songgen_common::config::{
    ValidationConfig, DEFAULT_AUDIO_EXAMPLE, DEFAULT_AUDIO_EXTENSION,
};
use songgen_common::{uuid_utils, Error};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings the schema checks depend on
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRules {
    /// Required suffix for reference audio paths
    pub audio_extension: String,
    /// Example path quoted in suggestions
    pub audio_example: String,
    /// Base for relative reference audio paths
    pub audio_base_dir: Option<PathBuf>,
    /// Replacement for unsupported genre prompts
    pub default_genre: Genre,
}

impl Default for RecordRules {
    fn default() -> Self {
        Self {
            audio_extension: DEFAULT_AUDIO_EXTENSION.to_string(),
            audio_example: DEFAULT_AUDIO_EXAMPLE.to_string(),
            audio_base_dir: None,
            default_genre: Genre::Pop,
        }
    }
}

impl RecordRules {
    /// Build rules from the `[validation]` config section
    pub fn from_config(config: &ValidationConfig) -> songgen_common::Result<Self> {
        let default_genre = config.default_genre.parse::<Genre>().map_err(|e| {
            Error::Config(format!(
                "validation.default_genre: {} (allowed: {})",
                e,
                Genre::allowed_list()
            ))
        })?;
        Ok(Self {
            audio_extension: config.reference_audio_extension.clone(),
            audio_example: config.reference_audio_example.clone(),
            audio_base_dir: config.reference_audio_base_dir.clone(),
            default_genre,
        })
    }

    /// Location on disk of a reference audio path
    pub fn resolve_audio_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.audio_base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Corrected record plus findings
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub record: SongRecord,
    pub diagnostics: Diagnostics,
}

/// Validate and correct the top-level fields of one record
pub fn validate_record(record: SongRecord, line: usize, rules: &RecordRules) -> RecordOutcome {
    let location = Location::line(line);
    let mut record = record;
    let mut diagnostics = Diagnostics::new();

    check_identifier(&mut record, location, &mut diagnostics);
    check_prompt_exclusivity(&mut record, location, &mut diagnostics);
    check_reference_audio(&mut record, location, rules, &mut diagnostics);
    check_genre(&mut record, location, rules, &mut diagnostics);

    if let Some(value) = record.get(FIELD_DESCRIPTIONS) {
        let outcome = validate_descriptions(value, line);
        diagnostics.extend(outcome.diagnostics);
        if !outcome.keep {
            record.remove(FIELD_DESCRIPTIONS);
        }
    }

    RecordOutcome {
        record,
        diagnostics,
    }
}

fn check_identifier(record: &mut SongRecord, location: Location, diagnostics: &mut Diagnostics) {
    let problem = match record.get(FIELD_ID) {
        None => Some("Missing 'idx' field in JSON object"),
        Some(Value::String(id)) if !id.trim().is_empty() => None,
        Some(_) => Some("'idx' must be a non-empty string"),
    };
    let Some(problem) = problem else {
        return;
    };

    let missing = !record.contains(FIELD_ID);
    let new_id = uuid_utils::song_identifier(location.line);
    debug!(line = location.line, id = %new_id, "Synthesized song identifier");

    diagnostics.error(location, FindingKind::SchemaViolation, problem);
    let action = if missing {
        format!("Added missing 'idx' as '{}'", new_id)
    } else {
        format!("Replaced invalid 'idx' with '{}'", new_id)
    };
    diagnostics.correction(location, FindingKind::SchemaViolation, action);
    record.set(FIELD_ID, new_id);
}

fn check_prompt_exclusivity(
    record: &mut SongRecord,
    location: Location,
    diagnostics: &mut Diagnostics,
) {
    if !(record.contains(FIELD_REFERENCE_AUDIO) && record.contains(FIELD_GENRE)) {
        return;
    }
    diagnostics.error(
        location,
        FindingKind::SchemaViolation,
        "'prompt_audio_path' and 'auto_prompt_audio_type' cannot be used together",
    );
    diagnostics.correction(
        location,
        FindingKind::SchemaViolation,
        "Removed 'auto_prompt_audio_type' to enforce mutual exclusivity with 'prompt_audio_path'",
    );
    record.remove(FIELD_GENRE);
}

fn check_reference_audio(
    record: &mut SongRecord,
    location: Location,
    rules: &RecordRules,
    diagnostics: &mut Diagnostics,
) {
    let Some(value) = record.get(FIELD_REFERENCE_AUDIO) else {
        return;
    };

    let ext = &rules.audio_extension;
    let (problem, action) = match value {
        Value::String(path) if !path.ends_with(ext.as_str()) => (
            format!("'prompt_audio_path' must be a {} file", ext),
            format!("Removed invalid 'prompt_audio_path' (not {})", ext),
        ),
        Value::String(path) if !rules.resolve_audio_path(path).is_file() => (
            format!("'prompt_audio_path' file '{}' does not exist", path),
            "Removed invalid 'prompt_audio_path' (file not found)".to_string(),
        ),
        Value::String(_) => return,
        other => (
            format!("'prompt_audio_path' must be a string, found {}", json_type_name(other)),
            "Removed invalid 'prompt_audio_path'".to_string(),
        ),
    };

    diagnostics.error(location, FindingKind::SchemaViolation, problem);
    diagnostics.suggestion(
        location,
        FindingKind::SchemaViolation,
        format!(
            "Provide a valid {} file for 'prompt_audio_path', e.g., '{}'",
            ext, rules.audio_example
        ),
    );
    diagnostics.correction(location, FindingKind::SchemaViolation, action);
    record.remove(FIELD_REFERENCE_AUDIO);
}

fn check_genre(
    record: &mut SongRecord,
    location: Location,
    rules: &RecordRules,
    diagnostics: &mut Diagnostics,
) {
    if record.contains(FIELD_REFERENCE_AUDIO) {
        return;
    }
    let Some(value) = record.get(FIELD_GENRE) else {
        return;
    };
    if value.as_str().is_some_and(|g| g.parse::<Genre>().is_ok()) {
        return;
    }

    let shown = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    diagnostics.error(
        location,
        FindingKind::SchemaViolation,
        format!(
            "Invalid 'auto_prompt_audio_type' '{}'. Allowed genres: {}",
            shown,
            Genre::allowed_list()
        ),
    );
    diagnostics.correction(
        location,
        FindingKind::SchemaViolation,
        format!(
            "Replaced invalid 'auto_prompt_audio_type' '{}' with '{}'",
            shown, rules.default_genre
        ),
    );
    record.set(FIELD_GENRE, rules.default_genre.as_str());
}
