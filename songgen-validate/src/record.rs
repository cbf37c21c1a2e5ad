//! Song-generation request record
//!
//! A record is kept as an ordered JSON object so that fields this tool does
//! not know about, and the caller's key order, survive correction untouched.
//! Field names are shared with the generation pipeline and must not change.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Song identifier (also the generated audio file stem)
pub const FIELD_ID: &str = "idx";
/// Lyric text with structural tags
pub const FIELD_LYRIC: &str = "gt_lyric";
/// Reference audio path, exclusive with [`FIELD_GENRE`]
pub const FIELD_REFERENCE_AUDIO: &str = "prompt_audio_path";
/// Genre prompt, exclusive with [`FIELD_REFERENCE_AUDIO`]
pub const FIELD_GENRE: &str = "auto_prompt_audio_type";
/// Comma-separated style attributes
pub const FIELD_DESCRIPTIONS: &str = "descriptions";

/// Why a raw line could not become a record
#[derive(Debug, Error)]
pub enum RecordParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// One request record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongRecord {
    fields: Map<String, Value>,
}

impl SongRecord {
    /// Parse one input line; only JSON objects are records
    pub fn parse_line(line: &str) -> Result<Self, RecordParseError> {
        match serde_json::from_str::<Value>(line.trim())? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(RecordParseError::NotAnObject(json_type_name(&other))),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field value when it is a JSON string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Insert or replace a field; new keys go last, existing keys keep their slot
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Remove a field without disturbing the order of the others
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.fields.get(key).cloned();
        if removed.is_some() {
            self.fields.retain(|k, _| k != key);
        }
        removed
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str(FIELD_ID)
    }

    pub fn lyric(&self) -> Option<&str> {
        self.get_str(FIELD_LYRIC)
    }

    pub fn reference_audio_path(&self) -> Option<&str> {
        self.get_str(FIELD_REFERENCE_AUDIO)
    }

    pub fn genre_prompt(&self) -> Option<&str> {
        self.get_str(FIELD_GENRE)
    }

    /// Compact single-line JSON, keys in stored order
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.fields)
    }
}

/// JSON type name used in diagnostics
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object() {
        let record = SongRecord::parse_line(r#"{"idx":"a1","gt_lyric":"[verse] Hi"}"#).unwrap();
        assert_eq!(record.id(), Some("a1"));
        assert_eq!(record.lyric(), Some("[verse] Hi"));
        assert!(record.genre_prompt().is_none());
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(matches!(
            SongRecord::parse_line("[1, 2]"),
            Err(RecordParseError::NotAnObject("array"))
        ));
        assert!(matches!(
            SongRecord::parse_line("{\"idx\": "),
            Err(RecordParseError::InvalidJson(_))
        ));
        assert!(matches!(SongRecord::parse_line(""), Err(RecordParseError::InvalidJson(_))));
    }

    #[test]
    fn test_key_order_survives_edits() {
        let mut record =
            SongRecord::parse_line(r#"{"z":1,"idx":"a","gt_lyric":"x","extra":true}"#).unwrap();
        record.remove("idx");
        record.set("gt_lyric", "y");
        record.set("idx", "b");
        assert_eq!(
            record.to_json_line().unwrap(),
            r#"{"z":1,"gt_lyric":"y","extra":true,"idx":"b"}"#
        );
    }

    #[test]
    fn test_get_str_ignores_non_strings() {
        let record = SongRecord::parse_line(r#"{"idx":7}"#).unwrap();
        assert!(record.contains(FIELD_ID));
        assert!(record.id().is_none());
    }

    #[test]
    fn test_non_ascii_written_verbatim() {
        let record = SongRecord::parse_line(r#"{"gt_lyric":"[verse] 你好"}"#).unwrap();
        assert_eq!(record.to_json_line().unwrap(), r#"{"gt_lyric":"[verse] 你好"}"#);
    }
}
