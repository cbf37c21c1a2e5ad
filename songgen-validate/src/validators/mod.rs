//! Validation layer
//!
//! Each validator is a pure function from a raw value to a corrected value
//! plus the diagnostics it produced. The stream driver composes them per line.
//!
//! # Validators
//! 1. **record_validator** - Top-level schema fields
//! 2. **lyric_corrector** - Lyric segments and sentences
//! 3. **style_validator** - Advisory style attributes

pub mod lyric_corrector;
pub mod record_validator;
pub mod style_validator;

pub use lyric_corrector::{correct_lyric, correct_lyric_field, validate_segment, LyricOutcome, SegmentOutcome};
pub use record_validator::{validate_record, RecordOutcome, RecordRules};
pub use style_validator::{validate_descriptions, DescriptionOutcome};
