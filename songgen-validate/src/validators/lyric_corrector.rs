//! Lyric segment validator and corrector
//!
//! The lyric field is a `;`-separated list of segments, each opening with a
//! bracketed structure tag. Every repair here is total: some well-formed
//! lyric always comes out. Repairs that only clean up formatting (tag
//! rewrites, stripped punctuation, emptied instrumental segments) are
//! reported as grammar findings. Repairs that have to invent lyric text are
//! reported as [`FindingKind::ContentFabrication`], which forces a manual
//! review verdict.
//!
//! Splitting and punctuation stripping work on `char`s, so non-Latin lyric
//! text is never cut inside a multi-byte sequence.

use crate::diagnostics::{Diagnostics, FindingKind, Location};
use crate::grammar::{
    has_disallowed, lookup_tag, placeholder_segment, split_tag, strip_disallowed, StructureTag,
    TagClass, TagLookup, PLACEHOLDER_SENTENCES, SEGMENT_DELIMITER, SEGMENT_JOINER,
    SENTENCE_JOINER, SENTENCE_TERMINATOR,
};
use crate::record::json_type_name;
use serde_json::Value;
use tracing::debug;

const SAMPLE_SENTENCES: &str = "Sample lyric one. Sample lyric two";

/// Corrected form of a single segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOutcome {
    /// Corrected segment text (`[tag]` or `[tag] content`)
    pub text: String,
    /// Segment carries a vocal tag after correction
    pub is_vocal: bool,
    pub diagnostics: Diagnostics,
}

/// Corrected form of a whole lyric field
#[derive(Debug, Clone, PartialEq)]
pub struct LyricOutcome {
    pub lyric: String,
    /// At least one vocal segment was present before any fallback was appended
    pub has_vocal: bool,
    pub diagnostics: Diagnostics,
}

impl LyricOutcome {
    fn placeholder(diagnostics: Diagnostics) -> Self {
        Self {
            lyric: placeholder_segment(),
            has_vocal: true,
            diagnostics,
        }
    }
}

/// Correct the raw `gt_lyric` value of a record, whatever its JSON shape
///
/// A missing or non-string field cannot be salvaged and is replaced with the
/// placeholder lyric.
pub fn correct_lyric_field(value: Option<&Value>, line: usize) -> LyricOutcome {
    let location = Location::line(line);
    match value {
        Some(Value::String(raw)) => correct_lyric(raw, line),
        Some(other) => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.error(
                location,
                FindingKind::SchemaViolation,
                format!("'gt_lyric' must be a string, found {}", json_type_name(other)),
            );
            diagnostics.correction(
                location,
                FindingKind::ContentFabrication,
                "Replaced non-string 'gt_lyric' with placeholder lyrics",
            );
            LyricOutcome::placeholder(diagnostics)
        }
        None => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.error(
                location,
                FindingKind::SchemaViolation,
                "Missing 'gt_lyric' field in JSON object",
            );
            diagnostics.correction(
                location,
                FindingKind::ContentFabrication,
                "Added placeholder lyrics to 'gt_lyric'",
            );
            LyricOutcome::placeholder(diagnostics)
        }
    }
}

/// Validate and correct a lyric string
pub fn correct_lyric(raw: &str, line: usize) -> LyricOutcome {
    let location = Location::line(line);
    let mut diagnostics = Diagnostics::new();

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        diagnostics.error(location, FindingKind::SchemaViolation, "'gt_lyric' is empty");
        diagnostics.correction(
            location,
            FindingKind::ContentFabrication,
            "Replaced empty 'gt_lyric' with placeholder lyrics",
        );
        return LyricOutcome::placeholder(diagnostics);
    }

    let segments: Vec<&str> = trimmed
        .split(SEGMENT_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        diagnostics.error(
            location,
            FindingKind::GrammarViolation,
            "No segments found in 'gt_lyric'",
        );
        diagnostics.correction(
            location,
            FindingKind::ContentFabrication,
            "Replaced empty segments with placeholder lyrics",
        );
        return LyricOutcome::placeholder(diagnostics);
    }

    let mut corrected = Vec::with_capacity(segments.len() + 1);
    let mut has_vocal = false;
    for (index, segment) in segments.iter().enumerate() {
        let outcome = validate_segment(segment, Location::segment(line, index + 1));
        has_vocal |= outcome.is_vocal;
        diagnostics.extend(outcome.diagnostics);
        corrected.push(outcome.text);
    }

    if !has_vocal {
        let vocal_tags = StructureTag::tokens_of(TagClass::Vocal);
        diagnostics.error(
            location,
            FindingKind::GrammarViolation,
            format!("Lyrics must contain at least one vocal segment: {}", vocal_tags),
        );
        diagnostics.suggestion(
            location,
            FindingKind::ContentFabrication,
            format!(
                "Add a vocal segment (e.g., [verse]) with lyrics, e.g., '[verse] {}'",
                SAMPLE_SENTENCES
            ),
        );
        corrected.push(placeholder_segment());
        diagnostics.correction(
            location,
            FindingKind::ContentFabrication,
            "Added '[verse]' with placeholder lyrics due to missing vocal segment",
        );
    }

    debug!(line, segments = corrected.len(), has_vocal, "Lyric corrected");

    LyricOutcome {
        lyric: corrected.join(SEGMENT_JOINER),
        has_vocal,
        diagnostics,
    }
}

/// Validate and correct one trimmed, non-empty segment
pub fn validate_segment(segment: &str, location: Location) -> SegmentOutcome {
    let mut diagnostics = Diagnostics::new();

    let Some((token, content)) = split_tag(segment) else {
        diagnostics.error(
            location,
            FindingKind::GrammarViolation,
            "Segment does not start with a structure tag",
        );
        diagnostics.correction(
            location,
            FindingKind::ContentFabrication,
            "Replaced invalid segment with '[verse]' and placeholder lyrics",
        );
        return SegmentOutcome {
            text: placeholder_segment(),
            is_vocal: true,
            diagnostics,
        };
    };

    let tag = resolve_tag(token, content, location, &mut diagnostics);

    let content = match tag.class() {
        TagClass::Vocal => correct_vocal_content(tag, content, location, &mut diagnostics),
        TagClass::NonVocal => {
            if !content.is_empty() {
                diagnostics.error(
                    location,
                    FindingKind::GrammarViolation,
                    format!("Non-vocal segment '{}' must not contain lyrics", tag),
                );
                diagnostics.correction(
                    location,
                    FindingKind::GrammarViolation,
                    format!("Removed lyrics from non-vocal segment '{}'", tag),
                );
            }
            String::new()
        }
    };

    let text = if content.is_empty() {
        tag.token().to_string()
    } else {
        format!("{} {}", tag, content)
    };

    SegmentOutcome {
        text,
        is_vocal: tag.is_vocal(),
        diagnostics,
    }
}

/// Map a raw token onto the grammar, rewriting forbidden and unknown tags
fn resolve_tag(
    token: &str,
    content: &str,
    location: Location,
    diagnostics: &mut Diagnostics,
) -> StructureTag {
    match lookup_tag(token) {
        TagLookup::Known(tag) => tag,
        TagLookup::Forbidden => {
            let replacement = if content.is_empty() {
                StructureTag::InstMedium
            } else {
                StructureTag::Verse
            };
            diagnostics.error(
                location,
                FindingKind::GrammarViolation,
                format!("Forbidden tag '{}' used (unstable)", token),
            );
            diagnostics.correction(
                location,
                FindingKind::GrammarViolation,
                format!("Replaced forbidden tag '{}' with '{}'", token, replacement),
            );
            replacement
        }
        TagLookup::Unknown => {
            let replacement = if content.is_empty() {
                StructureTag::IntroMedium
            } else {
                StructureTag::Verse
            };
            diagnostics.error(
                location,
                FindingKind::GrammarViolation,
                format!(
                    "Invalid structure tag '{}'. Allowed tags: {}",
                    token,
                    StructureTag::all_tokens()
                ),
            );
            diagnostics.correction(
                location,
                FindingKind::GrammarViolation,
                format!("Replaced invalid tag '{}' with '{}'", token, replacement),
            );
            replacement
        }
    }
}

/// Normalize the sentences of a vocal segment
fn correct_vocal_content(
    tag: StructureTag,
    content: &str,
    location: Location,
    diagnostics: &mut Diagnostics,
) -> String {
    if content.is_empty() {
        diagnostics.error(
            location,
            FindingKind::GrammarViolation,
            format!("Vocal segment '{}' must contain at least one lyric sentence", tag),
        );
        diagnostics.suggestion(
            location,
            FindingKind::ContentFabrication,
            format!(
                "Add at least one lyric sentence to '{}', e.g., '{}'",
                tag, SAMPLE_SENTENCES
            ),
        );
        diagnostics.correction(
            location,
            FindingKind::ContentFabrication,
            format!("Added placeholder lyrics to empty '{}'", tag),
        );
        return PLACEHOLDER_SENTENCES.to_string();
    }

    let sentences: Vec<&str> = content
        .split(SENTENCE_TERMINATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut corrected = Vec::with_capacity(sentences.len());
    for sentence in &sentences {
        if !has_disallowed(sentence) {
            corrected.push(sentence.to_string());
            continue;
        }
        let cleaned = strip_disallowed(sentence);
        diagnostics.warning(
            location,
            FindingKind::GrammarViolation,
            format!(
                "Unsupported punctuation in lyric sentence '{}'. Only periods are allowed between sentences",
                sentence
            ),
        );
        diagnostics.correction(
            location,
            FindingKind::GrammarViolation,
            format!(
                "Removed unsupported punctuation from '{}' to '{}'",
                sentence, cleaned
            ),
        );
        // A sentence made only of punctuation disappears entirely
        if !cleaned.is_empty() {
            corrected.push(cleaned);
        }
    }

    if corrected.is_empty() {
        diagnostics.error(
            location,
            FindingKind::GrammarViolation,
            format!(
                "Vocal segment '{}' must contain valid lyric sentences separated by periods",
                tag
            ),
        );
        diagnostics.suggestion(
            location,
            FindingKind::ContentFabrication,
            format!(
                "Add valid lyric sentences to '{}', e.g., '{}'",
                tag, SAMPLE_SENTENCES
            ),
        );
        diagnostics.correction(
            location,
            FindingKind::ContentFabrication,
            "Replaced invalid lyrics with placeholder lyrics",
        );
        return PLACEHOLDER_SENTENCES.to_string();
    }

    corrected.join(SENTENCE_JOINER)
}
