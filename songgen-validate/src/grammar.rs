//! Structural tag grammar for lyric segments
//!
//! Tags are a closed set split into vocal tags (carry lyric sentences) and
//! non-vocal tags (carry no text). The bare `[inst]` marker is recognized but
//! forbidden; it is always rewritten.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between segments in the lyric field
pub const SEGMENT_DELIMITER: char = ';';

/// Separator used when re-joining corrected segments
pub const SEGMENT_JOINER: &str = "; ";

/// Terminator between lyric sentences
pub const SENTENCE_TERMINATOR: char = '.';

/// Separator used when re-joining corrected sentences
pub const SENTENCE_JOINER: &str = ". ";

/// Punctuation that may not appear inside a lyric sentence
pub const DISALLOWED_PUNCTUATION: [char; 4] = [',', '!', '?', ';'];

/// Forbidden tag token (unstable in generation)
pub const FORBIDDEN_TAG: &str = "[inst]";

/// Filler sentences used when a vocal segment has nothing salvageable
pub const PLACEHOLDER_SENTENCES: &str = "Placeholder lyric one. Placeholder lyric two";

/// Whether a tag carries sung text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagClass {
    Vocal,
    NonVocal,
}

/// Structural tags accepted in the lyric field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureTag {
    Verse,
    Chorus,
    Bridge,
    IntroShort,
    IntroMedium,
    InstShort,
    InstMedium,
    OutroShort,
    OutroMedium,
}

impl StructureTag {
    /// All accepted tags, vocal first
    pub const ALL: [StructureTag; 9] = [
        StructureTag::Verse,
        StructureTag::Chorus,
        StructureTag::Bridge,
        StructureTag::IntroShort,
        StructureTag::IntroMedium,
        StructureTag::InstShort,
        StructureTag::InstMedium,
        StructureTag::OutroShort,
        StructureTag::OutroMedium,
    ];

    /// Bracketed token as written in the lyric field
    pub fn token(&self) -> &'static str {
        match self {
            StructureTag::Verse => "[verse]",
            StructureTag::Chorus => "[chorus]",
            StructureTag::Bridge => "[bridge]",
            StructureTag::IntroShort => "[intro-short]",
            StructureTag::IntroMedium => "[intro-medium]",
            StructureTag::InstShort => "[inst-short]",
            StructureTag::InstMedium => "[inst-medium]",
            StructureTag::OutroShort => "[outro-short]",
            StructureTag::OutroMedium => "[outro-medium]",
        }
    }

    pub fn class(&self) -> TagClass {
        match self {
            StructureTag::Verse | StructureTag::Chorus | StructureTag::Bridge => TagClass::Vocal,
            StructureTag::IntroShort
            | StructureTag::IntroMedium
            | StructureTag::InstShort
            | StructureTag::InstMedium
            | StructureTag::OutroShort
            | StructureTag::OutroMedium => TagClass::NonVocal,
        }
    }

    pub fn is_vocal(&self) -> bool {
        self.class() == TagClass::Vocal
    }

    /// Look up an exact bracketed token (case-sensitive)
    pub fn from_token(token: &str) -> Option<StructureTag> {
        Self::ALL.into_iter().find(|tag| tag.token() == token)
    }

    /// Comma-separated list of tokens with the given class
    pub fn tokens_of(class: TagClass) -> String {
        Self::ALL
            .iter()
            .filter(|tag| tag.class() == class)
            .map(|tag| tag.token())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-separated list of every accepted token
    pub fn all_tokens() -> String {
        Self::ALL
            .iter()
            .map(|tag| tag.token())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for StructureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Result of resolving a raw bracketed token against the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLookup {
    Known(StructureTag),
    Forbidden,
    Unknown,
}

/// Classify a raw bracketed token
pub fn lookup_tag(token: &str) -> TagLookup {
    if token == FORBIDDEN_TAG {
        return TagLookup::Forbidden;
    }
    match StructureTag::from_token(token) {
        Some(tag) => TagLookup::Known(tag),
        None => TagLookup::Unknown,
    }
}

/// Split a trimmed segment into its leading bracketed token and the trimmed rest
///
/// The token runs from a leading `[` to the first `]`. Returns `None` when the
/// segment does not open with a complete bracketed token.
pub fn split_tag(segment: &str) -> Option<(&str, &str)> {
    if !segment.starts_with('[') {
        return None;
    }
    let close = segment.find(']')?;
    let (token, rest) = segment.split_at(close + 1);
    Some((token, rest.trim()))
}

/// Strip disallowed punctuation from a sentence (char-wise, multi-byte safe)
pub fn strip_disallowed(sentence: &str) -> String {
    sentence
        .chars()
        .filter(|c| !DISALLOWED_PUNCTUATION.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn has_disallowed(sentence: &str) -> bool {
    sentence.chars().any(|c| DISALLOWED_PUNCTUATION.contains(&c))
}

/// Placeholder vocal segment text
pub fn placeholder_segment() -> String {
    format!("{} {}", StructureTag::Verse.token(), PLACEHOLDER_SENTENCES)
}
