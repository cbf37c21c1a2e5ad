//! UUID utilities

use uuid::Uuid;

/// Number of hex characters kept from a UUIDv4 for short suffixes (32 bits)
pub const SHORT_SUFFIX_LEN: usize = 8;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Random lowercase hex suffix taken from a fresh UUIDv4
pub fn short_suffix() -> String {
    let mut hex = generate().simple().to_string();
    hex.truncate(SHORT_SUFFIX_LEN);
    hex
}

/// Synthesized song identifier: `song_<line>_<suffix>`
///
/// The line number keeps identifiers distinct within one run; the random
/// suffix keeps them distinct across runs over the same file.
pub fn song_identifier(line_number: usize) -> String {
    format!("song_{}_{}", line_number, short_suffix())
}
