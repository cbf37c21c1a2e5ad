//! Supported genre prompts for `auto_prompt_audio_type`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Genre prompt understood by the generation pipeline
///
/// `Auto` asks the generator to pick one of the other genres at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Pop,
    RnB,
    Dance,
    Jazz,
    Folk,
    Rock,
    ChineseStyle,
    ChineseTradition,
    Metal,
    Reggae,
    ChineseOpera,
    Auto,
}

impl Genre {
    pub const ALL: [Genre; 12] = [
        Genre::Pop,
        Genre::RnB,
        Genre::Dance,
        Genre::Jazz,
        Genre::Folk,
        Genre::Rock,
        Genre::ChineseStyle,
        Genre::ChineseTradition,
        Genre::Metal,
        Genre::Reggae,
        Genre::ChineseOpera,
        Genre::Auto,
    ];

    /// Wire name as it appears in request records
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Pop => "Pop",
            Genre::RnB => "R&B",
            Genre::Dance => "Dance",
            Genre::Jazz => "Jazz",
            Genre::Folk => "Folk",
            Genre::Rock => "Rock",
            Genre::ChineseStyle => "Chinese Style",
            Genre::ChineseTradition => "Chinese Tradition",
            Genre::Metal => "Metal",
            Genre::Reggae => "Reggae",
            Genre::ChineseOpera => "Chinese Opera",
            Genre::Auto => "Auto",
        }
    }

    /// Comma-separated wire names, for diagnostics
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|g| g.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a name outside the genre set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported genre '{0}'")]
pub struct UnknownGenre(pub String);

impl FromStr for Genre {
    type Err = UnknownGenre;

    /// Exact, case-sensitive match on the wire name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_wire_name() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>().unwrap(), genre);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("pop".parse::<Genre>().is_err());
        assert!("R&B".parse::<Genre>().is_ok());
        assert!("RnB".parse::<Genre>().is_err());
    }

    #[test]
    fn test_allowed_list() {
        let list = Genre::allowed_list();
        assert!(list.starts_with("Pop, R&B"));
        assert!(list.ends_with("Auto"));
    }
}
