//! Common error types for the song-generation tooling

use thiserror::Error;

/// Common result type for songgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the songgen crates
#[derive(Error, Debug)]
pub enum Error {
    /// TOML document could not be deserialized
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
