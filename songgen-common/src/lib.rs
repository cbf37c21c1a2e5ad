//! # Songgen Common Library
//!
//! Shared code for the song-generation request tooling including:
//! - Error types
//! - Configuration loading (TOML + environment + compiled defaults)
//! - Identifier generation

pub mod config;
pub mod error;
pub mod uuid_utils;

pub use error::{Error, Result};
