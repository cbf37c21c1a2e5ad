//! Configuration loading and resolution
//!
//! Resolution priority (first hit wins):
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file in the user config directory
//! 4. Compiled defaults (fallback)
//!
//! An explicitly requested file (CLI or environment) must exist and parse.
//! The per-user file is optional: a missing file falls through silently, an
//! unreadable one falls through with a warning.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SONGGEN_CONFIG";

/// Lossless audio extension accepted for reference audio
pub const DEFAULT_AUDIO_EXTENSION: &str = ".flac";

/// Example path shown in suggestions for invalid reference audio
pub const DEFAULT_AUDIO_EXAMPLE: &str = "/workspace/SongGeneration/jsonl/vocal_sample.flac";

/// Genre substituted for an unsupported genre prompt
pub const DEFAULT_GENRE: &str = "Pop";

/// Log filter in effect until a config file says otherwise
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Record validation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Required suffix of `prompt_audio_path`
    pub reference_audio_extension: String,
    /// Path quoted in suggestions when reference audio is rejected
    pub reference_audio_example: String,
    /// Base directory for relative reference audio paths (process cwd when unset)
    pub reference_audio_base_dir: Option<PathBuf>,
    /// Replacement for an unsupported `auto_prompt_audio_type`
    pub default_genre: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            reference_audio_extension: DEFAULT_AUDIO_EXTENSION.to_string(),
            reference_audio_example: DEFAULT_AUDIO_EXAMPLE.to_string(),
            reference_audio_base_dir: None,
            default_genre: DEFAULT_GENRE.to_string(),
        }
    }
}

/// Stream processing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Worker threads used for per-line validation (1 = sequential)
    pub workers: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// Complete validator configuration as stored in `validate.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub logging: LoggingConfig,
    pub validation: ValidationConfig,
    pub runtime: RuntimeConfig,
}

impl ValidatorConfig {
    /// Parse configuration from TOML text and check field constraints
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ValidatorConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Field-level checks that serde cannot express
    pub fn check(&self) -> Result<()> {
        if self.runtime.workers == 0 {
            return Err(Error::Config("runtime.workers must be at least 1".to_string()));
        }
        if self.validation.reference_audio_extension.trim().is_empty() {
            return Err(Error::Config(
                "validation.reference_audio_extension must not be empty".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(Error::Config("logging.level must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Load and validate a config file
pub fn load_config(path: &Path) -> Result<ValidatorConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
    })?;
    ValidatorConfig::from_toml_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Per-user config location: `<config dir>/songgen/validate.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songgen").join("validate.toml"))
}

/// Resolves which configuration applies to this run
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
    env_var_name: String,
    user_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Resolver using `SONGGEN_CONFIG` and the per-user config location
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self {
            cli_path,
            env_var_name: CONFIG_ENV_VAR.to_string(),
            user_path: default_config_path(),
        }
    }

    /// Override the environment variable consulted at priority 2
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var_name = name.into();
        self
    }

    /// Override (or disable) the per-user file consulted at priority 3
    pub fn with_user_path(mut self, path: Option<PathBuf>) -> Self {
        self.user_path = path;
        self
    }

    /// Resolve the configuration following the priority order
    pub fn resolve(&self) -> Result<ValidatorConfig> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            info!("Loading config from command line: {}", path.display());
            return load_config(path);
        }

        // Priority 2: Environment variable
        if let Ok(value) = std::env::var(&self.env_var_name) {
            if !value.trim().is_empty() {
                let path = PathBuf::from(value);
                info!("Loading config from {}: {}", self.env_var_name, path.display());
                return load_config(&path);
            }
        }

        // Priority 3: Per-user TOML file
        if let Some(path) = &self.user_path {
            if path.is_file() {
                match load_config(path) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        return Ok(config);
                    }
                    Err(e) => warn!("Ignoring user config: {}", e),
                }
            } else {
                debug!("No user config at {}", path.display());
            }
        }

        // Priority 4: Compiled defaults
        Ok(ValidatorConfig::default())
    }
}
