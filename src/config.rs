//! Tool configuration.
//!
//! Handles loading and validating an optional `webpress.toml` placed in
//! the root directory being converted. Every setting has a stock default;
//! config files are sparse and only need the keys they override. CLI
//! flags take precedence over file values.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [images]
//! quality = 80              # WebP quality (1-100)
//!
//! [processing]
//! # max_threads = 4         # Omit for auto = CPU cores
//!
//! [manifest]
//! write = true
//! path = "paths.json"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the conversion root.
pub const CONFIG_FILENAME: &str = "webpress.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `webpress.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// WebP encoding settings.
    pub images: ImagesConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Manifest output settings.
    pub manifest: ManifestConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.manifest.path.is_empty() {
            return Err(ConfigError::Validation(
                "manifest.path must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// WebP encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// WebP encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel conversion workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Manifest output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// Whether to write the manifest at all.
    pub write: bool,
    /// Manifest location, relative to the working directory.
    pub path: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            write: true,
            path: crate::manifest::DEFAULT_MANIFEST_PATH.to_string(),
        }
    }
}

/// Resolve the effective worker count from config, with an optional CLI
/// override taking precedence.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig, cli_override: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cli_override
        .or(config.max_threads)
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Load config from `webpress.toml` in the given directory.
///
/// Returns stock defaults when no config file exists. Rejects unknown
/// keys and validates the result.
pub fn load_config(root: &Path) -> Result<Config, ConfigError> {
    let path = root.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `webpress.toml` with all keys and
/// explanations. Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Webpress Configuration
# ======================
# Place this file in the root directory you convert (next to your photos).
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# WebP encoding
# ---------------------------------------------------------------------------
[images]
# Lossy WebP quality (1 = worst, 100 = best).
quality = 80

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel conversion workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4

# ---------------------------------------------------------------------------
# Manifest
# ---------------------------------------------------------------------------
[manifest]
# Whether to write a JSON manifest of newly produced outputs.
write = true

# Manifest location, relative to the working directory.
path = "paths.json"
"##
}
