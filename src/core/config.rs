//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.folio/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::catalog::Covers;
use crate::catalog::providers::openlibrary::DEFAULT_OPENLIBRARY_BASE_URL;
use crate::catalog::types::{DEFAULT_COVERS_BASE_URL, DEFAULT_PLACEHOLDER_COVER_URL};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub page_size: Option<u32>,
    pub clamp_page: Option<bool>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub base_url: Option<String>,
    pub covers_base_url: Option<String>,
    pub placeholder_cover_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PAGE_SIZE: u32 = 6;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub page_size: u32,
    pub clamp_page: bool,
    pub log_level: LevelFilter,
    pub catalog_base_url: String,
    pub covers: Covers,
    pub timeout: Duration,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.folio/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".folio").join("config.toml"))
}

/// Load config from `~/.folio/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FolioConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FolioConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FolioConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<FolioConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(FolioConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: FolioConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Folio Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# page_size = 6                      # results per search page
# clamp_page = true                  # keep ?page= within the result count
# log_level = "debug"                # "error", "warn", "info", "debug", "trace", "off"

# [catalog]
# base_url = "https://openlibrary.org"              # Or set FOLIO_CATALOG_URL env var
# covers_base_url = "https://covers.openlibrary.org" # Or set FOLIO_COVERS_URL env var
# placeholder_cover_url = "https://example.com/no-cover.png"
# timeout_secs = 15
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_catalog_url` is from the `--catalog-url` flag (None = not specified).
pub fn resolve(config: &FolioConfig, cli_catalog_url: Option<&str>) -> ResolvedConfig {
    // Catalog URL: CLI → env → config → default
    let catalog_base_url = cli_catalog_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("FOLIO_CATALOG_URL").ok())
        .or_else(|| config.catalog.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OPENLIBRARY_BASE_URL.to_string());

    // Covers URL: env → config → default
    let covers_base_url = std::env::var("FOLIO_COVERS_URL")
        .ok()
        .or_else(|| config.catalog.covers_base_url.clone())
        .unwrap_or_else(|| DEFAULT_COVERS_BASE_URL.to_string());

    let placeholder_url = config
        .catalog
        .placeholder_cover_url
        .clone()
        .unwrap_or_else(|| DEFAULT_PLACEHOLDER_COVER_URL.to_string());

    let page_size = match config.general.page_size {
        Some(0) => {
            warn!("page_size must be at least 1, using {}", DEFAULT_PAGE_SIZE);
            DEFAULT_PAGE_SIZE
        }
        Some(size) => size,
        None => DEFAULT_PAGE_SIZE,
    };

    ResolvedConfig {
        page_size,
        clamp_page: config.general.clamp_page.unwrap_or(true),
        log_level: resolve_log_level(config),
        catalog_base_url,
        covers: Covers {
            base_url: covers_base_url,
            placeholder_url,
        },
        timeout: Duration::from_secs(
            config
                .catalog
                .timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
    }
}

fn resolve_log_level(config: &FolioConfig) -> LevelFilter {
    match config.general.log_level.as_deref() {
        Some(level) => LevelFilter::from_str(level).unwrap_or_else(|_| {
            warn!("Unknown log level {:?}, using {}", level, DEFAULT_LOG_LEVEL);
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    }
}
