//! Engine Configuration - verification switches and limits as TOML values
//!
//! Each struct implements `Default` with the values the engine uses when no
//! config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::toolstring::DEFAULT_MAX_WEIGHT_LBS;
use crate::types::VerificationOptions;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "WELLGATE_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "wellgate.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root engine configuration.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$WELLGATE_CONFIG` env var
/// 2. `./wellgate.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Default options for barrier verification calls
    #[serde(default)]
    pub verification: VerificationOptions,

    /// Toolstring solver limits
    #[serde(default)]
    pub toolstring: ToolstringConfig,

    /// Equipment catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$WELLGATE_CONFIG` environment variable
    /// 2. `./wellgate.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let config = Self::load_first(env_path.as_deref(), Path::new(LOCAL_CONFIG_FILE));
        config.log_effective();
        config
    }

    /// First candidate that exists and loads cleanly wins. A broken file is
    /// logged and skipped rather than failing startup.
    fn load_first(env_path: Option<&Path>, local: &Path) -> Self {
        let candidates = env_path
            .map(|p| (p, CONFIG_ENV_VAR))
            .into_iter()
            .chain(std::iter::once((local, "working directory")));

        for (path, source) in candidates {
            if !path.exists() {
                if source == CONFIG_ENV_VAR {
                    warn!(path = %path.display(), "{CONFIG_ENV_VAR} points to non-existent file, falling back");
                }
                continue;
            }
            match Self::load_from_file(path) {
                Ok(config) => {
                    info!(path = %path.display(), source, "Loaded engine config");
                    return config;
                }
                Err(e) => {
                    warn!(path = %path.display(), source, error = %e, "Failed to load engine config, falling back");
                }
            }
        }

        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Self::default()
    }

    fn log_effective(&self) {
        match &self.catalog.path {
            Some(catalog) => info!(
                catalog = %catalog.display(),
                max_weight_lbs = self.toolstring.max_weight_lbs,
                "Equipment catalog configured"
            ),
            None => debug!("No [catalog].path set; toolstring and plan calls need --catalog"),
        }
        debug!(
            strict_mode = self.verification.strict_mode,
            check_pressure_ratings = self.verification.check_pressure_ratings,
            check_test_dates = self.verification.check_test_dates,
            max_test_age_days = self.verification.max_test_age_days,
            "Default verification options"
        );
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are logged as warnings; range errors fail the load.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Engine config saved");
        Ok(())
    }

    /// Check every value; all errors are collected before returning.
    /// Suspicious-but-legal values are logged, not rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_physical_ranges(self);
        for w in &warnings {
            warn!(field = %w.field, "{}", w);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {e}"),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Toolstring
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolstringConfig {
    /// Conveyance weight ceiling used when a request carries none, lbs
    #[serde(default = "default_max_weight_lbs")]
    pub max_weight_lbs: f64,
}

fn default_max_weight_lbs() -> f64 { DEFAULT_MAX_WEIGHT_LBS }

impl Default for ToolstringConfig {
    fn default() -> Self {
        Self {
            max_weight_lbs: default_max_weight_lbs(),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Path to the equipment catalog JSON. Overridden by `--catalog`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}
