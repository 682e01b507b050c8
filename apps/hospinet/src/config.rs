//! # Configuration
//!
//! Optional TOML configuration for the hospinet binary.
//!
//! ```toml
//! [columns]
//! subject = "patient"
//!
//! [cleaning]
//! missing = "record"
//! date_format = "%Y-%m-%d"
//! reference_date = "2017-03-01T00:00:00"
//!
//! [network]
//! discretisation = 7
//! ```
//!
//! Every field falls back to the library default; command-line flags
//! override the file.

use hospinet_core::primitives::{DEFAULT_DISCRETISATION, DEFAULT_RETURN_WINDOW};
use hospinet_core::{CleaningConfig, ColumnMapping, HospinetError, NetworkBuilder, RemovalPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HospinetConfig {
    /// Names of the required stay-table columns.
    pub columns: ColumnMapping,
    /// Cleaning policies.
    pub cleaning: CleaningSection,
    /// Network construction parameters.
    pub network: NetworkSection,
}

/// `[cleaning]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleaningSection {
    pub missing: RemovalPolicy,
    pub errors: RemovalPolicy,
    pub date_format: Option<String>,
    pub reference_date: chrono::NaiveDateTime,
    pub n_iters: usize,
}

impl Default for CleaningSection {
    fn default() -> Self {
        let defaults = CleaningConfig::default();
        Self {
            missing: defaults.missing,
            errors: defaults.errors,
            date_format: defaults.date_format,
            reference_date: defaults.reference_date,
            n_iters: defaults.n_iters,
        }
    }
}

/// `[network]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkSection {
    /// Discretisation step in days.
    pub discretisation: i64,
    /// Largest gap, in time units, that still links two presences.
    pub return_window: f64,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            discretisation: DEFAULT_DISCRETISATION,
            return_window: DEFAULT_RETURN_WINDOW,
        }
    }
}

impl HospinetConfig {
    /// Parse a TOML document, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, HospinetError> {
        toml::from_str(toml_str)
            .map_err(|e| HospinetError::DeserializationError(format!("Invalid config: {}", e)))
    }

    /// Load the file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, HospinetError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let metadata = std::fs::metadata(path).map_err(|e| {
            HospinetError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(HospinetError::IoError(format!(
                "Config file '{}' exceeds {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            HospinetError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Cleaning parameters for the core cleaner.
    pub fn cleaning_config(&self) -> CleaningConfig {
        CleaningConfig {
            columns: self.columns.clone(),
            missing: self.cleaning.missing,
            errors: self.cleaning.errors,
            date_format: self.cleaning.date_format.clone(),
            reference_date: self.cleaning.reference_date,
            n_iters: self.cleaning.n_iters,
        }
    }

    /// A validated network builder.
    pub fn builder(&self) -> Result<NetworkBuilder, HospinetError> {
        NetworkBuilder::new(self.network.discretisation, self.network.return_window)
    }
}
