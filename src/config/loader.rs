//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! policy from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{AnalyticsPolicy, AttendancePolicy, EngineConfig, PayrollPolicy};

/// Loads and provides access to engine configuration.
///
/// The `ConfigLoader` reads YAML policy files from a directory.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── payroll.yaml     # PF, tax, ESI rates and thresholds
/// ├── analytics.yaml   # z-score and trend thresholds
/// └── attendance.yaml  # check-in capture mode
/// ```
///
/// # Example
///
/// ```no_run
/// use hrms_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Tax rate: {}", loader.config().payroll().tax_rate);
/// # Ok::<(), hrms_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any policy file is missing, contains invalid YAML,
    /// or holds values that fail policy validation.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let payroll = Self::load_yaml::<PayrollPolicy>(&path.join("payroll.yaml"))?;
        let analytics = Self::load_yaml::<AnalyticsPolicy>(&path.join("analytics.yaml"))?;
        let attendance = Self::load_yaml::<AttendancePolicy>(&path.join("attendance.yaml"))?;

        let config = EngineConfig::new(payroll, analytics, attendance)?;
        debug!(path = %path.display(), "Loaded engine configuration");

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
