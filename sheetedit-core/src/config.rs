//! Configuration for the operations service

use crate::error::{Result, SheetEditError};
use crate::service::validate_sheet_name;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Worksheet name used when neither the caller nor the config names one
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Environment variable overriding `app.default_worksheet_name`
pub const DEFAULT_SHEET_ENV: &str = "SHEETEDIT_DEFAULT_SHEET";

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SheetEditConfig {
    #[serde(default)]
    pub app: ServiceConfig,
}

impl SheetEditConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SheetEditError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SheetEditConfig =
            toml::from_str(content).map_err(|e| SheetEditError::InvalidConfig(e.to_string()))?;
        config.app.validate()?;
        Ok(config)
    }

    /// Apply `SHEETEDIT_DEFAULT_SHEET` from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_default_sheet_override(std::env::var(DEFAULT_SHEET_ENV).ok())
    }

    /// Replace the default worksheet name when `value` is set and non-empty
    pub fn with_default_sheet_override(mut self, value: Option<String>) -> Result<Self> {
        if let Some(name) = value.filter(|v| !v.is_empty()) {
            self.app.default_worksheet_name = name;
            self.app.validate()?;
        }
        Ok(self)
    }
}

/// What a write does when the addressed worksheet does not exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSheetPolicy {
    /// Add an empty worksheet with that name, then write
    #[default]
    Create,
    /// Fail with a worksheet-not-found error
    Error,
}

/// Settings handed to [`crate::SpreadsheetService`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_sheet_name")]
    pub default_worksheet_name: String,
    #[serde(default)]
    pub missing_sheet_policy: MissingSheetPolicy,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_worksheet_name.is_empty() {
            return Err(SheetEditError::InvalidConfig(
                "default_worksheet_name must not be empty".to_string(),
            ));
        }
        validate_sheet_name(&self.default_worksheet_name)
            .map_err(|e| SheetEditError::InvalidConfig(e.to_string()))
    }

    /// Pick the caller's worksheet name or fall back to the configured default
    pub fn resolve_sheet_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.default_worksheet_name)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_worksheet_name: default_sheet_name(),
            missing_sheet_policy: MissingSheetPolicy::default(),
        }
    }
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}
