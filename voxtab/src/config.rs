//! Reader and writer configuration

#[cfg(feature = "serde")]
use std::path::Path;

use voxtab_core::DEFAULT_AXIS_TOLERANCE;

use crate::error::{TableError, TableResult};

/// Options shared by table readers and writers
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TableConfig {
    /// Absolute tolerance (cm) when checking axis upper bounds
    pub axis_tolerance: f64,
    /// Create missing parent directories before writing
    pub create_parent_dirs: bool,
}

impl TableConfig {
    /// Set the axis bound tolerance
    pub fn with_axis_tolerance(mut self, axis_tolerance: f64) -> Self {
        self.axis_tolerance = axis_tolerance;
        self
    }

    /// Enable or disable parent directory creation
    pub fn with_create_parent_dirs(mut self, create_parent_dirs: bool) -> Self {
        self.create_parent_dirs = create_parent_dirs;
        self
    }

    /// Reject settings no reader could use
    pub fn validate(&self) -> TableResult<()> {
        if !self.axis_tolerance.is_finite() || self.axis_tolerance < 0.0 {
            return Err(TableError::Config(format!(
                "axis tolerance must be a finite non-negative number, got {}",
                self.axis_tolerance
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration; missing fields keep their
    /// defaults
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> TableResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| TableError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load [`TableConfig::from_json_str`] input from a file
    #[cfg(feature = "serde")]
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            action: "read",
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            axis_tolerance: DEFAULT_AXIS_TOLERANCE,
            create_parent_dirs: true,
        }
    }
}
