//! Collage configuration loaded from YAML.

use crate::error::ParseError;
use collage_layout::{GridDims, LayoutTemplate, DEFAULT_HISTORY_DEPTH, MAX_EXTENT};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Configuration document, typically `collage.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollageConfig {
    /// Size of a new grid
    #[serde(default)]
    pub grid: GridConfig,
    /// Undo history settings
    #[serde(default)]
    pub history: HistoryConfig,
    /// Layout templates; empty means use the built-in set
    #[serde(default)]
    pub templates: Vec<LayoutTemplate>,
}

/// Initial grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_extent")]
    pub rows: usize,
    #[serde(default = "default_extent")]
    pub columns: usize,
}

fn default_extent() -> usize {
    3
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_extent(),
            columns: default_extent(),
        }
    }
}

/// Undo history settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Undo steps kept
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl CollageConfig {
    /// Parse a config from YAML. The result is validated.
    pub fn from_yaml(yaml: &str) -> Result<Self, ParseError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to YAML.
    pub fn to_yaml(&self) -> Result<String, ParseError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&yaml)?;
        debug!(path = %path.display(), templates = config.templates.len(), "Loaded config");
        Ok(config)
    }

    /// Check grid size, history depth and every template.
    pub fn validate(&self) -> Result<(), ParseError> {
        for (field, value) in [
            ("grid.rows", self.grid.rows),
            ("grid.columns", self.grid.columns),
            ("history.max_depth", self.history.max_depth),
        ] {
            if value == 0 {
                return Err(ParseError::InvalidValue {
                    field: field.to_string(),
                    message: "must be positive".to_string(),
                });
            }
        }
        for (field, value) in [("grid.rows", self.grid.rows), ("grid.columns", self.grid.columns)] {
            if value > MAX_EXTENT {
                return Err(ParseError::InvalidValue {
                    field: field.to_string(),
                    message: format!("must be at most {MAX_EXTENT}"),
                });
            }
        }

        let mut names = HashSet::new();
        for template in &self.templates {
            template.validate()?;
            if !names.insert(template.name.as_str()) {
                return Err(ParseError::Validation(format!(
                    "duplicate template '{}'",
                    template.name
                )));
            }
        }
        Ok(())
    }

    /// Dimensions of a new grid.
    #[must_use]
    pub fn grid_dims(&self) -> GridDims {
        GridDims::new(self.grid.rows, self.grid.columns)
    }
}
