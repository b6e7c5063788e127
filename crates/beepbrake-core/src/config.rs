//! Cascade detection configuration

use crate::geometry::Size;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Parameters the detector is built with, fixed for its whole lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Window size the cascade was trained on
    pub template_size: Size,
    pub min_neighbors: i32,
    /// Step between search scales, must exceed 1.0
    pub scale_factor: f64,
    /// Backend-specific detection flags
    pub flag: i32,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("template size must be positive, got {0}")]
    TemplateSize(Size),
    #[error("scale factor must be finite and greater than 1.0, got {0}")]
    ScaleFactor(f64),
    #[error("min neighbors must not be negative, got {0}")]
    MinNeighbors(i32),
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            template_size: Size::new(20, 20),
            min_neighbors: 3,
            scale_factor: 1.1,
            flag: 0,
        }
    }
}

impl DetectorConfig {
    /// Load and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_json_str(&raw).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("Failed to parse detector config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.template_size.is_positive() {
            return Err(ConfigError::TemplateSize(self.template_size));
        }
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(ConfigError::ScaleFactor(self.scale_factor));
        }
        if self.min_neighbors < 0 {
            return Err(ConfigError::MinNeighbors(self.min_neighbors));
        }
        Ok(())
    }
}
