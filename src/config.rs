//! Planner configuration, loadable from TOML.
//!
//! ```toml
//! [osrm]
//! base_url = "http://localhost:5000"
//! max_retries = 2
//!
//! [matrix]
//! max_concurrency = 8
//!
//! [[locations]]
//! name = "Los Angeles"
//! lat = 34.0522
//! lng = -118.2437
//! ```
//!
//! Every section is optional. Without `locations` the built-in Southern
//! California catalog is used.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::location::{Location, LocationCatalog};
use crate::matrix::MatrixOptions;
use crate::osrm::OsrmConfig;
use crate::solver::SolveOptions;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub osrm: OsrmConfig,
    pub matrix: MatrixOptions,
    pub solve: SolveOptions,
    pub locations: Vec<Location>,
}

impl PlannerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        if !matches!(config.osrm.geometry_precision, 5 | 6) {
            return Err(ConfigError::UnsupportedPrecision(config.osrm.geometry_precision));
        }
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn catalog(&self) -> Result<LocationCatalog, ConfigError> {
        if self.locations.is_empty() {
            Ok(LocationCatalog::southern_california())
        } else {
            LocationCatalog::new(self.locations.clone())
        }
    }
}
