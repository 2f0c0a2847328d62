//! Configuration types for Linnaea

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LinnaeaError;
use crate::store::MAX_SEARCH_ROWS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite taxonomy database
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Maximum number of values bound into a single store query
    #[serde(default = "default_max_search_rows")]
    pub max_search_rows: usize,
}

// Default value functions
fn default_db_path() -> PathBuf {
    PathBuf::from("taxonomy.sqlite")
}
fn default_max_search_rows() -> usize {
    MAX_SEARCH_ROWS
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_search_rows: default_max_search_rows(),
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, LinnaeaError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| LinnaeaError::Configuration(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), LinnaeaError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| LinnaeaError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
