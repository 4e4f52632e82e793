//! Load options file.
//!
//! A YAML file controls a load invocation: the execution configuration
//! (prefix, variables, batching, transaction/dry-run switches) plus the
//! filesystem extension used when discovering schema files.
//!
//! # Example YAML
//!
//! ```yaml
//! prefix: "app:"
//! variables:
//!   ENV: prod
//!   REGION: eu-west-1
//! batch_size: 200
//! use_transactions: false
//! dry_run: false
//! strict_scripts: true
//! extension: schema
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use redis_schema_core::LoadConfig;

use crate::error::Result;

/// Options for one load invocation: execution configuration plus
/// filesystem discovery settings.
///
/// # Examples
///
/// ```
/// use redis_schema_loader::LoadOptions;
///
/// let options = LoadOptions::default();
/// assert_eq!(options.extension, "schema");
/// assert_eq!(options.config.batch_size, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Execution configuration passed through to parsing and the engine.
    #[serde(flatten)]
    pub config: LoadConfig,
    /// File extension (without dot) selecting schema files in a directory.
    pub extension: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config: LoadConfig::default(),
            extension: "schema".to_string(),
        }
    }
}

impl LoadOptions {
    /// Loads options from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::LoaderError::Io) if the file cannot be read,
    /// or [`Yaml`](crate::LoaderError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let options = serde_yaml::from_reader(reader)?;
        Ok(options)
    }

    /// Saves the options as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::LoaderError::Io) if the file cannot be
    /// written, or [`Yaml`](crate::LoaderError::Yaml) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
