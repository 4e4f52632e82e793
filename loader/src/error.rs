//! Error types for filesystem loading.

use thiserror::Error;

/// Errors raised while loading schema files from disk.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File or directory I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Options file parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A fatal core pipeline error (dependency cycle or missing
    /// dependency). Parse errors never surface here; they degrade the
    /// affected file instead.
    #[error(transparent)]
    Schema(#[from] redis_schema_core::SchemaError),

    /// The schema directory contains no files with the configured
    /// extension.
    #[error("no schema files found in '{0}'")]
    NoSchemaFiles(String),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
