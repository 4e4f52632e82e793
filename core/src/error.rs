//! Error types for schema parsing and dependency ordering.
//!
//! Parse errors are non-fatal: the parser catches them and degrades the
//! affected file to an empty command list. The two dependency errors are
//! fatal and abort the entire load before any execution.

use thiserror::Error;

/// Errors raised by the core pipeline.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A file could not be parsed. Localized to one file; the load
    /// continues with that file degraded to zero commands.
    #[error("parse error in '{source_name}': {message}")]
    Parse {
        /// Source identifier of the offending file.
        source_name: String,
        /// Human-readable description.
        message: String,
    },

    /// A schema participates in a dependency cycle.
    #[error("circular dependency detected involving schema '{0}'")]
    CircularDependency(String),

    /// A schema declares a dependency with no corresponding file.
    #[error("schema '{schema}' depends on '{dependency}', which was not found")]
    MissingDependency {
        /// The schema declaring the dependency.
        schema: String,
        /// The dependency name that has no file.
        dependency: String,
    },
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
