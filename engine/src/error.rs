//! Error types for command execution.
//!
//! All of these are captured into [`ExecutionResult`]s by the engine and
//! reported in aggregate; none escapes a load invocation.
//!
//! [`ExecutionResult`]: redis_schema_core::ExecutionResult

use thiserror::Error;

/// Errors reported by a command-executing collaborator or the engine.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The collaborator rejected a malformed command before submission.
    /// Counted against the command, not fatal to the load.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// An atomic unit was aborted; all of its commands count as failed
    /// together.
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// One pipelined batch failed; subsequent batches are still attempted.
    #[error("batch execution failed: {0}")]
    BatchFailed(String),
}

/// Convenience alias for results with [`ExecError`].
pub type Result<T> = std::result::Result<T, ExecError>;
