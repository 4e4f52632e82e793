//! The command-executing collaborator seam.
//!
//! The engine never talks to a store directly: it submits command lists
//! through [`CommandExecutor`], which a network client (out of scope for
//! this workspace) implements. Both submission modes return one
//! [`CommandOutcome`] per command, in submission order.

use redis_schema_core::Command;

use crate::error::Result;

/// Per-command outcome reported by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command succeeded; the reply payload, if any, is not modeled.
    Ok,
    /// The command failed with the store's error text.
    Error(String),
}

impl CommandOutcome {
    /// Returns `true` for [`CommandOutcome::Ok`].
    pub fn is_ok(&self) -> bool {
        matches!(self, CommandOutcome::Ok)
    }
}

/// Abstract collaborator that executes command lists against a store.
///
/// Implementations must preserve submission order in the returned outcome
/// list. A `Result::Err` means the whole submission failed as a unit
/// (transport failure, aborted transaction); per-command failures are
/// reported through [`CommandOutcome::Error`] instead.
pub trait CommandExecutor {
    /// Submits the entire list as one atomic unit.
    fn run_transaction(&mut self, commands: &[Command]) -> Result<Vec<CommandOutcome>>;

    /// Submits the list as one pipelined batch.
    fn run_pipeline(&mut self, commands: &[Command]) -> Result<Vec<CommandOutcome>>;
}
