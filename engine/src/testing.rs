//! Test doubles for the executor seam.
//!
//! [`RecordingExecutor`] stands in for a store client: it records every
//! submission and can be scripted to fail individual commands, whole
//! pipeline batches, or all transactions. Used by this crate's own tests
//! and by downstream integration tests.

use std::collections::HashMap;

use redis_schema_core::Command;

use crate::error::{ExecError, Result};
use crate::executor::{CommandExecutor, CommandOutcome};

/// An in-memory [`CommandExecutor`] that records submissions.
///
/// Command failure injection is keyed by the global command index: the
/// position of the command counted across every submission made to this
/// executor, matching the per-file index space of the engine.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pipeline_calls: Vec<Vec<Command>>,
    transaction_calls: Vec<Vec<Command>>,
    submitted: usize,
    fail_commands: HashMap<usize, String>,
    fail_batches: HashMap<usize, ExecError>,
    abort_transactions: Option<ExecError>,
}

impl RecordingExecutor {
    /// Reports the command at `index` (global, zero-based) as failed.
    pub fn fail_command(mut self, index: usize, error: &str) -> Self {
        self.fail_commands.insert(index, error.to_string());
        self
    }

    /// Fails the pipeline call at `call_index` (zero-based) as a unit.
    pub fn fail_batch(mut self, call_index: usize, error: ExecError) -> Self {
        self.fail_batches.insert(call_index, error);
        self
    }

    /// Aborts the next transaction submission as a unit.
    pub fn abort_transactions(mut self, error: ExecError) -> Self {
        self.abort_transactions = Some(error);
        self
    }

    /// Every pipeline submission, in order.
    pub fn pipeline_calls(&self) -> &[Vec<Command>] {
        &self.pipeline_calls
    }

    /// Every transaction submission, in order.
    pub fn transaction_calls(&self) -> &[Vec<Command>] {
        &self.transaction_calls
    }

    /// All commands submitted through either mode, flattened in order.
    pub fn all_commands(&self) -> Vec<&Command> {
        self.transaction_calls
            .iter()
            .chain(self.pipeline_calls.iter())
            .flatten()
            .collect()
    }

    fn outcomes_for(&mut self, count: usize) -> Vec<CommandOutcome> {
        let base = self.submitted;
        self.submitted += count;
        (0..count)
            .map(|offset| match self.fail_commands.get(&(base + offset)) {
                Some(message) => CommandOutcome::Error(message.clone()),
                None => CommandOutcome::Ok,
            })
            .collect()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run_transaction(&mut self, commands: &[Command]) -> Result<Vec<CommandOutcome>> {
        self.transaction_calls.push(commands.to_vec());
        if let Some(err) = self.abort_transactions.take() {
            return Err(err);
        }
        Ok(self.outcomes_for(commands.len()))
    }

    fn run_pipeline(&mut self, commands: &[Command]) -> Result<Vec<CommandOutcome>> {
        let call_index = self.pipeline_calls.len();
        self.pipeline_calls.push(commands.to_vec());
        if let Some(err) = self.fail_batches.remove(&call_index) {
            // Outcomes for a failed batch are never produced, but the
            // global index space still advances past its commands.
            self.submitted += commands.len();
            return Err(err);
        }
        Ok(self.outcomes_for(commands.len()))
    }
}
