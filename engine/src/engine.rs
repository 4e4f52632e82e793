//! Replay of ordered command lists against a collaborator.
//!
//! Three modes, selected by [`LoadConfig`]: dry-run (nothing reaches the
//! executor), transactional (one atomic unit per file), and pipelined
//! (fixed-size batches with per-batch failure isolation). The transaction
//! and pipeline paths are kept structurally distinct because their failure
//! reporting differs: all-or-nothing aggregate versus per-batch progress.

use redis_schema_core::{Command, CommandFailure, ExecutionResult, LoadConfig};

use crate::executor::{CommandExecutor, CommandOutcome};

/// Executes an ordered command list and aggregates the outcome.
///
/// Commands are submitted strictly in order; batches never overlap. The
/// engine holds no state across calls, so per-file results can be combined
/// freely by the caller.
///
/// # Examples
///
/// ```
/// use redis_schema_core::{Command, LoadConfig};
/// use redis_schema_engine::execute;
/// use redis_schema_engine::RecordingExecutor;
///
/// let commands = vec![Command::new(vec!["SET".into(), "k".into(), "v".into()]).unwrap()];
/// let mut executor = RecordingExecutor::default();
///
/// let config = LoadConfig { dry_run: true, ..Default::default() };
/// let result = execute(&commands, &mut executor, &config);
/// assert!(result.succeeded);
/// assert_eq!(result.commands_executed, 0);
/// assert_eq!(result.commands_planned, 1);
/// assert!(executor.pipeline_calls().is_empty());
/// ```
pub fn execute(
    commands: &[Command],
    executor: &mut dyn CommandExecutor,
    config: &LoadConfig,
) -> ExecutionResult {
    if commands.is_empty() {
        return ExecutionResult::empty();
    }

    if config.dry_run {
        tracing::debug!(count = commands.len(), "dry run, no commands submitted");
        return ExecutionResult {
            succeeded: true,
            commands_executed: 0,
            commands_planned: commands.len(),
            error_count: 0,
            errors: Vec::new(),
        };
    }

    if config.use_transactions {
        execute_transactional(commands, executor)
    } else {
        execute_pipelined(commands, executor, config.batch_size.max(1))
    }
}

/// Submits the whole list as one atomic unit. Any reported failure fails
/// the unit: no partial effect is attributed, and every failed command is
/// listed. A transport-level abort counts all commands as failed together.
fn execute_transactional(
    commands: &[Command],
    executor: &mut dyn CommandExecutor,
) -> ExecutionResult {
    let planned = commands.len();
    match executor.run_transaction(commands) {
        Ok(outcomes) => {
            let errors = collect_failures(commands, &outcomes, 0);
            if errors.is_empty() {
                ExecutionResult {
                    succeeded: true,
                    commands_executed: planned,
                    commands_planned: planned,
                    error_count: 0,
                    errors,
                }
            } else {
                tracing::error!(
                    failed = errors.len(),
                    total = planned,
                    "transaction rejected, no commands applied"
                );
                ExecutionResult {
                    succeeded: false,
                    commands_executed: 0,
                    commands_planned: planned,
                    error_count: errors.len(),
                    errors,
                }
            }
        }
        Err(err) => {
            tracing::error!(error = %err, total = planned, "transaction aborted");
            let message = err.to_string();
            let errors: Vec<CommandFailure> = commands
                .iter()
                .enumerate()
                .map(|(index, cmd)| CommandFailure {
                    index,
                    command: cmd.display_line(),
                    error: message.clone(),
                })
                .collect();
            ExecutionResult {
                succeeded: false,
                commands_executed: 0,
                commands_planned: planned,
                error_count: errors.len(),
                errors,
            }
        }
    }
}

/// Submits fixed-size batches sequentially. A batch failure is recorded
/// and the next batch is still attempted: partial application in exchange
/// for progress under partial failure.
fn execute_pipelined(
    commands: &[Command],
    executor: &mut dyn CommandExecutor,
    batch_size: usize,
) -> ExecutionResult {
    let planned = commands.len();
    let mut executed = 0;
    let mut errors: Vec<CommandFailure> = Vec::new();

    for (batch_index, batch) in commands.chunks(batch_size).enumerate() {
        let base = batch_index * batch_size;
        match executor.run_pipeline(batch) {
            Ok(outcomes) => {
                executed += batch.len();
                errors.extend(collect_failures(batch, &outcomes, base));
            }
            Err(err) => {
                tracing::warn!(
                    batch = batch_index,
                    size = batch.len(),
                    error = %err,
                    "batch failed, continuing with next batch"
                );
                let message = err.to_string();
                errors.extend(batch.iter().enumerate().map(|(offset, cmd)| CommandFailure {
                    index: base + offset,
                    command: cmd.display_line(),
                    error: message.clone(),
                }));
            }
        }
    }

    ExecutionResult {
        succeeded: errors.is_empty(),
        commands_executed: executed,
        commands_planned: planned,
        error_count: errors.len(),
        errors,
    }
}

fn collect_failures(
    commands: &[Command],
    outcomes: &[CommandOutcome],
    base: usize,
) -> Vec<CommandFailure> {
    commands
        .iter()
        .zip(outcomes)
        .enumerate()
        .filter_map(|(offset, (cmd, outcome))| match outcome {
            CommandOutcome::Ok => None,
            CommandOutcome::Error(message) => Some(CommandFailure {
                index: base + offset,
                command: cmd.display_line(),
                error: message.clone(),
            }),
        })
        .collect()
}
