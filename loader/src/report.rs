//! Aggregate reporting for a load invocation.

use serde::{Deserialize, Serialize};

use redis_schema_core::ExecutionResult;

/// How a completed load ended, for user-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Nothing was attempted; the report lists what would run.
    DryRun,
    /// Every command in every file succeeded.
    Applied,
    /// Some commands were applied, some failed (pipelined mode).
    PartiallyApplied,
    /// Commands failed with nothing applied (e.g. rejected transactions).
    Failed,
}

impl std::fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DryRun => write!(f, "dry_run"),
            Self::Applied => write!(f, "applied"),
            Self::PartiallyApplied => write!(f, "partially_applied"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Per-file slice of a load report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Schema base name.
    pub name: String,
    /// Full source identifier.
    pub source: String,
    /// Commands parsed out of the file.
    pub command_count: usize,
    /// Script blocks extracted from the file.
    pub script_count: usize,
    /// Execution outcome for the file's command list.
    pub result: ExecutionResult,
}

/// Aggregate result of one load invocation, in execution order.
///
/// Totals are accumulated append-only as files complete; nothing here is
/// shared across files beyond these counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadReport {
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Per-file reports in dependency order.
    pub files: Vec<FileReport>,
    /// Total commands executed across all files.
    pub commands_executed: usize,
    /// Total commands that would run (dry-run reporting).
    pub commands_planned: usize,
    /// Total failed commands across all files.
    pub error_count: usize,
}

impl LoadReport {
    /// Creates an empty report.
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Appends a file's outcome, folding its counts into the totals.
    pub fn add_file(&mut self, name: &str, source: &str, script_count: usize, result: ExecutionResult) {
        self.commands_executed += result.commands_executed;
        self.commands_planned += result.commands_planned;
        self.error_count += result.error_count;
        self.files.push(FileReport {
            name: name.to_string(),
            source: source.to_string(),
            command_count: result.commands_planned,
            script_count,
            result,
        });
    }

    /// Returns `true` when no command failed.
    pub fn succeeded(&self) -> bool {
        self.error_count == 0
    }

    /// Classifies the load for user-facing reporting.
    pub fn outcome(&self) -> LoadOutcome {
        if self.dry_run {
            LoadOutcome::DryRun
        } else if self.error_count == 0 {
            LoadOutcome::Applied
        } else if self.commands_executed > 0 {
            LoadOutcome::PartiallyApplied
        } else {
            LoadOutcome::Failed
        }
    }
}
