//! Execution engine for ordered schema command lists.
//!
//! The core crate produces ordered, prefix-rewritten commands; this crate
//! replays them against an abstract store client:
//!
//! - [`CommandExecutor`] — the collaborator seam a real client implements.
//! - [`execute`] — dry-run, transactional, or pipelined replay with
//!   aggregated [`ExecutionResult`]s.
//! - [`ScriptRegistry`] — name → script map built from extracted blocks,
//!   with SHA-256 body digests.
//! - [`RecordingExecutor`] — a scriptable in-memory executor for tests.
//!
//! [`ExecutionResult`]: redis_schema_core::ExecutionResult
//!
//! # Example
//!
//! ```
//! use redis_schema_core::{Command, LoadConfig};
//! use redis_schema_engine::{RecordingExecutor, execute};
//!
//! let commands = vec![
//!     Command::new(vec!["SET".into(), "a".into(), "1".into()]).unwrap(),
//!     Command::new(vec!["SET".into(), "b".into(), "2".into()]).unwrap(),
//! ];
//! let mut executor = RecordingExecutor::default();
//! let result = execute(&commands, &mut executor, &LoadConfig::default());
//!
//! assert!(result.succeeded);
//! assert_eq!(result.commands_executed, 2);
//! ```

mod engine;
mod error;
mod executor;
mod registry;
mod testing;

pub use engine::execute;
pub use error::{ExecError, Result};
pub use executor::{CommandExecutor, CommandOutcome};
pub use registry::{ScriptEntry, ScriptRegistry};
pub use testing::RecordingExecutor;
