//! Filesystem loading and orchestration for Redis schema files.
//!
//! This crate drives the full pipeline: discover schema files in a
//! directory, parse them, order them by declared dependencies, register
//! their script blocks, rewrite keys with the configured prefix, and
//! execute everything through a [`CommandExecutor`] supplied by the
//! caller.
//!
//! [`CommandExecutor`]: redis_schema_engine::CommandExecutor
//!
//! # Quick start
//!
//! ```no_run
//! use redis_schema_engine::RecordingExecutor;
//! use redis_schema_loader::{LoadOptions, SchemaLoader};
//!
//! let options = LoadOptions::load("load-options.yml").unwrap();
//! let loader = SchemaLoader::new(options);
//!
//! let mut executor = RecordingExecutor::default();
//! let run = loader.load_dir("schemas/", &mut executor).unwrap();
//!
//! println!(
//!     "{}: {} commands, {} errors",
//!     run.report.outcome(),
//!     run.report.commands_executed,
//!     run.report.error_count,
//! );
//! ```

mod config;
mod error;
mod loader;
mod report;

pub use config::LoadOptions;
pub use error::{LoaderError, Result};
pub use loader::{LoadRun, SchemaLoader};
pub use report::{FileReport, LoadOutcome, LoadReport};
