//! Directory loading and pipeline orchestration.
//!
//! [`SchemaLoader`] ties the whole pipeline together: discover schema
//! files, parse them (in parallel; parsing is pure), order them by
//! declared dependencies, build the script registry, then rewrite and
//! execute each file's commands strictly in dependency order.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use redis_schema_core::{SchemaFile, apply_prefix, order, parse};
use redis_schema_engine::{CommandExecutor, ScriptRegistry, execute};

use crate::config::LoadOptions;
use crate::error::{LoaderError, Result};
use crate::report::LoadReport;

/// Outcome of a full directory load: the aggregate report plus the script
/// registry built from every file's extracted blocks.
#[derive(Debug)]
pub struct LoadRun {
    /// Per-file and aggregate execution results.
    pub report: LoadReport,
    /// Scripts registered in dependency order (later names overwrite).
    pub registry: ScriptRegistry,
}

/// Loads a directory of schema files against a store client.
///
/// # Examples
///
/// ```no_run
/// use redis_schema_engine::RecordingExecutor;
/// use redis_schema_loader::{LoadOptions, SchemaLoader};
///
/// let loader = SchemaLoader::new(LoadOptions::default());
/// let mut executor = RecordingExecutor::default();
/// let run = loader.load_dir("schemas/", &mut executor).unwrap();
/// println!("{} commands executed", run.report.commands_executed);
/// ```
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    options: LoadOptions,
}

impl SchemaLoader {
    /// Creates a loader with the given options.
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// The options this loader runs with.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Collects schema file paths under `dir` with the configured
    /// extension, sorted by file name so the initial ordering (and thus
    /// tie-breaking between independent schemas) is deterministic.
    ///
    /// # Errors
    ///
    /// [`LoaderError::Io`] if the directory cannot be read;
    /// [`LoaderError::NoSchemaFiles`] if nothing matches.
    pub fn collect_schema_paths(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().and_then(|e| e.to_str()) == Some(self.options.extension.as_str())
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(LoaderError::NoSchemaFiles(dir.display().to_string()));
        }
        Ok(paths)
    }

    /// Reads and parses every schema file under `dir`, in sorted-name
    /// order. Parsing is fanned out with rayon; the order-preserving
    /// collect keeps results aligned with the path order. Files that fail
    /// to parse degrade to empty command lists and are reported by the
    /// parser at `warn` level.
    pub fn parse_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<SchemaFile>> {
        let paths = self.collect_schema_paths(dir)?;
        let sources: Vec<(String, String)> = paths
            .iter()
            .map(|path| {
                let content = std::fs::read_to_string(path)?;
                Ok((path.display().to_string(), content))
            })
            .collect::<Result<_>>()?;

        let files: Vec<SchemaFile> = sources
            .par_iter()
            .map(|(name, content)| parse(content, name, &self.options.config))
            .collect();

        for file in &files {
            if file.commands.is_empty() && file.scripts.is_empty() {
                tracing::warn!(source = file.source.as_str(), "schema file produced no commands");
            }
        }
        Ok(files)
    }

    /// Parses and dependency-orders the directory without executing
    /// anything. Ordering failures (cycles, missing dependencies) abort
    /// with the core error.
    pub fn plan_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<SchemaFile>> {
        let files = self.parse_dir(dir)?;
        Ok(order(files)?)
    }

    /// Runs the full pipeline against `executor`.
    ///
    /// Files execute strictly in dependency order, one at a time; a
    /// file's batches never overlap. Ordering failures abort before any
    /// command is submitted. Per-command and per-batch failures are
    /// captured into the report, never raised.
    pub fn load_dir(
        &self,
        dir: impl AsRef<Path>,
        executor: &mut dyn CommandExecutor,
    ) -> Result<LoadRun> {
        let config = &self.options.config;
        let ordered = self.plan_dir(dir)?;

        let mut registry = ScriptRegistry::new();
        for file in &ordered {
            registry.register_all(file.scripts.iter().cloned());
        }

        let mut report = LoadReport::new(config.dry_run);
        let prefix = config.prefix_str();
        for file in &ordered {
            let commands: Vec<_> = file
                .commands
                .iter()
                .map(|cmd| apply_prefix(cmd, prefix))
                .collect();
            let result = execute(&commands, executor, config);
            tracing::info!(
                schema = file.name.as_str(),
                executed = result.commands_executed,
                errors = result.error_count,
                "schema file processed"
            );
            report.add_file(&file.name, &file.source, file.scripts.len(), result);
        }

        tracing::info!(
            files = report.files.len(),
            executed = report.commands_executed,
            errors = report.error_count,
            outcome = %report.outcome(),
            "load complete"
        );
        Ok(LoadRun { report, registry })
    }
}
