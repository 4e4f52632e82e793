//! `schema-load`: offline planning and inspection for Redis schema
//! directories.
//!
//! The store client is supplied by embedding applications, not by this
//! binary, so every subcommand here is offline: `plan` prints the
//! ordered, prefix-rewritten command sequence a load would submit,
//! `check` validates parsing and dependency ordering, and `scripts`
//! lists the extracted script blocks.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use redis_schema_core::{LoadConfig, SchemaFile, apply_prefix};
use redis_schema_engine::ScriptRegistry;
use redis_schema_loader::{LoadOptions, SchemaLoader};

#[derive(Debug, Parser)]
#[command(name = "schema-load")]
#[command(about = "Offline planning and inspection for Redis schema directories")]
struct Cli {
    /// Enable tracing output (respects RUST_LOG when set).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the ordered, prefix-rewritten command sequence a load would
    /// submit.
    Plan(PlanArgs),
    /// Parse and dependency-order a schema directory, reporting per-file
    /// metadata and problems.
    Check(CheckArgs),
    /// List script blocks extracted from a schema directory.
    Scripts(ScriptsArgs),
}

/// Flags shared by every subcommand: where the schemas live and how the
/// load is configured.
#[derive(Debug, Args)]
struct CommonArgs {
    /// Directory containing schema files.
    dir: PathBuf,
    /// YAML load-options file (flags below override its values).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Namespace prefix applied to key-bearing tokens.
    #[arg(long)]
    prefix: Option<String>,
    /// Template variable as NAME=VALUE (repeatable).
    #[arg(long = "var", value_name = "NAME=VALUE")]
    vars: Vec<String>,
    /// Schema file extension without the dot.
    #[arg(long)]
    extension: Option<String>,
    /// Treat malformed script blocks as parse failures.
    #[arg(long)]
    strict_scripts: bool,
}

#[derive(Debug, Args)]
struct PlanArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Emit the plan as JSON instead of a command listing.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct ScriptsArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Emit the script listing as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Command::Plan(args) => run_plan(args),
        Command::Check(args) => run_check(args),
        Command::Scripts(args) => run_scripts(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn build_options(common: &CommonArgs) -> Result<LoadOptions, String> {
    let mut options = match &common.config {
        Some(path) => LoadOptions::load(path)
            .map_err(|err| format!("failed to load '{}': {err}", path.display()))?,
        None => LoadOptions::default(),
    };

    if let Some(prefix) = &common.prefix {
        options.config.prefix = Some(prefix.clone());
    }
    if let Some(extension) = &common.extension {
        options.extension = extension.clone();
    }
    if common.strict_scripts {
        options.config.strict_scripts = true;
    }
    for pair in &common.vars {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("--var '{pair}' is not NAME=VALUE"))?;
        options
            .config
            .variables
            .insert(name.to_string(), value.to_string());
    }
    Ok(options)
}

fn plan_files(common: &CommonArgs) -> Result<(Vec<SchemaFile>, LoadConfig), String> {
    let options = build_options(common)?;
    let loader = SchemaLoader::new(options);
    let files = loader
        .plan_dir(&common.dir)
        .map_err(|err| err.to_string())?;
    Ok((files, loader.options().config.clone()))
}

fn run_plan(args: PlanArgs) -> Result<(), String> {
    let (files, config) = plan_files(&args.common)?;
    let prefix = config.prefix_str();

    if args.json {
        let plan: Vec<serde_json::Value> = files
            .iter()
            .map(|file| {
                serde_json::json!({
                    "name": file.name,
                    "source": file.source,
                    "commands": file
                        .commands
                        .iter()
                        .map(|cmd| apply_prefix(cmd, prefix).into_tokens())
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).map_err(|err| err.to_string())?
        );
        return Ok(());
    }

    for file in &files {
        println!("# {} ({} commands)", file.name, file.commands.len());
        for cmd in &file.commands {
            println!("{}", apply_prefix(cmd, prefix).display_line());
        }
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let (files, _) = plan_files(&args.common)?;

    let mut warnings = 0;
    for file in &files {
        let meta = &file.metadata;
        let deps = if meta.dependencies.is_empty() {
            "-".to_string()
        } else {
            meta.dependencies.join(", ")
        };
        println!(
            "{}: version {}, {} commands, {} scripts, depends on {}",
            file.name,
            meta.version,
            file.commands.len(),
            file.scripts.len(),
            deps
        );
        if file.commands.is_empty() && file.scripts.is_empty() {
            println!("  warning: file produced no commands (parse failure or empty file)");
            warnings += 1;
        }
    }
    println!(
        "{} file(s) ordered successfully, {} warning(s)",
        files.len(),
        warnings
    );
    Ok(())
}

fn run_scripts(args: ScriptsArgs) -> Result<(), String> {
    let (files, _) = plan_files(&args.common)?;

    let mut registry = ScriptRegistry::new();
    for file in &files {
        registry.register_all(file.scripts.iter().cloned());
    }

    if args.json {
        let listing: Vec<serde_json::Value> = registry
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "name": entry.script.name,
                    "source": entry.script.source,
                    "digest": entry.digest,
                    "lines": entry.script.body.lines().count(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&listing).map_err(|err| err.to_string())?
        );
        return Ok(());
    }

    if registry.is_empty() {
        println!("no scripts found");
        return Ok(());
    }
    for entry in registry.iter() {
        println!(
            "{} ({} lines, sha256 {}) from {}",
            entry.script.name,
            entry.script.body.lines().count(),
            &entry.digest[..12],
            entry.script.source
        );
    }
    Ok(())
}
