use std::path::Path;

use redis_schema_core::SchemaError;
use redis_schema_engine::{ExecError, RecordingExecutor};
use redis_schema_loader::{LoadOptions, LoadOutcome, LoaderError, SchemaLoader};

fn write_schema(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(format!("{name}.schema")), content).unwrap();
}

fn loader_with(config: impl FnOnce(&mut LoadOptions)) -> SchemaLoader {
    let mut options = LoadOptions::default();
    config(&mut options);
    SchemaLoader::new(options)
}

#[test]
fn load_respects_dependency_order_across_files() {
    let dir = tempfile::tempdir().unwrap();
    // Named so that sorted order (orders, products, users) disagrees with
    // dependency order; the resolver must still put users first.
    write_schema(
        dir.path(),
        "orders",
        "# dependencies: users, products\nLPUSH orders:log init;",
    );
    write_schema(
        dir.path(),
        "products",
        "# dependencies: users\nSET products:count 0;",
    );
    write_schema(dir.path(), "users", "SET users:count 0;");

    let mut executor = RecordingExecutor::default();
    let run = loader_with(|_| {})
        .load_dir(dir.path(), &mut executor)
        .unwrap();

    assert!(run.report.succeeded());
    assert_eq!(run.report.outcome(), LoadOutcome::Applied);
    assert_eq!(run.report.commands_executed, 3);

    let file_names: Vec<&str> = run.report.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(file_names, ["users", "products", "orders"]);

    let keys: Vec<&str> = executor
        .all_commands()
        .iter()
        .map(|c| c.tokens()[1].as_str())
        .collect();
    assert_eq!(keys, ["users:count", "products:count", "orders:log"]);
}

#[test]
fn dry_run_submits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "a", "SET a 1;\nSET b 2;");

    let mut executor = RecordingExecutor::default();
    let run = loader_with(|o| o.config.dry_run = true)
        .load_dir(dir.path(), &mut executor)
        .unwrap();

    assert_eq!(run.report.outcome(), LoadOutcome::DryRun);
    assert_eq!(run.report.commands_executed, 0);
    assert_eq!(run.report.commands_planned, 2);
    assert!(executor.pipeline_calls().is_empty());
    assert!(executor.transaction_calls().is_empty());
}

#[test]
fn dependency_cycle_aborts_before_any_execution() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "a", "# dependencies: b\nSET a 1;");
    write_schema(dir.path(), "b", "# dependencies: a\nSET b 1;");

    let mut executor = RecordingExecutor::default();
    let err = loader_with(|_| {})
        .load_dir(dir.path(), &mut executor)
        .unwrap_err();

    assert!(matches!(
        err,
        LoaderError::Schema(SchemaError::CircularDependency(_))
    ));
    assert!(executor.all_commands().is_empty());
}

#[test]
fn missing_dependency_aborts_before_any_execution() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "a", "# dependencies: ghost\nSET a 1;");

    let mut executor = RecordingExecutor::default();
    let err = loader_with(|_| {})
        .load_dir(dir.path(), &mut executor)
        .unwrap_err();

    match err {
        LoaderError::Schema(SchemaError::MissingDependency { schema, dependency }) => {
            assert_eq!(schema, "a");
            assert_eq!(dependency, "ghost");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(executor.all_commands().is_empty());
}

#[test]
fn prefix_and_variables_are_applied_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "a", "SET ${ENV}:flag on;\nMGET a b;");

    let mut executor = RecordingExecutor::default();
    let run = loader_with(|o| {
        o.config.prefix = Some("app:".to_string());
        o.config
            .variables
            .insert("ENV".to_string(), "prod".to_string());
    })
    .load_dir(dir.path(), &mut executor)
    .unwrap();

    assert!(run.report.succeeded());
    let commands = executor.all_commands();
    assert_eq!(commands[0].tokens(), ["SET", "app:prod:flag", "on"]);
    assert_eq!(commands[1].tokens(), ["MGET", "app:a", "app:b"]);
}

#[test]
fn batch_failure_is_isolated_per_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "a", "SET a 1;\nSET b 2;\nSET c 3;");

    let mut executor = RecordingExecutor::default()
        .fail_batch(1, ExecError::BatchFailed("connection reset".into()));
    let run = loader_with(|o| o.config.batch_size = 1)
        .load_dir(dir.path(), &mut executor)
        .unwrap();

    assert_eq!(run.report.outcome(), LoadOutcome::PartiallyApplied);
    assert_eq!(run.report.commands_executed, 2);
    assert_eq!(run.report.error_count, 1);
    assert_eq!(executor.pipeline_calls().len(), 3);
}

#[test]
fn transaction_mode_rejects_file_atomically() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "a", "SET a 1;\nSET b 2;\nSET c 3;");

    let mut executor = RecordingExecutor::default().fail_command(1, "WRONGTYPE");
    let run = loader_with(|o| o.config.use_transactions = true)
        .load_dir(dir.path(), &mut executor)
        .unwrap();

    assert_eq!(run.report.outcome(), LoadOutcome::Failed);
    assert_eq!(run.report.commands_executed, 0);
    assert_eq!(run.report.error_count, 1);
    assert_eq!(run.report.files[0].result.errors[0].index, 1);
}

#[test]
fn scripts_are_registered_in_dependency_order() {
    let dir = tempfile::tempdir().unwrap();
    // Both files declare a script named "shared"; the dependent file's
    // version must win in the registry.
    write_schema(
        dir.path(),
        "base",
        "SCRIPT: shared\nreturn 1\nEND_SCRIPT\nSET base 1;",
    );
    write_schema(
        dir.path(),
        "app",
        "# dependencies: base\nSCRIPT: shared\nreturn 2\nEND_SCRIPT\nSET app 1;",
    );

    let mut executor = RecordingExecutor::default();
    let run = loader_with(|_| {})
        .load_dir(dir.path(), &mut executor)
        .unwrap();

    assert_eq!(run.registry.len(), 1);
    let entry = run.registry.get("shared").unwrap();
    assert_eq!(entry.script.body, "return 2");
    assert!(entry.script.source.ends_with("app.schema"));
}

#[test]
fn strict_scripts_degrades_malformed_file_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "a", "SET a 1;\nSCRIPT: broken\nreturn 1;");

    let mut executor = RecordingExecutor::default();
    let run = loader_with(|o| o.config.strict_scripts = true)
        .load_dir(dir.path(), &mut executor)
        .unwrap();

    assert_eq!(run.report.commands_executed, 0);
    assert_eq!(run.report.files[0].command_count, 0);
    assert!(executor.all_commands().is_empty());
}

#[test]
fn unreadable_parse_never_aborts_the_load() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "bad", "SET a \"unclosed;");
    write_schema(dir.path(), "good", "SET g 1;");

    let mut executor = RecordingExecutor::default();
    let run = loader_with(|_| {})
        .load_dir(dir.path(), &mut executor)
        .unwrap();

    // The bad file degrades to zero commands; the good file still runs.
    assert_eq!(run.report.commands_executed, 1);
    assert_eq!(executor.all_commands()[0].tokens(), ["SET", "g", "1"]);
}
