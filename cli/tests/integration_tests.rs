use std::path::Path;
use std::process::Output;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_schema-load")
}

fn write_schema(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(format!("{name}.schema")), content).unwrap();
}

fn run(args: &[&str]) -> Output {
    std::process::Command::new(bin())
        .args(args)
        .output()
        .expect("failed to run schema-load")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn seed_dependent_schemas(dir: &Path) {
    write_schema(
        dir,
        "orders",
        "# dependencies: users\nLPUSH orders:log init;",
    );
    write_schema(dir, "users", "SET users:count 0;");
}

#[test]
fn plan_prints_commands_in_dependency_order() {
    let dir = tempfile::tempdir().unwrap();
    seed_dependent_schemas(dir.path());

    let output = run(&["plan", dir.path().to_str().unwrap()]);
    assert!(output.status.success());

    let text = stdout(&output);
    let users_pos = text.find("SET users:count 0").unwrap();
    let orders_pos = text.find("LPUSH orders:log init").unwrap();
    assert!(users_pos < orders_pos);
}

#[test]
fn plan_applies_prefix_and_variables() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "a", "SET ${ENV}:flag on;");

    let output = run(&[
        "plan",
        dir.path().to_str().unwrap(),
        "--prefix",
        "app:",
        "--var",
        "ENV=prod",
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("SET app:prod:flag on"));
}

#[test]
fn plan_json_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    seed_dependent_schemas(dir.path());

    let output = run(&["plan", dir.path().to_str().unwrap(), "--json"]);
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let files = plan.as_array().unwrap();
    assert_eq!(files[0]["name"], "users");
    assert_eq!(files[1]["name"], "orders");
}

#[test]
fn check_reports_metadata_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(
        dir.path(),
        "a",
        "# version: 2\n# description: demo\nSET a 1;",
    );

    let output = run(&["check", dir.path().to_str().unwrap()]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("a: version 2"));
    assert!(text.contains("1 file(s) ordered successfully"));
}

#[test]
fn check_fails_on_dependency_cycle() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "a", "# dependencies: b\nSET a 1;");
    write_schema(dir.path(), "b", "# dependencies: a\nSET b 1;");

    let output = run(&["check", dir.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("circular dependency"));
}

#[test]
fn check_fails_on_missing_dependency() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "a", "# dependencies: ghost\nSET a 1;");

    let output = run(&["check", dir.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ghost"));
}

#[test]
fn scripts_lists_extracted_blocks() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(
        dir.path(),
        "a",
        "SCRIPT: touch_all\nreturn 1\nEND_SCRIPT\nSET a 1;",
    );

    let output = run(&["scripts", dir.path().to_str().unwrap(), "--json"]);
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let scripts = listing.as_array().unwrap();
    assert_eq!(scripts.len(), 1);
    assert_eq!(scripts[0]["name"], "touch_all");
    assert_eq!(scripts[0]["lines"], 1);
    assert_eq!(scripts[0]["digest"].as_str().unwrap().len(), 64);
}

#[test]
fn empty_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["plan", dir.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no schema files"));
}
