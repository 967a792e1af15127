//! CLI integration tests for Tidemark
//!
//! Runs the `tm` binary against the fixture migration directories with a
//! DuckDB file in a temporary directory.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the compiled tm binary (resolved at compile time)
fn tm_bin() -> String {
    env!("CARGO_BIN_EXE_tm").to_string()
}

const SAMPLE_MIGRATIONS: &str = "tests/fixtures/sample_migrations";
const MALFORMED_MIGRATIONS: &str = "tests/fixtures/malformed_migrations";

const DB_ENV_VARS: &[&str] = &[
    "TM_BACKEND",
    "TM_DB_HOST",
    "TM_DB_PORT",
    "TM_DB_USER",
    "TM_DB_PASSWORD",
    "TM_DB_NAME",
    "TM_MIGRATIONS_PATH",
    "TM_DATABASE_PATH",
];

fn tm(args: &[&str]) -> Command {
    let mut cmd = Command::new(tm_bin());
    for var in DB_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1").args(args);
    cmd
}

fn run_duckdb(command: &str, migrations: &str, db_path: &Path) -> Output {
    tm(&[
        "--backend",
        "duckdb",
        "--database-path",
        &db_path.display().to_string(),
        "--migrationspath",
        migrations,
        command,
    ])
    .output()
    .expect("Failed to run tm")
}

fn combined(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn test_migrate_applies_fixture_and_ensure_passes() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("app.duckdb");

    let output = run_duckdb("migrate", SAMPLE_MIGRATIONS, &db_path);
    let text = combined(&output);
    assert!(output.status.success(), "migrate failed: {text}");
    assert!(text.contains("Connected to duckdb database"));
    assert!(text.contains("Migration m000_init.sql ran successfully"));
    assert!(text.contains("Migration m001_add_users.sql ran successfully"));
    assert!(text.contains("All views are set up"));

    let output = run_duckdb("ensure", SAMPLE_MIGRATIONS, &db_path);
    let text = combined(&output);
    assert!(output.status.success(), "ensure failed: {text}");
    assert!(text.contains("Migrations are up to date"));
}

#[test]
fn test_second_migrate_runs_nothing() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("app.duckdb");

    assert!(run_duckdb("migrate", SAMPLE_MIGRATIONS, &db_path).status.success());
    let output = run_duckdb("migrate", SAMPLE_MIGRATIONS, &db_path);
    let text = combined(&output);

    assert!(output.status.success(), "second migrate failed: {text}");
    assert!(text.contains("All migrations already ran"));
    assert!(!text.contains("Running migration"));
    assert!(text.contains("All views are set up"));
}

#[test]
fn test_ensure_on_fresh_database_fails() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("app.duckdb");

    let output = run_duckdb("ensure", SAMPLE_MIGRATIONS, &db_path);

    assert!(!output.status.success());
    assert!(combined(&output).contains("there are 2 migrations left to run"));
}

#[test]
fn test_status_lists_every_migration() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("app.duckdb");

    let output = run_duckdb("status", SAMPLE_MIGRATIONS, &db_path);
    let text = combined(&output);
    assert!(output.status.success(), "status failed: {text}");
    assert!(text.contains("2 migrations, 0 applied, 2 pending"));

    assert!(run_duckdb("migrate", SAMPLE_MIGRATIONS, &db_path).status.success());
    let text = combined(&run_duckdb("status", SAMPLE_MIGRATIONS, &db_path));
    assert!(text.contains("2 migrations, 2 applied, 0 pending"));
}

#[test]
fn test_malformed_file_name_rejected_before_database() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("app.duckdb");

    let output = run_duckdb("migrate", MALFORMED_MIGRATIONS, &db_path);

    assert!(!output.status.success());
    assert!(combined(&output).contains("invalid migration file name 001_add_users.sql"));
    assert!(!db_path.exists());
}

#[test]
fn test_missing_connection_settings_fail() {
    let output = tm(&["--migrationspath", SAMPLE_MIGRATIONS, "migrate"])
        .output()
        .expect("Failed to run tm");

    assert!(!output.status.success());
    assert!(combined(&output).contains("database.host is required"));
}

#[test]
fn test_project_config_file() {
    let tmp = TempDir::new().unwrap();
    let migrations = tmp.path().join("migrations");
    std::fs::create_dir_all(&migrations).unwrap();
    std::fs::write(
        migrations.join("m000_init.sql"),
        "CREATE TABLE accounts (id INTEGER);",
    )
    .unwrap();
    std::fs::write(
        tmp.path().join("tidemark.yml"),
        "migrations_path: migrations\nledger_table: schema_history\ndatabase:\n  type: duckdb\n  path: app.duckdb\n",
    )
    .unwrap();
    let project_dir = tmp.path().display().to_string();

    let output = tm(&["--project-dir", &project_dir, "migrate"])
        .output()
        .expect("Failed to run tm");
    assert!(output.status.success(), "migrate failed: {}", combined(&output));
    assert!(tmp.path().join("app.duckdb").exists());

    let output = tm(&["-p", &project_dir, "ensure"])
        .output()
        .expect("Failed to run tm");
    assert!(output.status.success(), "ensure failed: {}", combined(&output));
}

#[test]
fn test_new_scaffolds_next_migration() {
    let tmp = TempDir::new().unwrap();
    let migrations = tmp.path().join("migrations");
    std::fs::create_dir_all(&migrations).unwrap();
    std::fs::write(migrations.join("m000_init.sql"), "SELECT 1;").unwrap();

    let output = tm(&[
        "--migrationspath",
        &migrations.display().to_string(),
        "new",
        "Add Orders",
    ])
    .output()
    .expect("Failed to run tm");

    assert!(output.status.success(), "new failed: {}", combined(&output));
    assert!(migrations.join("m001_add_orders.sql").exists());
}
