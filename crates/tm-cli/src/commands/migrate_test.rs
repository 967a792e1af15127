use super::*;
use std::fs;
use tempfile::TempDir;
use tm_core::{RecordingReporter, ReportLevel};
use tm_db::{DatabaseCore, DatabaseLedger, DuckDbBackend};

const CONFIG: &str = r#"
migrations_path: migrations
database:
  type: duckdb
  path: app.duckdb
"#;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tidemark.yml"), CONFIG).unwrap();
    for (name, sql) in files {
        let path = dir.path().join("migrations").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, sql).unwrap();
    }
    dir
}

#[tokio::test]
async fn test_migrate_then_ensure_against_duckdb_file() {
    let dir = project(&[
        ("m000_init.sql", "CREATE TABLE accounts (id INT);"),
        ("m001_add_users.sql", "CREATE TABLE users (id INT, active BOOLEAN);"),
        (
            "views/active_users.sql",
            "CREATE VIEW active_users AS SELECT id FROM users WHERE active;",
        ),
    ]);
    let global = GlobalArgs::for_project(dir.path());

    execute(&global).await.unwrap();
    crate::commands::ensure::execute(&global).await.unwrap();

    let db = DuckDbBackend::from_path(&dir.path().join("app.duckdb")).unwrap();
    let ids: Vec<i64> = db
        .fetch_ledger("migrations")
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![0, 1]);
    assert_eq!(db.query_count("SELECT * FROM active_users").await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_name_fails_before_connecting() {
    let dir = project(&[("init.sql", "CREATE TABLE accounts (id INT);")]);

    let err = execute(&GlobalArgs::for_project(dir.path()))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("invalid migration file name init.sql"));
    assert!(!dir.path().join("app.duckdb").exists());
}

#[tokio::test]
async fn test_ensure_fails_with_pending_migrations() {
    let dir = project(&[("m000_init.sql", "CREATE TABLE accounts (id INT);")]);

    let err = crate::commands::ensure::execute(&GlobalArgs::for_project(dir.path()))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("there are 1 migrations left to run"));
}

#[tokio::test]
async fn test_connection_reported_through_reporter() {
    let dir = project(&[("m000_init.sql", "CREATE TABLE accounts (id INT);")]);
    let reporter = RecordingReporter::new();

    let report = run(&GlobalArgs::for_project(dir.path()), &reporter)
        .await
        .unwrap();

    assert_eq!(report.applied.len(), 1);
    let infos = reporter.at_level(ReportLevel::Info);
    assert_eq!(infos[0], "Connected to duckdb database");
    assert!(infos.contains(&"Running migration m000_init.sql".to_string()));
}
