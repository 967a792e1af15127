use super::*;
use crate::cli::Backend;
use std::fs;
use tempfile::TempDir;
use tm_core::ViewDropPolicy;

const POSTGRES_CONFIG: &str = r#"
migrations_path: db/migrations
ledger_table: schema_migrations
views:
  drop_failure: fail
database:
  type: postgres
  host: localhost
  port: 5432
  user: app
  password: secret
  name: shop
"#;

#[test]
fn test_load_config_file_from_project_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tidemark.yml"), POSTGRES_CONFIG).unwrap();

    let ctx = ProjectContext::load(&GlobalArgs::for_project(dir.path())).unwrap();

    assert_eq!(ctx.config.ledger_table, "schema_migrations");
    assert_eq!(ctx.config.views.drop_failure, ViewDropPolicy::Fail);
    assert_eq!(ctx.config.database.host.as_deref(), Some("localhost"));
    assert_eq!(ctx.migrations_dir(), dir.path().join("db/migrations"));
    ctx.config.validate().unwrap();
}

#[test]
fn test_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tidemark.yml"), POSTGRES_CONFIG).unwrap();
    let mut global = GlobalArgs::for_project(dir.path());
    global.dbhost = Some("db.internal".to_string());
    global.dbport = Some(6432);
    global.migrationspath = Some("other".to_string());

    let ctx = ProjectContext::load(&global).unwrap();

    assert_eq!(ctx.config.database.host.as_deref(), Some("db.internal"));
    assert_eq!(ctx.config.database.port, Some(6432));
    assert_eq!(ctx.config.database.user.as_deref(), Some("app"));
    assert_eq!(ctx.config.migrations_path, "other");
}

#[test]
fn test_flags_only_without_config_file() {
    let dir = TempDir::new().unwrap();
    let mut global = GlobalArgs::for_project(dir.path());
    global.backend = Some(Backend::Duckdb);
    global.database_path = Some("dev.duckdb".to_string());
    global.migrationspath = Some("migrations".to_string());

    let ctx = ProjectContext::load_validated(&global).unwrap();

    assert_eq!(ctx.config.database.db_type, DbType::DuckDb);
    assert_eq!(
        ctx.database_config().path,
        Some(dir.path().join("dev.duckdb").display().to_string())
    );
}

#[test]
fn test_missing_required_field_reported() {
    let dir = TempDir::new().unwrap();
    let mut global = GlobalArgs::for_project(dir.path());
    global.migrationspath = Some("migrations".to_string());
    global.dbhost = Some("localhost".to_string());

    let err = ProjectContext::load_validated(&global).unwrap_err();

    assert!(format!("{err:#}").contains("database.port is required"));
}

#[test]
fn test_explicit_config_path() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("ci.yaml");
    fs::write(&config_path, POSTGRES_CONFIG).unwrap();
    let mut global = GlobalArgs::for_project(dir.path());
    global.config = Some(config_path);

    let ctx = ProjectContext::load(&global).unwrap();

    assert_eq!(ctx.config.database.name.as_deref(), Some("shop"));
}

#[test]
fn test_explicit_config_path_must_exist() {
    let dir = TempDir::new().unwrap();
    let mut global = GlobalArgs::for_project(dir.path());
    global.config = Some(dir.path().join("missing.yml"));

    assert!(ProjectContext::load(&global).is_err());
}

#[test]
fn test_memory_and_absolute_duckdb_paths_unchanged() {
    let root = Path::new("/srv/project");
    assert_eq!(resolve_duckdb_path(root, ":memory:"), ":memory:");
    assert_eq!(resolve_duckdb_path(root, "/var/db/app.duckdb"), "/var/db/app.duckdb");
    assert_eq!(
        resolve_duckdb_path(root, "app.duckdb"),
        root.join("app.duckdb").display().to_string()
    );
}
