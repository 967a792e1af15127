use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_database_flags() {
    let cli = Cli::try_parse_from([
        "tm",
        "--dbhost",
        "db.internal",
        "--dbport",
        "6432",
        "--dbuser",
        "app",
        "--dbpassword",
        "secret",
        "--dbname",
        "shop",
        "--migrationspath",
        "db/migrations",
        "migrate",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Migrate));
    assert_eq!(cli.global.dbhost.as_deref(), Some("db.internal"));
    assert_eq!(cli.global.dbport, Some(6432));
    assert_eq!(cli.global.dbuser.as_deref(), Some("app"));
    assert_eq!(cli.global.dbpassword.as_deref(), Some("secret"));
    assert_eq!(cli.global.dbname.as_deref(), Some("shop"));
    assert_eq!(cli.global.migrationspath.as_deref(), Some("db/migrations"));
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "tm",
        "ensure",
        "--backend",
        "duckdb",
        "--database-path",
        ":memory:",
        "-v",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Ensure));
    assert_eq!(cli.global.backend, Some(Backend::Duckdb));
    assert_eq!(cli.global.database_path.as_deref(), Some(":memory:"));
    assert!(cli.global.verbose);
}

#[test]
fn test_new_requires_description() {
    assert!(Cli::try_parse_from(["tm", "new"]).is_err());

    let cli = Cli::try_parse_from(["tm", "new", "add orders"]).unwrap();
    match cli.command {
        Commands::New(args) => assert_eq!(args.description, "add orders"),
        other => panic!("expected new, got {other:?}"),
    }
}

#[test]
fn test_invalid_port_rejected() {
    assert!(Cli::try_parse_from(["tm", "--dbport", "not-a-port", "migrate"]).is_err());
}

#[test]
fn test_backend_maps_to_db_type() {
    assert_eq!(DbType::from(Backend::Postgres), DbType::Postgres);
    assert_eq!(DbType::from(Backend::Duckdb), DbType::DuckDb);
}
