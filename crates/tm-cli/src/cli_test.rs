use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from([
        "tidemark",
        "migrate",
        "--dry-run",
        "--target",
        "prod",
        "--database",
        "app.duckdb",
    ])
    .unwrap();

    assert_eq!(cli.global.target.as_deref(), Some("prod"));
    assert_eq!(cli.global.database.as_deref(), Some("app.duckdb"));
    assert_eq!(cli.global.project_dir, ".");
    match cli.command {
        Commands::Migrate(args) => assert!(args.dry_run),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_status_output_format() {
    let cli = Cli::try_parse_from(["tidemark", "status", "-o", "json"]).unwrap();
    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, StatusOutput::Json),
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["tidemark", "status"]).unwrap();
    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, StatusOutput::Table),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_unknown_output_format_is_rejected() {
    assert!(Cli::try_parse_from(["tidemark", "status", "--output", "yaml"]).is_err());
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["tidemark", "--verbose"]).is_err());
}
