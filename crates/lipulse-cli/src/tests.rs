use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["lipulse-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["lipulse-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["lipulse-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_add_user() {
    let cli = Cli::try_parse_from(["lipulse-cli", "add-user", "jane-doe"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::AddUser { ref username }) if username == "jane-doe"
    ));
}

#[test]
fn add_user_requires_username() {
    assert!(Cli::try_parse_from(["lipulse-cli", "add-user"]).is_err());
}

#[test]
fn add_post_created_at_defaults_to_none() {
    let cli = Cli::try_parse_from(["lipulse-cli", "add-post", "jane", "7230"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::AddPost {
            ref username,
            ref post_id,
            created_at: None,
        }) if username == "jane" && post_id == "7230"
    ));
}

#[test]
fn add_post_parses_rfc3339_created_at() {
    let cli = Cli::try_parse_from([
        "lipulse-cli",
        "add-post",
        "jane",
        "7230",
        "--created-at",
        "2024-08-01T09:30:00Z",
    ])
    .unwrap();

    let Some(Commands::AddPost { created_at, .. }) = cli.command else {
        panic!("expected add-post");
    };
    let expected: DateTime<Utc> = "2024-08-01T09:30:00Z".parse().unwrap();
    assert_eq!(created_at, Some(expected));
}

#[test]
fn add_post_rejects_malformed_created_at() {
    let result = Cli::try_parse_from([
        "lipulse-cli",
        "add-post",
        "jane",
        "7230",
        "--created-at",
        "yesterday",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_analyze() {
    let cli = Cli::try_parse_from(["lipulse-cli", "analyze", "jane"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Analyze { ref username }) if username == "jane"
    ));
}
