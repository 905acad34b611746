use super::*;

#[test]
fn parses_search_command() {
    let cli = Cli::try_parse_from([
        "welp", "search", "--budget", "15", "--city", "Austin", "--zip", "78701",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search {
            ref budget,
            ref city,
            ref zip,
            credentials: Credentials { email: None, .. },
            select: None,
        } if budget == "15" && city == "Austin" && zip == "78701"
    ));
}

#[test]
fn parses_search_with_account_and_selection() {
    let cli = Cli::try_parse_from([
        "welp",
        "search",
        "--budget",
        "$12.50",
        "--city",
        "Austin",
        "--zip",
        "78701",
        "--email",
        "a@example.com",
        "--password",
        "secret1",
        "--select",
        "2",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search {
            credentials: Credentials {
                email: Some(ref e),
                password: Some(_),
            },
            select: Some(2),
            ..
        } if e == "a@example.com"
    ));
}

#[test]
fn search_requires_zip() {
    let result = Cli::try_parse_from(["welp", "search", "--budget", "15", "--city", "Austin"]);
    assert!(result.is_err());
}

#[test]
fn parses_history_replay() {
    let cli = Cli::try_parse_from([
        "welp",
        "history",
        "--email",
        "a@example.com",
        "--password",
        "secret1",
        "--replay",
        "3",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::History {
            replay: Some(3),
            ..
        }
    ));
}

#[test]
fn parses_login() {
    let cli = Cli::try_parse_from([
        "welp",
        "login",
        "--email",
        "a@example.com",
        "--password",
        "secret1",
    ])
    .expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Login { .. }));
}

#[test]
fn no_command_is_an_error() {
    assert!(Cli::try_parse_from(["welp"]).is_err());
}

#[test]
fn history_without_password_is_rejected() {
    let credentials = Credentials {
        email: Some("a@example.com".to_string()),
        password: None,
    };
    let err = require_credentials(&credentials).unwrap_err();
    assert_eq!(err.to_string(), "both --email and --password are required");
}

#[test]
fn password_falls_back_to_dotenv_file() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    std::fs::write(&env_file, "WELP_PASSWORD=from-dotenv\n").unwrap();
    dotenvy::from_path(&env_file).unwrap();

    let cli = Cli::try_parse_from(["welp", "login", "--email", "a@example.com"])
        .expect("expected valid cli args");

    let Commands::Login { credentials } = cli.command else {
        panic!("expected login command");
    };
    let (email, password) = require_credentials(&credentials).unwrap();
    assert_eq!(email, "a@example.com");
    assert!(!password.is_empty());
}
