//! End-to-end command runs against the in-memory backends.

use clap::Parser;
use storekit_cli::cli::Cli;
use storekit_cli::{CliError, Exit};
use storekit_common_config::{vars, FlushScope, StorekitConfig};
use storekit_test_utils::{assert_err, assert_ok, temp_file, EnvGuard};

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["storekit", "--memory"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

async fn run(args: &[&str]) -> Result<(), CliError> {
    parse(args).execute(StorekitConfig::default()).await
}

#[tokio::test]
async fn school_commands_succeed_on_empty_collection() {
    assert_ok!(run(&["schools", "list"]).await);
    assert_ok!(run(&["schools", "count", "--format", "json"]).await);
    assert_ok!(run(&["schools", "by-topic", "Python"]).await);
    assert_ok!(run(&["schools", "update-topics", "Holberton school", "AI", "C"]).await);
    assert_ok!(run(&["students", "top", "-n", "3"]).await);
}

#[tokio::test]
async fn insert_accepts_typed_fields() {
    assert_ok!(run(&["schools", "insert", "name=UCSF", "rank=3", "open=true"]).await);
}

#[tokio::test]
async fn update_topics_requires_topics() {
    let argv = ["storekit", "--memory", "schools", "update-topics", "Holberton school"];
    assert!(Cli::try_parse_from(argv).is_err());
}

#[tokio::test]
async fn cache_commands_succeed() {
    assert_ok!(run(&["cache", "store", "42", "--as", "int"]).await);
    assert_ok!(run(&["cache", "get", "no-such-key"]).await);
    assert_ok!(run(&["cache", "count"]).await);
    assert_ok!(run(&["cache", "replay", "--format", "json"]).await);
}

#[tokio::test]
async fn bad_value_is_a_validation_error() {
    let err = assert_err!(run(&["cache", "store", "abc", "--as", "int"]).await);
    assert_eq!(err.exit(), Exit::ValidationError);
}

#[tokio::test]
async fn namespace_flush_without_prefix_is_a_config_error() {
    let mut config = StorekitConfig::default();
    config.cache.flush = FlushScope::Namespace;

    let err = assert_err!(parse(&["cache", "store", "x"]).execute(config).await);
    assert_eq!(err.exit(), Exit::ConfigError);
    assert!(err.hint().is_some());
}

#[test]
fn config_flag_loads_that_file() {
    let (_dir, path) = temp_file(
        "mongo:\n  database: campus\n  collection: schools\ncache:\n  flush: none\n",
    );
    let _guard = EnvGuard::new()
        .unset(vars::STOREKIT_MONGO_URI)
        .unset(vars::STOREKIT_REDIS_URL);

    let cli = Cli::try_parse_from([
        "storekit",
        "--config",
        path.to_str().unwrap(),
        "schools",
        "list",
    ])
    .unwrap();
    let config = cli.load_config().unwrap();

    assert_eq!(config.mongo.database, "campus");
    assert_eq!(config.mongo.collection, "schools");
    assert_eq!(config.cache.flush, FlushScope::None);
}

#[test]
fn missing_config_file_is_reported() {
    let cli = Cli::try_parse_from([
        "storekit",
        "--config",
        "/nonexistent/storekit.yaml",
        "schools",
        "list",
    ])
    .unwrap();

    let err = assert_err!(cli.load_config());
    assert_eq!(err.exit(), Exit::ConfigError);
}
