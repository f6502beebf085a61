//! storekit CLI
//!
//! Main entry point for the `storekit` binary.

use std::process::ExitCode;

use clap::Parser;
use storekit_cli::cli::Cli;
use storekit_cli::{CliError, Exit};
use storekit_common_config::Environment;
use storekit_common_log::{LogConfig, LogFormat, LogLevel};
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _env = Environment::init();

    if let Err(e) = init_logging(&cli) {
        eprintln!("warning: {e}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to create Tokio runtime: {e}");
            return Exit::GeneralError.into();
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            error!(code = e.code(), "{e}");
            eprintln!("error: {e}");
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            e.exit_code().into()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.load_config()?;
    cli.execute(config).await
}

fn init_logging(cli: &Cli) -> Result<(), CliError> {
    let mut config = LogConfig::from_env();

    // -v/-q override RUST_LOG. Without them the default is warn, which RUST_LOG may still raise.
    let level_from_env = std::env::var(storekit_common_log::vars::LOG_LEVEL).is_ok();
    if cli.verbose > 0 || cli.quiet {
        config = config.with_level(LogLevel::from_verbosity(cli.verbose, cli.quiet));
    } else if !level_from_env {
        config.level = LogLevel::Warn;
    }
    if std::env::var(storekit_common_log::vars::LOG_FORMAT).is_err() {
        config = config.with_format(LogFormat::Compact);
    }

    storekit_common_log::init(config)?;
    Ok(())
}
