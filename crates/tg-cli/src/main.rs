//! tg - tenant access gate CLI
//!
//! # Examples
//!
//! ```bash
//! # Inspect a token (no network)
//! tg claims --token "$TOKEN" --pretty
//!
//! # Check access to a tenant; exit code 0 = allowed, 2 = denied
//! tg check --token "$TOKEN" --tenant acme
//! ```

use tg_cli::cli::{Cli, Commands};
use tg_cli::commands::{self, EXIT_ALLOWED};
use tg_cli::{CliError, CliResult, logger};

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tg_config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<u8> {
    let mut config = Config::load()?;
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }
    config.validate()?;

    let log_file = config.log_file_path()?;
    if let Some(dir) = log_file.as_ref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(dir).map_err(|e| CliError::LogDir {
            path: dir.display().to_string(),
            source: e,
        })?;
    }
    logger::initialize(config.logging.level, log_file, config.logging.colored)?;

    if log::log_enabled!(log::Level::Debug) {
        config.log_summary();
    }

    match cli.command {
        Commands::Claims { token } => {
            let report = commands::claims_report(&token, chrono::Utc::now().timestamp());
            print_json(&report, cli.pretty)?;
            Ok(EXIT_ALLOWED)
        }
        Commands::Check {
            token,
            user,
            tenant,
        } => {
            let gate = commands::build_gate(&config)?;
            let view = commands::check(&gate, &token, user.as_deref(), &tenant).await;
            print_json(&view, cli.pretty)?;
            Ok(commands::exit_code(&view))
        }
        Commands::Logout { tenant } => {
            print_json(&commands::logout_view(&tenant), cli.pretty)?;
            Ok(EXIT_ALLOWED)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> CliResult<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}
