use std::process::ExitCode;

use clap::Parser;
use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use tracing::{debug, error};

mod cli;
mod commands;

use cli::Cli;

fn main() -> ExitCode {
    // load .env first so RUST_LOG, CONFIG_PATH and COIN_MANAGER_FILE take effect
    dotenv().ok();
    let cli = Cli::parse();

    let config = match AppConfig::load_and_validate(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match config.logging.format {
        LogFormat::Compact => common::utils::logging::init_logging_default(),
        LogFormat::Json => common::utils::logging::init_logging_json(),
    }

    let data_file = cli.file.unwrap_or(config.storage.data_file);
    debug!(data_file = %data_file.display(), "config_resolved");

    match commands::run(cli.command, &data_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command_failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
