//! `journey` command-line front end.
//!
//! # Responsibility
//! - Resolve configuration from defaults, environment and flags.
//! - Run one store command per invocation and map failures to exit codes.

mod args;
mod commands;

use args::{parse_args, Cli, Command, USAGE};
use journey_core::{init_logging, LogConfig, StoreConfig};
use log::{error, info};
use std::io;
use std::process::ExitCode;
use std::time::Instant;

const EXIT_STORE_ERROR: u8 = 1;
const EXIT_USAGE_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    if !matches!(cli.command, Command::Help | Command::Version) {
        start_logging(&cli);
    }

    let config = store_config(&cli);
    let command = command_name(&cli.command);
    let started_at = Instant::now();
    let stdout = io::stdout();
    let stderr = io::stderr();

    match commands::run(&cli.command, &config, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(()) => {
            info!(
                "event=cli_command module=cli status=ok command={} duration_ms={}",
                command,
                started_at.elapsed().as_millis()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(
                "event=cli_command module=cli status=error command={} duration_ms={}",
                command,
                started_at.elapsed().as_millis()
            );
            eprintln!("error: {err}");
            ExitCode::from(EXIT_STORE_ERROR)
        }
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn store_config(cli: &Cli) -> StoreConfig {
    let mut config = StoreConfig::from_env(env_lookup);
    if let Some(path) = &cli.data {
        config = config.with_document_path(path.clone());
    }
    if let Some(dir) = &cli.assets {
        config = config.with_image_dir(dir.clone());
    }
    config
}

// Logging failures never block the command itself.
fn start_logging(cli: &Cli) {
    let base_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("warning: logging disabled: cannot resolve working directory: {err}");
            return;
        }
    };

    let mut config = LogConfig::from_env(&base_dir, env_lookup);
    if let Some(level) = &cli.log_level {
        config.level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = base_dir.join(dir);
    }

    if let Err(err) = init_logging(&config) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Show => "show",
        Command::Images => "images",
        Command::AddSection { .. } => "add_section",
        Command::AddRow { .. } => "add_row",
        Command::UpdateRow { .. } => "update_row",
        Command::DeleteRow { .. } => "delete_row",
        Command::DeleteSection { .. } => "delete_section",
        Command::Version => "version",
        Command::Help => "help",
    }
}
