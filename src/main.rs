mod app;
mod cli;
mod error;
mod paths;

use std::env;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbosity())?;

    match app::run(cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{}: {err}", program_name());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 | 1 => LevelFilter::Warn,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .try_init()
        .context("failed to initialize logging")
}

fn program_name() -> String {
    env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
