//! media-tools
//!
//! Two console utilities in one binary: a video splitter that cuts a file
//! into N equal parts with ffmpeg stream copy, and a batch renamer that
//! renumbers the files of a directory.

mod cli;
mod config;
mod config_file;
mod error;
mod ffmpeg;
mod prompt;
mod rename;
mod report;
mod segment;
mod session;
mod splitter;

#[cfg(test)]
mod integration;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::config::{LogFormat, LoggingConfig};
use crate::error::{MediaToolsError, Result};
use crate::ffmpeg::FfmpegTools;
use crate::splitter::Splitter;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "media-tools";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (mut config, config_warning) = config_file::load_config(cli.config.as_deref());
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    init_logging(&config.logging);
    if let Some(warning) = config_warning {
        tracing::warn!("{}", warning);
    }

    tracing::debug!("{} v{} starting", APP_NAME, VERSION);
    tracing::debug!("Configuration loaded: {:?}", config);

    match run(&cli, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("\nERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &config::AppConfig) -> Result<bool> {
    match &cli.command {
        Command::Split(args) => {
            let splitter = Splitter::new(FfmpegTools::new(&config.tools));
            session::run_split(&splitter, args)
        }
        Command::Rename(args) => session::run_rename(args),
        Command::InitConfig { path } => {
            config_file::generate_default_config(path)
                .map_err(|e| MediaToolsError::Config(e.to_string()))?;
            println!("Wrote default configuration to {}", path.display());
            Ok(true)
        }
    }
}

/// Initialize logging with tracing.
///
/// Logs go to stderr so stdout carries only reports.
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter_directive().into());
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
