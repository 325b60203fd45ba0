// src/main.rs

use anyhow::Context;
use clap::Parser;
use dropio::config::{CommandLineInput, SessionPlan};
use dropio::host::{native_capabilities, InFlight, TerminalHost};
use dropio::{acquire_input, deliver_output, AppError, ConfigError, InputConfig, OutputConfig};
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Sets up logging configuration.
///
/// Console output goes to stderr; stdout carries acquired text.
fn setup_logging(verbose: bool) -> Result<(), AppError> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("dropio.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )
        .map_err(|e| AppError::Logging(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| AppError::Logging(e.to_string()))?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Acquires text through the terminal host and prints it to stdout.
async fn run_input(config: InputConfig) -> Result<(), AppError> {
    let in_flight = InFlight::new();
    let ui = Arc::new(TerminalHost::spawn());
    let caps = native_capabilities(ui, ".", Arc::clone(&in_flight))?;

    let text = acquire_input(config, &caps).await;
    in_flight.settled().await;

    let mut stdout = std::io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

/// Delivers text from `source` (or stdin in silent mode).
async fn run_output(
    config: OutputConfig,
    source: Option<PathBuf>,
    download_dir: &Path,
) -> anyhow::Result<()> {
    let output = match &source {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading output from {}", path.display()))?,
        None if config.is_silent() => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("reading output from stdin")?;
            text
        }
        None => return Err(ConfigError::InteractiveStdin.into()),
    };

    let in_flight = InFlight::new();
    let ui = Arc::new(TerminalHost::spawn());
    let caps = native_capabilities(ui, download_dir, Arc::clone(&in_flight))?;

    deliver_output(output, config, &caps).await;
    in_flight.settled().await;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    match SessionPlan::resolve(cli)? {
        SessionPlan::Input(config) => run_input(config).await?,
        SessionPlan::Output {
            config,
            source,
            download_dir,
        } => run_output(config, source, &download_dir).await?,
    }

    Ok(())
}
