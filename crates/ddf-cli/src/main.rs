//! DDF container rebuild CLI.

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use ddf_cli::logging::{LogConfig, LogFormat, init_logging};
use ddf_compose::{RunSummary, build_container};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let code = match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = error.print();
            std::process::exit(code);
        }
    };
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    match run(&cli) {
        Ok(summary) => print_summary(&cli, &summary),
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    build_container(&cli.description, &cli.output).with_context(|| {
        format!(
            "rebuilding '{}' from '{}'",
            cli.output.display(),
            cli.description.display()
        )
    })
}

fn print_summary(cli: &Cli, summary: &RunSummary) {
    if summary.output_created {
        println!(
            "{}: {} field definition(s), {} record(s), {} bytes",
            cli.output.display(),
            summary.definitions,
            summary.records,
            summary.bytes_written
        );
    } else {
        println!(
            "no records in '{}', nothing written",
            cli.description.display()
        );
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = cli.log_file.is_none() && io::stderr().is_terminal();
    config
}
