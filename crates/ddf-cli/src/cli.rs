//! CLI argument definitions for `ddfcreate`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Parser)]
#[command(
    name = "ddfcreate",
    version,
    about = "Rebuild an ISO 8211 (DDF) container from an XML description",
    long_about = "Rebuild an ISO 8211 (DDF) binary container from an XML tree\n\
                  describing the module, its field definitions, and its records.\n\
                  The description uses DDFModule, DDFFieldDefn, DDFSubfieldDefn,\n\
                  DDFRecord, DDFField, and DDFSubfield elements."
)]
pub struct Cli {
    /// Path to the XML description of the container.
    #[arg(value_name = "DESCRIPTION")]
    pub description: PathBuf,

    /// Path of the DDF container to create.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
