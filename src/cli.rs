//! CLI argument parsing for Vitalscope

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for emitted events
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per event (default)
    Json,
    /// Human-readable `EVENT key=value` lines
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "vitalscope")]
#[command(version)]
#[command(about = "Replay a Web Vitals page capture into annotated analytics events", long_about = None)]
pub struct Cli {
    /// Page capture (JSON) with metric reports, long tasks and environment
    #[arg(short = 'i', long = "capture", value_name = "FILE")]
    pub capture: Option<PathBuf>,

    /// Reporter configuration (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (json or text)
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Only trust current script field names (sourceLocation, invokerType)
    #[arg(long = "canonical-fields")]
    pub canonical_fields: bool,

    /// Treat the platform as lacking long-animation-frame support
    #[arg(long = "no-long-tasks")]
    pub no_long_tasks: bool,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
