//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the tagger using clap.

pub mod commands;

use crate::domain::{QualtricsError, TaggerError};
use clap::{Parser, Subcommand};

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration and input errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for failed or cancelled exports
pub const EXIT_EXPORT: i32 = 3;
/// Exit code for connection and authentication errors
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for everything else
pub const EXIT_FATAL: i32 = 5;

/// Qualtrics Tagger - image annotation surveys on Qualtrics
#[derive(Parser, Debug)]
#[command(name = "qualtrics-tagger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "qualtrics-tagger.toml", env = "TAGGER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TAGGER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a survey from a directory of images
    Create(commands::create::CreateArgs),

    /// Download a survey's responses as a ZIP archive
    Download(commands::download::DownloadArgs),

    /// Fetch a survey's responses as JSON
    Responses(commands::responses::ResponsesArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Map an error to the process exit code
pub fn exit_code_for(error: &TaggerError) -> i32 {
    match error {
        TaggerError::Configuration(_)
        | TaggerError::Validation(_)
        | TaggerError::Template(_)
        | TaggerError::Codec(_) => EXIT_CONFIG,
        TaggerError::ExportFailed { .. }
        | TaggerError::Cancelled(_)
        | TaggerError::Timeout { .. } => EXIT_EXPORT,
        TaggerError::Qualtrics(
            QualtricsError::ConnectionFailed(_) | QualtricsError::AuthenticationFailed { .. },
        ) => EXIT_CONNECTION,
        _ => EXIT_FATAL,
    }
}
