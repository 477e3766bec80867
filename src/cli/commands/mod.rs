//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod create;
pub mod download;
pub mod init;
pub mod responses;
pub mod validate;

use crate::adapters::qualtrics::QualtricsClient;
use crate::config::{load_config, TaggerConfig};
use crate::cli::{exit_code_for, EXIT_CONFIG};

/// Load and validate the configuration, or report and return an exit code
pub(crate) fn load_or_report(config_path: &str) -> Result<TaggerConfig, i32> {
    load_config(config_path).map_err(|e| {
        crate::log_error_with_context!(&e, "Failed to load configuration");
        eprintln!("❌ {e}");
        EXIT_CONFIG
    })
}

/// Build the API client, or report and return an exit code
pub(crate) fn client_or_report(config: &TaggerConfig) -> Result<QualtricsClient, i32> {
    QualtricsClient::new(&config.qualtrics).map_err(|e| {
        crate::log_error_with_context!(&e, "Failed to create Qualtrics client");
        eprintln!("❌ {e}");
        exit_code_for(&e)
    })
}
