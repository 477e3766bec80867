//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the tagger configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::parse_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match parse_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Qualtrics: {}", config.qualtrics.base_url);
                println!("  API Endpoint: {}", config.qualtrics.api_endpoint());
                println!("  Request Timeout: {}s", config.qualtrics.timeout_seconds);
                println!(
                    "  Library: {}",
                    config.survey.library_id.as_deref().unwrap_or("(not set)")
                );
                println!("  Templates: {}", config.survey.templates_dir);
                match config.survey.max_image_width {
                    Some(width) => println!("  Max Image Width: {width}px"),
                    None => println!("  Max Image Width: unlimited"),
                }
                println!("  Export Format: {}", config.export.format);
                println!("  Poll Interval: {}ms", config.export.poll_interval_ms);
                match config.export.max_wait_seconds {
                    Some(secs) => println!("  Max Wait: {secs}s"),
                    None => println!("  Max Wait: unbounded"),
                }
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/qualtrics-tagger.toml")
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_validate_rejects_http_base_url() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[qualtrics]\nbase_url = \"http://insecure.qualtrics.com\"\napi_token = \"t\""
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_validate_accepts_minimal_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[qualtrics]\nbase_url = \"https://iastate.qualtrics.com\"\napi_token = \"t\""
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_OK);
    }
}
