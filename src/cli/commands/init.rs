//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "qualtrics-tagger.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing qualtrics-tagger configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your Qualtrics instance URL", self.output);
                println!("  2. Create a .env file containing TAGGER_API_TOKEN=<your token>");
                println!("     (Account Settings -> Qualtrics IDs in the Qualtrics web UI)");
                println!("  3. Validate configuration: qualtrics-tagger validate-config");
                println!("  4. Create a survey: qualtrics-tagger create \"My Survey\" --images-dir ./images");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# qualtrics-tagger configuration

[application]
log_level = "info"

[qualtrics]
base_url = "https://yourorg.qualtrics.com"
api_token = "${TAGGER_API_TOKEN}"
timeout_seconds = 60

[survey]
# library_id = "UR_..."
templates_dir = "./templates"

[export]
format = "json"
poll_interval_ms = 1500

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# qualtrics-tagger configuration
#
# Values of the form ${VAR} are read from the environment (or .env).
# Any setting can also be overridden with TAGGER_<SECTION>_<KEY>,
# e.g. TAGGER_QUALTRICS_BASE_URL or TAGGER_EXPORT_FORMAT.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Qualtrics Connection
# ============================================================================
[qualtrics]
# Usually https://<organization>.qualtrics.com
# Must use https and must NOT end in a trailing slash.
base_url = "https://yourorg.qualtrics.com"

# API token from Account Settings -> Qualtrics IDs.
# Your organization must grant you API permissions.
api_token = "${TAGGER_API_TOKEN}"

# Request timeout in seconds
timeout_seconds = 60

# ============================================================================
# Survey Creation
# ============================================================================
[survey]
# Graphics library receiving uploaded images (from the Qualtrics IDs page)
library_id = "UR_xxxxxxxxxxxxxxx"

# Directory with survey_header.txt, question.txt and optional header.html
templates_dir = "./templates"

# Downscale images wider than this many pixels (omit to upload unchanged)
# max_image_width = 900

# ============================================================================
# Response Export
# ============================================================================
[export]
# json, csv, tsv, xml or spss
format = "json"

# Delay between export status checks
poll_interval_ms = 1500

# Give up waiting after this many seconds (omit to wait indefinitely)
# max_wait_seconds = 600

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging in addition to the console
local_enabled = false

# Log directory
local_path = "./logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
