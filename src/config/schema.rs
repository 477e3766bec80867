//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use crate::domain::ExportFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main tagger configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggerConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Qualtrics connection settings
    pub qualtrics: QualtricsConfig,

    /// Survey creation settings
    #[serde(default)]
    pub survey: SurveyConfig,

    /// Response export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TaggerConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.qualtrics.validate()?;
        self.survey.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Qualtrics server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualtricsConfig {
    /// Base URL, usually `https://<organization>.qualtrics.com`
    ///
    /// Must use https and must not end with a trailing slash.
    pub base_url: String,

    /// API token from "Account Settings" -> "Qualtrics IDs"
    /// Stored securely in memory and automatically zeroized on drop
    pub api_token: SecretString,

    /// Timeout for API calls in seconds; downloads fail only after stalling this long
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl QualtricsConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("qualtrics.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("https://") {
            return Err(format!(
                "qualtrics.base_url must start with https://, got '{}'",
                self.base_url
            ));
        }

        if self.base_url.ends_with('/') {
            return Err("qualtrics.base_url must not end with a trailing slash".to_string());
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| format!("qualtrics.base_url is not a valid URL: {e}"))?;

        if self.api_token.expose_secret().is_empty() {
            return Err("qualtrics.api_token cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("qualtrics.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }

    /// Versioned REST endpoint, e.g. `https://org.qualtrics.com/API/v3/`
    pub fn api_endpoint(&self) -> String {
        format!("{}/API/v3/", self.base_url)
    }
}

/// Survey creation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Graphics library to upload images into
    #[serde(default)]
    pub library_id: Option<String>,

    /// Directory holding `survey_header.txt`, `question.txt` and optionally `header.html`
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Downscale images wider than this many pixels
    #[serde(default)]
    pub max_image_width: Option<u32>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            library_id: None,
            templates_dir: default_templates_dir(),
            max_image_width: None,
        }
    }
}

impl SurveyConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref library_id) = self.library_id {
            if library_id.trim().is_empty() {
                return Err("survey.library_id cannot be empty when set".to_string());
            }
        }

        if self.templates_dir.is_empty() {
            return Err("survey.templates_dir cannot be empty".to_string());
        }

        if self.max_image_width == Some(0) {
            return Err("survey.max_image_width must be > 0".to_string());
        }

        Ok(())
    }
}

/// Response export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default archive format for `download`
    #[serde(default)]
    pub format: ExportFormat,

    /// Delay between export status checks in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up waiting after this many seconds; unset waits indefinitely
    #[serde(default)]
    pub max_wait_seconds: Option<u64>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            poll_interval_ms: default_poll_interval_ms(),
            max_wait_seconds: None,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("export.poll_interval_ms must be > 0".to_string());
        }

        if self.max_wait_seconds == Some(0) {
            return Err("export.max_wait_seconds must be > 0 when set".to_string());
        }

        Ok(())
    }

    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Maximum wait as a duration, if bounded
    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_seconds.map(Duration::from_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_templates_dir() -> String {
    "./templates".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1500
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
