//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::TaggerConfig;
use super::secret::secret_string;
use crate::domain::errors::TaggerError;
use crate::domain::result::Result;
use crate::domain::ExportFormat;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TaggerConfig
/// 4. Applies environment variable overrides (TAGGER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or parsed, if a
/// referenced environment variable is unset, or if validation fails.
///
/// # Examples
///
/// ```no_run
/// use qualtrics_tagger::config::loader::load_config;
///
/// let config = load_config("qualtrics-tagger.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TaggerConfig> {
    let config = parse_config(path)?;

    config.validate().map_err(|e| {
        TaggerError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads configuration without validating it
///
/// Used by `validate-config` so it can report validation errors separately
/// from parse errors.
pub fn parse_config(path: impl AsRef<Path>) -> Result<TaggerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TaggerError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TaggerError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: TaggerConfig = toml::from_str(&contents)
        .map_err(|e| TaggerError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| TaggerError::Other(format!("invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TaggerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the TAGGER_* prefix
///
/// Environment variables follow the pattern: TAGGER_<SECTION>_<KEY>
/// For example: TAGGER_QUALTRICS_API_TOKEN, TAGGER_EXPORT_POLL_INTERVAL_MS
fn apply_env_overrides(config: &mut TaggerConfig) {
    if let Ok(val) = std::env::var("TAGGER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Qualtrics overrides
    if let Ok(val) = std::env::var("TAGGER_QUALTRICS_BASE_URL") {
        config.qualtrics.base_url = val;
    }
    if let Ok(val) = std::env::var("TAGGER_QUALTRICS_API_TOKEN") {
        config.qualtrics.api_token = secret_string(val);
    }
    if let Ok(val) = std::env::var("TAGGER_QUALTRICS_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.qualtrics.timeout_seconds = timeout;
        }
    }

    // Survey overrides
    if let Ok(val) = std::env::var("TAGGER_SURVEY_LIBRARY_ID") {
        config.survey.library_id = Some(val);
    }
    if let Ok(val) = std::env::var("TAGGER_SURVEY_TEMPLATES_DIR") {
        config.survey.templates_dir = val;
    }
    if let Ok(val) = std::env::var("TAGGER_SURVEY_MAX_IMAGE_WIDTH") {
        if let Ok(width) = val.parse() {
            config.survey.max_image_width = Some(width);
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("TAGGER_EXPORT_FORMAT") {
        config.export.format = ExportFormat::from(val);
    }
    if let Ok(val) = std::env::var("TAGGER_EXPORT_POLL_INTERVAL_MS") {
        if let Ok(interval) = val.parse() {
            config.export.poll_interval_ms = interval;
        }
    }
    if let Ok(val) = std::env::var("TAGGER_EXPORT_MAX_WAIT_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.export.max_wait_seconds = Some(seconds);
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("TAGGER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("TAGGER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
