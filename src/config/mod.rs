//! Configuration management for the tagger.
//!
//! TOML-based configuration with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TAGGER_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [qualtrics]
//! base_url = "https://iastate.qualtrics.com"
//! api_token = "${QUALTRICS_API_TOKEN}"
//!
//! [survey]
//! library_id = "UR_bPkvWXcu43ayAbX"
//! templates_dir = "./templates/freeform"
//! max_image_width = 900
//!
//! [export]
//! format = "json"
//! poll_interval_ms = 1500
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use qualtrics_tagger::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("qualtrics-tagger.toml")?;
//! println!("Qualtrics: {}", config.qualtrics.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ExportConfig, LoggingConfig, QualtricsConfig, SurveyConfig, TaggerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
