//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output filtered by level or `RUST_LOG`
//! - JSON-formatted log files with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use qualtrics_tagger::config::LoggingConfig;
//! use qualtrics_tagger::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the progress of a running export job
///
/// # Example
///
/// ```no_run
/// use qualtrics_tagger::domain::ExportId;
/// use qualtrics_tagger::log_export_progress;
///
/// let export_id = ExportId::new("ES_123").unwrap();
/// log_export_progress!(&export_id, 42.0);
/// ```
#[macro_export]
macro_rules! log_export_progress {
    ($export_id:expr, $percent:expr) => {
        tracing::info!(
            export_id = %$export_id,
            percent_complete = $percent,
            "Export in progress"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use qualtrics_tagger::domain::TaggerError;
/// use qualtrics_tagger::log_error_with_context;
///
/// let error = TaggerError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
