//! Response export job types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format requested for a response export
///
/// Known formats get their own variant; anything else is passed to the
/// service verbatim and it decides whether the format is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ExportFormat {
    /// JSON, the only format [`crate::core::export`] can parse
    #[default]
    Json,
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// XML
    Xml,
    /// SPSS
    Spss,
    /// Any other format name
    Other(String),
}

impl ExportFormat {
    /// Wire name of the format
    pub fn as_str(&self) -> &str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Xml => "xml",
            ExportFormat::Spss => "spss",
            ExportFormat::Other(name) => name,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ExportFormat {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "json" => ExportFormat::Json,
            "csv" => ExportFormat::Csv,
            "tsv" => ExportFormat::Tsv,
            "xml" => ExportFormat::Xml,
            "spss" => ExportFormat::Spss,
            _ => ExportFormat::Other(value),
        }
    }
}

impl From<ExportFormat> for String {
    fn from(format: ExportFormat) -> Self {
        format.as_str().to_string()
    }
}

impl FromStr for ExportFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ExportFormat::from(s.to_string()))
    }
}

/// Current state of a response export job
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Job still running
    InProgress {
        /// Percentage reported by the service
        percent_complete: f64,
    },

    /// Archive ready for download
    Complete {
        /// Location of the result archive
        file: String,
    },

    /// Terminal failure
    Failed {
        /// Human-readable reason from the service
        reason: String,
    },
}

impl JobStatus {
    /// Whether polling should stop
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::InProgress { .. })
    }
}
