//! Qualtrics v3 API request and response models

use crate::domain::{JobStatus, QualtricsError};
use serde::{Deserialize, Serialize};

/// Wire value of an export that is still running
pub const STATUS_IN_PROGRESS: &str = "in progress";

/// Wire value of a finished export
pub const STATUS_COMPLETE: &str = "complete";

/// Standard response envelope: `{"result": ..., "meta": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Endpoint-specific payload
    pub result: T,

    /// Request metadata
    #[serde(default)]
    pub meta: Option<ApiMeta>,
}

/// Metadata attached to every API response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeta {
    /// e.g. "200 - OK"
    #[serde(default)]
    pub http_status: Option<String>,

    /// Server-side request identifier, useful in support tickets
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Result payload of create-style endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct IdResult {
    /// Identifier of the created resource
    pub id: String,
}

/// Body of `POST /responseexports`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest<'a> {
    /// Survey to export
    pub survey_id: &'a str,
    /// Requested archive format
    pub format: &'a str,
}

/// Result payload of `GET /responseexports/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportProgress {
    /// "in progress", "complete", or a failure state
    pub status: String,

    /// Present while in progress
    #[serde(default)]
    pub percent_complete: Option<f64>,

    /// Download location once complete
    #[serde(default)]
    pub file: Option<String>,

    /// Failure details
    #[serde(default)]
    pub info: Option<ExportInfo>,
}

/// Failure details of an export job
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportInfo {
    /// Human-readable reason
    #[serde(default)]
    pub reason: Option<String>,
}

impl ExportProgress {
    /// Map the wire status onto [`JobStatus`]
    ///
    /// Any status other than in-progress or complete is a failure.
    pub fn into_status(self) -> Result<JobStatus, QualtricsError> {
        let status = self.status.trim();

        if status.eq_ignore_ascii_case(STATUS_IN_PROGRESS) {
            return Ok(JobStatus::InProgress {
                percent_complete: self.percent_complete.unwrap_or(0.0),
            });
        }

        if status.eq_ignore_ascii_case(STATUS_COMPLETE) {
            let file = self.file.filter(|f| !f.is_empty()).ok_or_else(|| {
                QualtricsError::InvalidResponse(
                    "export reported complete without a file location".to_string(),
                )
            })?;
            return Ok(JobStatus::Complete { file });
        }

        let reason = self
            .info
            .and_then(|info| info.reason)
            .unwrap_or_else(|| format!("export status '{status}'"));
        Ok(JobStatus::Failed { reason })
    }
}
