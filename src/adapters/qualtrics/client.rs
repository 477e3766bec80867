//! Qualtrics REST API client
//!
//! Implements [`SurveyPlatform`] over the Qualtrics v3 API using `reqwest`.
//! Every request carries the `X-API-TOKEN` header; the token never appears
//! in logs.

use super::models::{ApiEnvelope, ExportProgress, ExportRequest, IdResult};
use super::platform::SurveyPlatform;
use crate::config::{QualtricsConfig, SecretString};
use crate::domain::{
    ExportFormat, ExportId, GraphicId, JobStatus, LibraryId, QualtricsError, Result, SurveyId,
    TaggerError,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Header carrying the API token
pub const TOKEN_HEADER: &str = "X-API-TOKEN";

/// Content type Qualtrics expects for survey text imports
pub const SURVEY_TXT_MIME: &str = "application/vnd.qualtrics.survey.txt";

/// Qualtrics API client
///
/// Holds the connection settings explicitly; construct one per
/// configuration and pass it by reference.
///
/// # Example
///
/// ```no_run
/// use qualtrics_tagger::adapters::qualtrics::{QualtricsClient, SurveyPlatform};
/// use qualtrics_tagger::config::{secret_string, QualtricsConfig};
/// use qualtrics_tagger::domain::{ExportFormat, SurveyId};
///
/// # async fn example() -> qualtrics_tagger::domain::Result<()> {
/// let config = QualtricsConfig {
///     base_url: "https://iastate.qualtrics.com".to_string(),
///     api_token: secret_string("token".to_string()),
///     timeout_seconds: 60,
/// };
/// let client = QualtricsClient::new(&config)?;
/// let survey_id = SurveyId::new("SV_0ApBnQ7VP2cHWvz").unwrap();
/// let export_id = client.submit_export(&survey_id, &ExportFormat::Json).await?;
/// # Ok(())
/// # }
/// ```
pub struct QualtricsClient {
    /// Base URL, e.g. `https://iastate.qualtrics.com`
    base_url: String,

    /// `{base_url}/API/v3/`
    api_endpoint: String,

    /// API token
    api_token: SecretString,

    /// Deadline for API calls, and the longest a download may stall
    request_timeout: Duration,

    /// HTTP client for making requests
    client: Client,
}

impl QualtricsClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &QualtricsConfig) -> Result<Self> {
        // No client-wide timeout: in reqwest it bounds the whole body, which
        // would cut off large archive downloads. API calls set their own.
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TaggerError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_endpoint: config.api_endpoint(),
            api_token: config.api_token.clone(),
            request_timeout: Duration::from_secs(config.timeout_seconds),
            client,
        })
    }

    /// Base URL of the Qualtrics instance
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_endpoint, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token: &str = self.api_token.expose_secret().as_ref();
        request.header(TOKEN_HEADER, token)
    }

    /// Send a request, mapping transport failures and error statuses
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| QualtricsError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %body, "Qualtrics request failed");
        Err(QualtricsError::from_status(status.as_u16(), body).into())
    }

    /// Send a request and decode the `result` field of the envelope
    async fn send_for_result<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request.timeout(self.request_timeout)).await?;
        let body = response
            .text()
            .await
            .map_err(|e| QualtricsError::ConnectionFailed(e.to_string()))?;
        tracing::debug!(body = %body, "Qualtrics response");

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| QualtricsError::InvalidResponse(format!("{e}: {body}")))?;
        if let Some(request_id) = envelope.meta.as_ref().and_then(|m| m.request_id.as_deref()) {
            tracing::trace!(request_id = %request_id, "Qualtrics request id");
        }
        Ok(envelope.result)
    }

    async fn file_part(path: &Path, mime: &str) -> Result<Part> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            TaggerError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| TaggerError::Validation(format!("Invalid content type '{mime}': {e}")))
    }
}

/// Content type for an image upload, from its extension
pub fn guess_image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl SurveyPlatform for QualtricsClient {
    async fn upload_graphic(
        &self,
        path: &Path,
        folder: Option<&str>,
        library_id: &LibraryId,
    ) -> Result<GraphicId> {
        let url = self.endpoint(&format!("libraries/{library_id}/graphics"));

        let mut form = Form::new().part("file", Self::file_part(path, guess_image_mime(path)).await?);
        if let Some(folder) = folder.filter(|f| !f.is_empty()) {
            form = form.text("folder", folder.to_string());
        }

        tracing::debug!(path = %path.display(), library_id = %library_id, "Uploading graphic");
        let result: IdResult = self
            .send_for_result(self.client.post(&url).multipart(form))
            .await?;

        GraphicId::new(result.id).map_err(|e| QualtricsError::InvalidResponse(e).into())
    }

    async fn import_survey(&self, name: &str, survey_file: &Path) -> Result<SurveyId> {
        let url = self.endpoint("surveys");

        let form = Form::new()
            .text("name", name.to_string())
            .part("file", Self::file_part(survey_file, SURVEY_TXT_MIME).await?);

        tracing::debug!(name = %name, file = %survey_file.display(), "Importing survey");
        let result: IdResult = self
            .send_for_result(self.client.post(&url).multipart(form))
            .await?;

        SurveyId::new(result.id).map_err(|e| QualtricsError::InvalidResponse(e).into())
    }

    async fn submit_export(
        &self,
        survey_id: &SurveyId,
        format: &ExportFormat,
    ) -> Result<ExportId> {
        let url = self.endpoint("responseexports");
        let body = ExportRequest {
            survey_id: survey_id.as_str(),
            format: format.as_str(),
        };

        let result: IdResult = self
            .send_for_result(self.client.post(&url).json(&body))
            .await?;

        ExportId::new(result.id).map_err(|e| QualtricsError::InvalidResponse(e).into())
    }

    async fn poll_status(&self, export_id: &ExportId) -> Result<JobStatus> {
        let url = self.endpoint(&format!("responseexports/{export_id}"));

        let progress: ExportProgress = self.send_for_result(self.client.get(&url)).await?;
        Ok(progress.into_status()?)
    }

    async fn download(
        &self,
        location: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64> {
        let request = self.send(self.client.get(location));
        let mut response = tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| {
                QualtricsError::ConnectionFailed(format!(
                    "no response from {location} within {}s",
                    self.request_timeout.as_secs()
                ))
            })??;

        // The transfer as a whole is unbounded; only a stalled stream fails.
        let mut written: u64 = 0;
        loop {
            let next = tokio::time::timeout(self.request_timeout, response.chunk())
                .await
                .map_err(|_| {
                    QualtricsError::DownloadFailed(format!(
                        "no data received for {}s after {} bytes",
                        self.request_timeout.as_secs(),
                        written
                    ))
                })?
                .map_err(|e| QualtricsError::DownloadFailed(e.to_string()))?;
            let Some(chunk) = next else {
                break;
            };
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;

        tracing::debug!(bytes = written, "Download finished");
        Ok(written)
    }

    fn graphic_url(&self, graphic_id: &GraphicId) -> String {
        format!(
            "{}/WRQualtricsControlPanel/Graphic.php?IM={}",
            self.base_url, graphic_id
        )
    }

    fn survey_editor_url(&self, survey_id: &SurveyId) -> String {
        format!(
            "{}/ControlPanel/?ClientAction=EditSurvey&Section={}",
            self.base_url, survey_id
        )
    }
}
