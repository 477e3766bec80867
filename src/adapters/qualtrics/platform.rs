//! Survey platform trait definition
//!
//! This module defines the `SurveyPlatform` trait, the seam between the
//! survey/export logic and the Qualtrics REST API. The production
//! implementation is [`super::QualtricsClient`]; tests substitute scripted
//! doubles.

use crate::domain::{ExportFormat, ExportId, GraphicId, JobStatus, LibraryId, Result, SurveyId};
use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncWrite;

/// Operations the tagger needs from the survey platform
///
/// Every method issues at most one request; none retries. Transport and
/// authorization failures surface as [`crate::domain::QualtricsError`].
#[async_trait]
pub trait SurveyPlatform: Send + Sync {
    /// Upload an image file into a graphics library
    ///
    /// # Arguments
    ///
    /// * `path` - Image file to upload
    /// * `folder` - Library folder to place the graphic in, if any
    /// * `library_id` - Target graphics library
    async fn upload_graphic(
        &self,
        path: &Path,
        folder: Option<&str>,
        library_id: &LibraryId,
    ) -> Result<GraphicId>;

    /// Create a survey from a survey text file (Qualtrics "Advanced Format")
    async fn import_survey(&self, name: &str, survey_file: &Path) -> Result<SurveyId>;

    /// Start an asynchronous response export job
    async fn submit_export(&self, survey_id: &SurveyId, format: &ExportFormat)
        -> Result<ExportId>;

    /// Fetch the current state of an export job
    async fn poll_status(&self, export_id: &ExportId) -> Result<JobStatus>;

    /// Stream the resource at `location` into `sink`, returning the byte count
    ///
    /// The body is copied chunk by chunk and never buffered whole.
    async fn download(
        &self,
        location: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64>;

    /// URL at which an uploaded graphic can be viewed
    fn graphic_url(&self, graphic_id: &GraphicId) -> String;

    /// URL of the survey editor for a survey
    fn survey_editor_url(&self, survey_id: &SurveyId) -> String;
}
