//! Scripted survey platform shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use qualtrics_tagger::adapters::qualtrics::SurveyPlatform;
use qualtrics_tagger::domain::{
    ExportFormat, ExportId, GraphicId, JobStatus, LibraryId, QualtricsError, Result, SurveyId,
};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub const BASE_URL: &str = "https://test.qualtrics.com";

/// Platform double that replays a fixed sequence of export statuses
#[derive(Default)]
pub struct ScriptedPlatform {
    statuses: Mutex<VecDeque<JobStatus>>,
    archive: Vec<u8>,
    pub submits: AtomicUsize,
    pub polls: AtomicUsize,
    pub downloads: AtomicUsize,
    pub uploads: Mutex<Vec<(PathBuf, Option<String>, String)>>,
    pub imports: Mutex<Vec<(String, String)>>,
}

impl ScriptedPlatform {
    pub fn new(statuses: Vec<JobStatus>, archive: Vec<u8>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            archive,
            ..Self::default()
        }
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
            + self.polls()
            + self.downloads()
            + self.uploads.lock().unwrap().len()
            + self.imports.lock().unwrap().len()
    }
}

pub fn in_progress(percent_complete: f64) -> JobStatus {
    JobStatus::InProgress { percent_complete }
}

pub fn complete() -> JobStatus {
    JobStatus::Complete {
        file: format!("{BASE_URL}/API/v3/responseexports/ES_test/file"),
    }
}

pub fn failed(reason: &str) -> JobStatus {
    JobStatus::Failed {
        reason: reason.to_string(),
    }
}

#[async_trait]
impl SurveyPlatform for ScriptedPlatform {
    async fn upload_graphic(
        &self,
        path: &Path,
        folder: Option<&str>,
        library_id: &LibraryId,
    ) -> Result<GraphicId> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((
            path.to_path_buf(),
            folder.map(str::to_string),
            library_id.to_string(),
        ));
        Ok(GraphicId::new(format!("IM_{}", uploads.len())).unwrap())
    }

    async fn import_survey(&self, name: &str, survey_file: &Path) -> Result<SurveyId> {
        let contents = std::fs::read_to_string(survey_file)?;
        self.imports
            .lock()
            .unwrap()
            .push((name.to_string(), contents));
        Ok(SurveyId::new("SV_test").unwrap())
    }

    async fn submit_export(&self, _survey_id: &SurveyId, _format: &ExportFormat) -> Result<ExportId> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        Ok(ExportId::new("ES_test").unwrap())
    }

    async fn poll_status(&self, _export_id: &ExportId) -> Result<JobStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().unwrap().pop_front();
        next.ok_or_else(|| QualtricsError::InvalidResponse("status script exhausted".into()).into())
    }

    async fn download(
        &self,
        _location: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        sink.write_all(&self.archive).await?;
        sink.flush().await?;
        Ok(self.archive.len() as u64)
    }

    fn graphic_url(&self, graphic_id: &GraphicId) -> String {
        format!("{BASE_URL}/WRQualtricsControlPanel/Graphic.php?IM={graphic_id}")
    }

    fn survey_editor_url(&self, survey_id: &SurveyId) -> String {
        format!("{BASE_URL}/ControlPanel/?ClientAction=EditSurvey&Section={survey_id}")
    }
}

/// ZIP archive with one member per `(name, body)` pair
pub fn zip_archive(members: &[(&str, &str)]) -> Vec<u8> {
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in members {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
