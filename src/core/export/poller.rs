//! Response export job lifecycle
//!
//! Exports are asynchronous on the Qualtrics side: a job is submitted, polled
//! until it reaches a terminal state, and then its archive is downloaded.
//! [`ExportPoller`] drives that loop on top of any [`SurveyPlatform`].

use crate::adapters::qualtrics::SurveyPlatform;
use crate::config::ExportConfig;
use crate::core::export::responses::parse_response_archive;
use crate::domain::{ExportFormat, ExportId, JobStatus, Result, SurveyId, TaggerError};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::sync::watch;
use tokio::time::Instant;

/// Default delay between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Drives export jobs to completion
///
/// Polling is unbounded unless [`ExportPoller::with_max_wait`] is set, and
/// can be interrupted through [`ExportPoller::with_cancellation`].
///
/// # Example
///
/// ```rust,no_run
/// use qualtrics_tagger::adapters::qualtrics::QualtricsClient;
/// use qualtrics_tagger::config::load_config;
/// use qualtrics_tagger::core::export::ExportPoller;
/// use qualtrics_tagger::domain::{ExportFormat, SurveyId};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("qualtrics-tagger.toml")?;
/// let client = QualtricsClient::new(&config.qualtrics)?;
/// let poller = ExportPoller::from_config(&client, &config.export);
///
/// let survey_id = SurveyId::new("SV_abc123")?;
/// let bytes = poller
///     .download_results(&survey_id, &ExportFormat::Json, Path::new("data.zip"))
///     .await?;
/// println!("downloaded {bytes} bytes");
/// # Ok(())
/// # }
/// ```
pub struct ExportPoller<'a> {
    platform: &'a dyn SurveyPlatform,
    poll_interval: Duration,
    max_wait: Option<Duration>,
    cancel: Option<watch::Receiver<bool>>,
}

impl<'a> ExportPoller<'a> {
    /// Poller with the default interval, no deadline and no cancellation
    pub fn new(platform: &'a dyn SurveyPlatform) -> Self {
        Self {
            platform,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
            cancel: None,
        }
    }

    /// Poller using the `[export]` settings
    pub fn from_config(platform: &'a dyn SurveyPlatform, config: &ExportConfig) -> Self {
        Self::new(platform)
            .with_poll_interval(config.poll_interval())
            .with_max_wait(config.max_wait())
    }

    /// Set the delay between polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Give up after `max_wait` has elapsed; `None` waits forever
    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Stop waiting once the channel carries `true`
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Start an export job for a survey
    pub async fn submit_export(
        &self,
        survey_id: &SurveyId,
        format: &ExportFormat,
    ) -> Result<ExportId> {
        let export_id = self.platform.submit_export(survey_id, format).await?;
        tracing::info!(
            survey_id = %survey_id,
            export_id = %export_id,
            format = %format,
            "Export submitted"
        );
        Ok(export_id)
    }

    /// Fetch the state of an export job once
    pub async fn poll_status(&self, export_id: &ExportId) -> Result<JobStatus> {
        self.platform.poll_status(export_id).await
    }

    /// Wait for an export job to finish and stream its archive into `sink`
    ///
    /// Returns the number of bytes written. A failed job returns
    /// [`TaggerError::ExportFailed`] without downloading anything.
    pub async fn await_and_download<W>(&self, export_id: &ExportId, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let started = Instant::now();
        let mut cancel = self.cancel.clone();

        loop {
            if is_cancelled(&cancel) {
                return Err(cancelled(export_id));
            }

            match self.platform.poll_status(export_id).await? {
                JobStatus::InProgress { percent_complete } => {
                    crate::log_export_progress!(export_id, percent_complete);
                }
                JobStatus::Complete { file } => {
                    tracing::debug!(export_id = %export_id, "Export complete, downloading");
                    let bytes = self.platform.download(&file, sink).await?;
                    tracing::info!(export_id = %export_id, bytes, "Export downloaded");
                    return Ok(bytes);
                }
                JobStatus::Failed { reason } => {
                    tracing::error!(export_id = %export_id, reason = %reason, "Export failed");
                    return Err(TaggerError::ExportFailed {
                        export_id: export_id.to_string(),
                        reason,
                    });
                }
            }

            if let Some(max_wait) = self.max_wait {
                let waited = started.elapsed();
                if waited >= max_wait {
                    return Err(TaggerError::Timeout {
                        export_id: export_id.to_string(),
                        waited_ms: waited.as_millis(),
                    });
                }
            }

            if self.pause(&mut cancel).await {
                return Err(cancelled(export_id));
            }
        }
    }

    /// Export a survey's responses into the file at `destination`
    ///
    /// The archive is written to a sibling `.part` file and renamed into
    /// place once complete, so an existing `destination` survives a failed
    /// or cancelled export.
    pub async fn download_results(
        &self,
        survey_id: &SurveyId,
        format: &ExportFormat,
        destination: &Path,
    ) -> Result<u64> {
        let export_id = self.submit_export(survey_id, format).await?;
        let partial = partial_path(destination);

        let mut file = tokio::fs::File::create(&partial).await.map_err(|e| {
            TaggerError::Io(format!("Failed to create {}: {}", partial.display(), e))
        })?;

        let outcome = match self.await_and_download(&export_id, &mut file).await {
            Ok(bytes) => {
                drop(file);
                tokio::fs::rename(&partial, destination)
                    .await
                    .map(|()| bytes)
                    .map_err(|e| {
                        TaggerError::Io(format!(
                            "Failed to move export into {}: {}",
                            destination.display(),
                            e
                        ))
                    })
            }
            Err(e) => {
                drop(file);
                Err(e)
            }
        };

        if outcome.is_err() {
            if let Err(remove_err) = tokio::fs::remove_file(&partial).await {
                tracing::warn!(
                    path = %partial.display(),
                    error = %remove_err,
                    "Failed to remove incomplete export file"
                );
            }
        }
        outcome
    }

    /// Export a survey as JSON and return every response record
    ///
    /// The archive is held in memory; records keep the order of the archive
    /// members and of the records within each member.
    pub async fn get_responses(&self, survey_id: &SurveyId) -> Result<Vec<Value>> {
        let export_id = self.submit_export(survey_id, &ExportFormat::Json).await?;
        let mut archive = Vec::new();
        self.await_and_download(&export_id, &mut archive).await?;
        let responses = parse_response_archive(&archive)?;
        tracing::info!(
            survey_id = %survey_id,
            count = responses.len(),
            "Responses retrieved"
        );
        Ok(responses)
    }

    /// Sleep one poll interval; returns true if cancelled meanwhile
    async fn pause(&self, cancel: &mut Option<watch::Receiver<bool>>) -> bool {
        let sleep = tokio::time::sleep(self.poll_interval);
        tokio::pin!(sleep);

        let Some(rx) = cancel.as_mut() else {
            sleep.await;
            return false;
        };

        loop {
            let changed = tokio::select! {
                _ = &mut sleep => return false,
                changed = rx.changed() => changed,
            };
            match changed {
                Ok(()) if *rx.borrow() => return true,
                Ok(()) => continue,
                // Sender gone: nobody can cancel any more.
                Err(_) => {
                    (&mut sleep).await;
                    return false;
                }
            }
        }
    }
}

fn is_cancelled(cancel: &Option<watch::Receiver<bool>>) -> bool {
    cancel.as_ref().is_some_and(|rx| *rx.borrow())
}

fn cancelled(export_id: &ExportId) -> TaggerError {
    tracing::warn!(export_id = %export_id, "Export wait cancelled");
    TaggerError::Cancelled(format!("stopped waiting for export {export_id}"))
}

/// `data.zip` -> `data.zip.part`, in the same directory
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval_is_one_and_a_half_seconds() {
        assert_eq!(DEFAULT_POLL_INTERVAL, Duration::from_millis(1500));
    }

    #[test]
    fn test_is_cancelled() {
        assert!(!is_cancelled(&None));

        let (tx, rx) = watch::channel(false);
        let rx = Some(rx);
        assert!(!is_cancelled(&rx));
        tx.send(true).unwrap();
        assert!(is_cancelled(&rx));
    }

    #[test]
    fn test_cancelled_error_names_export() {
        let err = cancelled(&ExportId::new("ES_9").unwrap());
        assert!(matches!(err, TaggerError::Cancelled(ref msg) if msg.contains("ES_9")));
    }

    #[test]
    fn test_partial_path_is_a_sibling() {
        assert_eq!(
            partial_path(Path::new("out/data.zip")),
            PathBuf::from("out/data.zip.part")
        );
    }
}
