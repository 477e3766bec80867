//! Download command implementation
//!
//! Exports a survey's responses and saves the ZIP archive as produced by
//! Qualtrics.

use super::{client_or_report, load_or_report};
use crate::cli::{exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::core::export::ExportPoller;
use crate::domain::{ExportFormat, SurveyId};
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Survey to export (SV_...)
    #[arg(long)]
    pub survey_id: String,

    /// Where to write the ZIP archive
    #[arg(short, long, default_value = "data.zip")]
    pub output: PathBuf,

    /// Export format: json, csv, tsv, xml, spss (overrides export.format)
    #[arg(long)]
    pub format: Option<ExportFormat>,
}

impl DownloadArgs {
    /// Execute the download command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(survey_id = %self.survey_id, "Starting download command");

        let survey_id = match SurveyId::new(self.survey_id.clone()) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("❌ Invalid survey id: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };
        let client = match client_or_report(&config) {
            Ok(client) => client,
            Err(code) => return Ok(code),
        };

        let format = self
            .format
            .clone()
            .unwrap_or_else(|| config.export.format.clone());
        let poller =
            ExportPoller::from_config(&client, &config.export).with_cancellation(shutdown_signal);

        println!("⏳ Exporting responses for {survey_id} as {format}...");
        match poller
            .download_results(&survey_id, &format, &self.output)
            .await
        {
            Ok(bytes) => {
                println!("✅ Saved {} bytes to {}", bytes, self.output.display());
                Ok(EXIT_OK)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Download failed");
                eprintln!("❌ {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}
