//! Responses command implementation
//!
//! Exports a survey as JSON and prints the response records, or only the
//! annotation answers mapped back to image paths.

use super::{client_or_report, load_or_report};
use crate::cli::{exit_code_for, EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::core::export::{extract_annotations, ExportPoller};
use crate::domain::{Result, SurveyId, TaggerError};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the responses command
#[derive(Args, Debug)]
pub struct ResponsesArgs {
    /// Survey to export (SV_...)
    #[arg(long)]
    pub survey_id: String,

    /// Write JSON here instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit one row per answered image instead of whole responses
    #[arg(long)]
    pub annotations: bool,
}

/// An annotation answer with the response it came from
#[derive(Debug, Serialize, PartialEq)]
pub struct AnnotationRow {
    /// Position of the response in the export
    pub response: usize,
    /// Image path relative to the images directory
    pub image: String,
    /// Embedded data field name
    pub field: String,
    /// The answer
    pub value: Value,
}

/// Flatten the annotations of every response into rows
pub fn annotation_rows(responses: &[Value]) -> Result<Vec<AnnotationRow>> {
    let mut rows = Vec::new();
    for (index, record) in responses.iter().enumerate() {
        let annotations = extract_annotations(record).map_err(|e| {
            TaggerError::Serialization(format!("response {index}: {e}"))
        })?;
        for annotation in annotations {
            rows.push(AnnotationRow {
                response: index,
                image: annotation.image.to_string_lossy().into_owned(),
                field: annotation.field.to_string(),
                value: annotation.value,
            });
        }
    }
    Ok(rows)
}

impl ResponsesArgs {
    /// Execute the responses command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(survey_id = %self.survey_id, "Starting responses command");

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

        let poller =
            ExportPoller::from_config(&client, &config.export).with_cancellation(shutdown_signal);

        let responses = match poller.get_responses(&survey_id).await {
            Ok(responses) => responses,
            Err(e) => {
                crate::log_error_with_context!(&e, "Fetching responses failed");
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let rendered = if self.annotations {
            match annotation_rows(&responses) {
                Ok(rows) => serde_json::to_string_pretty(&rows)?,
                Err(e) => {
                    eprintln!("❌ {e}");
                    return Ok(exit_code_for(&e));
                }
            }
        } else {
            serde_json::to_string_pretty(&responses)?
        };

        match &self.output {
            Some(path) => {
                if let Err(e) = std::fs::write(path, rendered) {
                    eprintln!("❌ Failed to write {}: {}", path.display(), e);
                    return Ok(EXIT_FATAL);
                }
                eprintln!(
                    "✅ Wrote {} responses to {}",
                    responses.len(),
                    path.display()
                );
            }
            None => println!("{rendered}"),
        }

        Ok(EXIT_OK)
    }
}
