//! Create command implementation
//!
//! Builds a survey from a directory of images. When the templates include
//! a `header.html`, the user is walked through pasting it into the
//! survey's look-and-feel header, which the API cannot set.

use super::{client_or_report, load_or_report};
use crate::adapters::desktop::Desktop;
use crate::cli::{exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::core::survey::{CreateSurveyRequest, SurveyBuilder};
use crate::domain::LibraryId;
use clap::Args;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Human-friendly survey name (may contain spaces)
    pub name: String,

    /// Directory searched recursively for .png and .jpg images
    #[arg(long)]
    pub images_dir: PathBuf,

    /// Graphics library to upload into (overrides survey.library_id)
    #[arg(long)]
    pub library_id: Option<String>,

    /// Directory holding survey templates (overrides survey.templates_dir)
    #[arg(long)]
    pub templates_dir: Option<PathBuf>,

    /// Downscale images wider than this (overrides survey.max_image_width)
    #[arg(long)]
    pub max_image_width: Option<u32>,

    /// Don't wait for confirmation after the header hand-off
    #[arg(short, long)]
    pub yes: bool,

    /// Print the survey editor URL instead of opening a browser
    #[arg(long)]
    pub no_browser: bool,
}

impl CreateArgs {
    /// Execute the create command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(name = %self.name, "Starting create command");

        let config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        let library_id = match self
            .library_id
            .clone()
            .or_else(|| config.survey.library_id.clone())
            .map(LibraryId::new)
        {
            Some(Ok(id)) => id,
            Some(Err(e)) => {
                eprintln!("❌ Invalid library id: {e}");
                return Ok(EXIT_CONFIG);
            }
            None => {
                eprintln!("❌ No graphics library configured");
                eprintln!("   Pass --library-id or set survey.library_id");
                return Ok(EXIT_CONFIG);
            }
        };

        let request = CreateSurveyRequest {
            name: self.name.clone(),
            images_dir: self.images_dir.clone(),
            library_id,
            templates_dir: self
                .templates_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.survey.templates_dir)),
            max_image_width: self.max_image_width.or(config.survey.max_image_width),
        };

        let client = match client_or_report(&config) {
            Ok(client) => client,
            Err(code) => return Ok(code),
        };

        println!("🚀 Creating survey '{}'...", request.name);
        let created = match SurveyBuilder::new(&client).create(&request).await {
            Ok(created) => created,
            Err(e) => {
                crate::log_error_with_context!(&e, "Survey creation failed");
                eprintln!("❌ Survey creation failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!();
        println!("✅ Survey created: {}", created.survey_id);
        println!("  Images: {}", created.image_count);
        println!(
            "  Prepared: {} new, {} reused",
            created.preprocess.processed, created.preprocess.skipped
        );
        println!("  Survey file: {}", created.survey_file.display());
        println!();

        if let Some(header_html) = &created.header_html {
            let desktop = Desktop::detect(!self.no_browser);
            hand_off_header(header_html, &created.editor_url, &desktop, !self.yes)?;
        }

        Ok(EXIT_OK)
    }
}

/// Which desktop steps of the header hand-off succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderHandOff {
    pub copied_to_clipboard: bool,
    pub opened_editor: bool,
}

/// Guide the user through pasting `header_html` into the survey header
///
/// Clipboard and browser failures fall back to printed instructions.
pub fn hand_off_header(
    header_html: &Path,
    editor_url: &str,
    desktop: &Desktop,
    wait_for_enter: bool,
) -> anyhow::Result<HeaderHandOff> {
    println!(
        "The survey has been created, but it has a header.html file that must be \
         copied into Qualtrics by hand."
    );

    let contents = std::fs::read_to_string(header_html)?;
    let copied_to_clipboard = match desktop.clipboard.copy_text(&contents) {
        Ok(()) => {
            println!("📋 The header.html file has been copied to your clipboard.");
            true
        }
        Err(e) => {
            tracing::debug!(error = %e, "Clipboard unavailable");
            println!(
                "Please open '{}' and copy the contents into your clipboard.",
                header_html.display()
            );
            false
        }
    };

    let opened_editor = match desktop.browser.open(editor_url) {
        Ok(()) => {
            println!("🌐 Opened the survey editor in your browser.");
            true
        }
        Err(e) => {
            tracing::debug!(error = %e, "Browser not opened");
            println!("Open the survey editor: {editor_url}");
            false
        }
    };

    println!(
        "Select the survey, click the 'Look and Feel' button, click the 'Advanced' tab, \
         paste into the 'Header' textbox and click 'Save'."
    );

    if wait_for_enter {
        print!("Press enter to continue.");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
    }

    Ok(HeaderHandOff {
        copied_to_clipboard,
        opened_editor,
    })
}
