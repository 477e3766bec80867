// Qualtrics Tagger - Image Annotation Surveys on Qualtrics
// Copyright (c) 2025 Qualtrics Tagger Contributors
// Licensed under the MIT License

//! # Qualtrics Tagger
//!
//! Builds image-annotation surveys on Qualtrics from a directory of images
//! and retrieves the responses.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Scanning** a directory tree for `.png`/`.jpg` images
//! - **Preparing** images (link, copy or downscale) in a work directory
//! - **Uploading** images to a Qualtrics graphics library
//! - **Rendering** a survey text file from templates and importing it
//! - **Exporting** responses asynchronously and parsing the JSON archive
//!
//! Each image is tagged with an embedded data field whose name encodes
//! the image path (see [`domain::embedded`]), so answers in exported
//! responses can be mapped back to the image they belong to.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Survey creation and response export workflows
//! - [`adapters`] - External integrations (Qualtrics API, imaging, desktop)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qualtrics_tagger::adapters::qualtrics::QualtricsClient;
//! use qualtrics_tagger::config::load_config;
//! use qualtrics_tagger::core::survey::{CreateSurveyRequest, SurveyBuilder};
//! use qualtrics_tagger::domain::LibraryId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("qualtrics-tagger.toml")?;
//!     let client = QualtricsClient::new(&config.qualtrics)?;
//!
//!     let request = CreateSurveyRequest {
//!         name: "Single line demo".to_string(),
//!         images_dir: "./test_images".into(),
//!         library_id: LibraryId::new("UR_bPkvWXcu43ayAbX")?,
//!         templates_dir: "./templates/single_line".into(),
//!         max_image_width: Some(900),
//!     };
//!     let created = SurveyBuilder::new(&client).create(&request).await?;
//!
//!     println!("Created {}", created.survey_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! The library uses [`domain::TaggerError`] for all errors:
//!
//! ```rust,no_run
//! use qualtrics_tagger::domain::TaggerError;
//!
//! fn example() -> Result<(), TaggerError> {
//!     let config = qualtrics_tagger::config::load_config("qualtrics-tagger.toml")?;
//!     println!("{}", config.qualtrics.base_url);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
