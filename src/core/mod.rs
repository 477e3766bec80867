//! Core workflows of the tagger.
//!
//! # Modules
//!
//! - [`survey`] - Scan images, prepare and upload them, render and import the survey
//! - [`export`] - Export responses and map annotations back to images
//!
//! # Survey Workflow
//!
//! 1. **Scan**: Find `.png`/`.jpg` files under the images directory
//! 2. **Prepare**: Link, copy or downscale into `<images_dir>_qualtrics`
//! 3. **Upload**: Send each image to the graphics library
//! 4. **Render**: Fill the templates into `survey.txt`
//! 5. **Import**: Create the survey from `survey.txt`
//!
//! # Example
//!
//! ```rust,no_run
//! use qualtrics_tagger::adapters::qualtrics::QualtricsClient;
//! use qualtrics_tagger::config::load_config;
//! use qualtrics_tagger::core::export::ExportPoller;
//! use qualtrics_tagger::domain::SurveyId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("qualtrics-tagger.toml")?;
//! let client = QualtricsClient::new(&config.qualtrics)?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let poller = ExportPoller::from_config(&client, &config.export).with_cancellation(shutdown_rx);
//!
//! let responses = poller.get_responses(&SurveyId::new("SV_abc123")?).await?;
//! println!("{} responses", responses.len());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod survey;
