//! External system integrations.
//!
//! - [`qualtrics`] - Qualtrics REST API (graphics library, survey import, response exports)
//! - [`imaging`] - Image transformation before upload
//! - [`desktop`] - Clipboard and browser conveniences
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the survey and
//! export logic can be tested against doubles:
//!
//! ```rust,no_run
//! use qualtrics_tagger::adapters::qualtrics::{QualtricsClient, SurveyPlatform};
//! use qualtrics_tagger::config::{secret_string, QualtricsConfig};
//! use qualtrics_tagger::domain::ExportId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = QualtricsConfig {
//!     base_url: "https://iastate.qualtrics.com".to_string(),
//!     api_token: secret_string("token".to_string()),
//!     timeout_seconds: 60,
//! };
//! let client = QualtricsClient::new(&config)?;
//! let status = client.poll_status(&ExportId::new("ES_123")?).await?;
//! println!("{status:?}");
//! # Ok(())
//! # }
//! ```

pub mod desktop;
pub mod imaging;
pub mod qualtrics;

pub use desktop::{BrowserLauncher, Clipboard, Desktop};
pub use imaging::{Downscale, ImageTransform, LinkOrCopy};
pub use qualtrics::{QualtricsClient, SurveyPlatform};
