//! Qualtrics adapter implementation
//!
//! This module provides the integration with the Qualtrics v3 REST API:
//! the [`SurveyPlatform`] trait, its HTTP implementation, and API models.

pub mod client;
pub mod models;
pub mod platform;

pub use client::QualtricsClient;
pub use models::{ApiEnvelope, ExportProgress, ExportRequest, IdResult};
pub use platform::SurveyPlatform;
