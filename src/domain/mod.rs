//! Domain models and types for the tagger.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SurveyId`], [`ExportId`], [`GraphicId`], [`LibraryId`])
//! - **The embedded data codec** ([`embedded`]) linking survey fields to image paths
//! - **Export job types** ([`JobStatus`], [`ExportFormat`])
//! - **Error types** ([`TaggerError`], [`QualtricsError`], [`CodecError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TaggerError>`]:
//!
//! ```rust
//! use qualtrics_tagger::domain::{Result, SurveyId, TaggerError};
//!
//! fn example() -> Result<SurveyId> {
//!     SurveyId::new("SV_123").map_err(TaggerError::Validation)
//! }
//! ```

pub mod embedded;
pub mod errors;
pub mod export;
pub mod ids;
pub mod image_ref;
pub mod result;

// Re-export commonly used types for convenience
pub use embedded::EmbeddedDataField;
pub use errors::{CodecError, QualtricsError, TaggerError};
pub use export::{ExportFormat, JobStatus};
pub use ids::{ExportId, GraphicId, LibraryId, SurveyId};
pub use image_ref::ImageRef;
pub use result::Result;
