//! Response exports
//!
//! This module provides:
//! - Export job submission, polling and download ([`ExportPoller`])
//! - Parsing of JSON export archives into response records
//! - Mapping of annotation answers back to image paths

pub mod poller;
pub mod responses;

pub use poller::{ExportPoller, DEFAULT_POLL_INTERVAL};
pub use responses::{extract_annotations, parse_response_archive, ImageAnnotation};
