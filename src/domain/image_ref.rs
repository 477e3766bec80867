//! Image references under the images directory

use super::embedded::EmbeddedDataField;
use super::errors::CodecError;
use std::path::{Path, PathBuf};

/// One source image, identified by its path relative to the images directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    relative: PathBuf,
    field: EmbeddedDataField,
}

impl ImageRef {
    /// Create a reference, validating the path against the codec
    pub fn new(relative: impl Into<PathBuf>) -> Result<Self, CodecError> {
        let relative = relative.into();
        let field = EmbeddedDataField::for_image(&relative)?;
        Ok(Self { relative, field })
    }

    /// Path relative to the images directory
    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// Embedded data field tagging this image in the survey
    pub fn field(&self) -> &EmbeddedDataField {
        &self.field
    }

    /// File name component, used for uploads
    pub fn file_name(&self) -> String {
        self.relative
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
