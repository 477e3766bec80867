//! Embedded data field codec
//!
//! Every image in a survey is tagged with an embedded data field whose name
//! is derived from the image's path relative to the images directory:
//! `anno_` followed by the path segments joined with `|`. The same codec is
//! used when building the survey and when reading exported responses, so
//! the mapping must stay lossless in both directions.
//!
//! ```
//! use qualtrics_tagger::domain::embedded::{decode, encode};
//! use std::path::Path;
//!
//! let token = encode(Path::new("cats/tabby.png")).unwrap();
//! assert_eq!(token, "anno_cats|tabby.png");
//! assert_eq!(decode(&token).unwrap(), Path::new("cats/tabby.png"));
//! ```

use super::errors::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Prefix shared by every annotation field name
pub const EMBEDDED_DATA_PREFIX: &str = "anno_";

/// Character substituted for path separators; reserved in image paths
pub const RESERVED_SEPARATOR: char = '|';

/// Encode a relative image path into an embedded data field name.
///
/// Rejects paths containing `|`, absolute or parent-relative paths, non
/// UTF-8 segments and the empty path.
pub fn encode(path: &Path) -> Result<String, CodecError> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment
                    .to_str()
                    .ok_or_else(|| CodecError::NonUtf8(path.to_path_buf()))?;
                if segment.contains(RESERVED_SEPARATOR) {
                    return Err(CodecError::ReservedSeparator(path.to_path_buf()));
                }
                segments.push(segment);
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) | Component::ParentDir => {
                return Err(CodecError::NotRelative(path.to_path_buf()));
            }
        }
    }

    if segments.is_empty() {
        return Err(CodecError::EmptyPath);
    }

    let joined = segments.join(&RESERVED_SEPARATOR.to_string());
    Ok(format!("{EMBEDDED_DATA_PREFIX}{joined}"))
}

/// Decode an embedded data field name back into the relative image path.
pub fn decode(token: &str) -> Result<PathBuf, CodecError> {
    let body = token
        .strip_prefix(EMBEDDED_DATA_PREFIX)
        .ok_or_else(|| CodecError::MissingPrefix(token.to_string()))?;

    if body.is_empty() {
        return Err(CodecError::EmptyPath);
    }

    let mut path = PathBuf::new();
    for segment in body.split(RESERVED_SEPARATOR) {
        if segment.is_empty() {
            return Err(CodecError::EmptySegment(token.to_string()));
        }
        path.push(segment);
    }
    Ok(path)
}

/// Whether a response field name was produced by [`encode`]
pub fn is_annotation_field(name: &str) -> bool {
    name.starts_with(EMBEDDED_DATA_PREFIX)
}

/// A validated embedded data field name
///
/// Construction goes through the codec, so holding one guarantees that
/// [`EmbeddedDataField::image_path`] succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmbeddedDataField(String);

impl EmbeddedDataField {
    /// Field for an image path relative to the images directory
    pub fn for_image(path: &Path) -> Result<Self, CodecError> {
        encode(path).map(Self)
    }

    /// Parse a field name taken from a survey export
    pub fn parse(token: &str) -> Result<Self, CodecError> {
        decode(token)?;
        Ok(Self(token.to_string()))
    }

    /// The relative image path this field refers to
    pub fn image_path(&self) -> PathBuf {
        // Validated on construction.
        decode(&self.0).unwrap_or_default()
    }

    /// Field name as used in the survey definition
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Embedded data declaration line for the survey header
    pub fn declaration(&self) -> String {
        format!("[[ED:{}]]", self.0)
    }
}

impl fmt::Display for EmbeddedDataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmbeddedDataField {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        decode(&value)?;
        Ok(Self(value))
    }
}

impl From<EmbeddedDataField> for String {
    fn from(field: EmbeddedDataField) -> Self {
        field.0
    }
}
