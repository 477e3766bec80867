//! Reading response records out of export archives

use crate::domain::embedded::is_annotation_field;
use crate::domain::{EmbeddedDataField, Result, TaggerError};
use serde::Deserialize;
use serde_json::Value;
use std::io::Cursor;
use std::path::PathBuf;
use zip::ZipArchive;

#[derive(Debug, Deserialize)]
struct ResponseDocument {
    responses: Vec<Value>,
}

/// Concatenate the `responses` arrays of every JSON member of a ZIP archive
///
/// Members are visited in archive order and directory entries are skipped.
pub fn parse_response_archive(bytes: &[u8]) -> Result<Vec<Value>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut responses = Vec::new();

    for index in 0..archive.len() {
        let member = archive.by_index(index)?;
        if member.is_dir() {
            continue;
        }

        let name = member.name().to_string();
        let document: ResponseDocument = serde_json::from_reader(member).map_err(|e| {
            TaggerError::Serialization(format!("archive member '{name}': {e}"))
        })?;

        tracing::debug!(member = %name, count = document.responses.len(), "Read archive member");
        responses.extend(document.responses);
    }

    Ok(responses)
}

/// One answered annotation field of a response
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnnotation {
    /// Image path relative to the images directory
    pub image: PathBuf,
    /// The embedded data field the answer was recorded in
    pub field: EmbeddedDataField,
    /// The recorded answer
    pub value: Value,
}

/// Map the annotation fields of a response record back to image paths
///
/// Keys without the annotation prefix are ignored, as are null and empty
/// string answers. Records from older exports nest answers under `values`;
/// fields are read from both layouts, and `values` wins when a field
/// appears in both. Keys that carry the prefix but do not decode are logged
/// and skipped so one bad column cannot sink the whole export.
pub fn extract_annotations(record: &Value) -> Result<Vec<ImageAnnotation>> {
    let top_level = record
        .as_object()
        .ok_or_else(|| TaggerError::Serialization("response record is not an object".to_string()))?;
    let nested = top_level.get("values").and_then(Value::as_object);

    let shadowed = |key: &str| nested.is_some_and(|values| values.contains_key(key));
    let fields = nested
        .into_iter()
        .flatten()
        .chain(top_level.iter().filter(|(key, _)| !shadowed(key)));

    let mut annotations = Vec::new();
    for (key, value) in fields {
        if !is_annotation_field(key) || is_unanswered(value) {
            continue;
        }
        let field = match EmbeddedDataField::parse(key) {
            Ok(field) => field,
            Err(e) => {
                tracing::warn!(field = %key, error = %e, "Skipping undecodable annotation field");
                continue;
            }
        };
        annotations.push(ImageAnnotation {
            image: field.image_path(),
            field,
            value: value.clone(),
        });
    }
    Ok(annotations)
}

fn is_unanswered(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
