//! Survey text rendering from templates
//!
//! A templates directory holds:
//!
//! - `survey_header.txt` - start of the survey; `{ed_declarations}` is
//!   replaced by one embedded data declaration per image
//! - `question.txt` - repeated once per image with `{image_path}`,
//!   `{image_url}`, `{image_id}` and `{image_ed}` substituted
//! - `header.html` (optional) - markup the user pastes into the survey's
//!   look-and-feel header by hand

use crate::domain::{GraphicId, ImageRef, Result, TaggerError};
use std::fs;
use std::path::{Path, PathBuf};

/// Header template file name
pub const SURVEY_HEADER_FILE: &str = "survey_header.txt";
/// Per-image question template file name
pub const QUESTION_FILE: &str = "question.txt";
/// Optional look-and-feel header file name
pub const HEADER_HTML_FILE: &str = "header.html";

/// Loaded survey templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyTemplates {
    /// Contents of `survey_header.txt`
    pub header: String,
    /// Contents of `question.txt`
    pub question: String,
    /// Path to `header.html` when present
    pub header_html: Option<PathBuf>,
}

impl SurveyTemplates {
    /// Read the templates from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let header = read_template(&dir.join(SURVEY_HEADER_FILE))?;
        let question = read_template(&dir.join(QUESTION_FILE))?;
        let header_html = Some(dir.join(HEADER_HTML_FILE)).filter(|path| path.is_file());

        Ok(Self {
            header,
            question,
            header_html,
        })
    }

    /// Templates from in-memory text
    pub fn from_parts(header: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            question: question.into(),
            header_html: None,
        }
    }
}

fn read_template(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| TaggerError::Template(format!("Failed to read {}: {}", path.display(), e)))
}

/// An image that now lives in the graphics library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Source image
    pub image: ImageRef,
    /// Library graphic id
    pub graphic_id: GraphicId,
    /// Public URL of the graphic
    pub url: String,
}

/// Render the complete survey text
///
/// The header is followed by one question block per image, in the given
/// order; each block ends with a newline.
pub fn render_survey(templates: &SurveyTemplates, images: &[UploadedImage]) -> String {
    let declarations = images
        .iter()
        .map(|uploaded| uploaded.image.field().declaration())
        .collect::<Vec<_>>()
        .join("\n");

    let mut survey = templates.header.replace("{ed_declarations}", &declarations);
    survey.push('\n');

    for uploaded in images {
        let image_path = uploaded.image.relative_path().to_string_lossy();
        let question = templates
            .question
            .replace("{image_path}", &image_path)
            .replace("{image_url}", &uploaded.url)
            .replace("{image_id}", uploaded.graphic_id.as_str())
            .replace("{image_ed}", uploaded.image.field().as_str());
        survey.push_str(&question);
        survey.push('\n');
    }

    survey
}
