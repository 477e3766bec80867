//! Survey creation workflow
//!
//! The steps run in a fixed order and stop at the first error:
//!
//! 1. Load templates and scan the images directory (no network yet)
//! 2. Prepare images in the work directory
//! 3. Upload each prepared image to the graphics library
//! 4. Render `survey.txt` into the work directory
//! 5. Import the survey

use super::preprocess::{ImagePreprocessor, PreprocessSummary};
use super::render::{render_survey, SurveyTemplates, UploadedImage};
use super::scan::scan_images;
use crate::adapters::qualtrics::SurveyPlatform;
use crate::domain::{LibraryId, Result, SurveyId, TaggerError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Suffix of the work directory created next to the images directory
pub const WORK_DIR_SUFFIX: &str = "_qualtrics";

/// Name of the rendered survey file inside the work directory
pub const SURVEY_FILE: &str = "survey.txt";

/// Inputs for creating a survey
#[derive(Debug, Clone)]
pub struct CreateSurveyRequest {
    /// Human-friendly survey name; may contain spaces
    pub name: String,
    /// Directory searched recursively for images
    pub images_dir: PathBuf,
    /// Graphics library receiving the uploads
    pub library_id: LibraryId,
    /// Directory holding the survey templates
    pub templates_dir: PathBuf,
    /// Downscale wider images to this width
    pub max_image_width: Option<u32>,
}

/// Result of a successful survey creation
#[derive(Debug, Clone)]
pub struct SurveyCreated {
    /// Id of the imported survey
    pub survey_id: SurveyId,
    /// Rendered survey text file
    pub survey_file: PathBuf,
    /// Number of images in the survey
    pub image_count: usize,
    /// Preprocessing counts
    pub preprocess: PreprocessSummary,
    /// Header markup that must be pasted into the survey manually
    pub header_html: Option<PathBuf>,
    /// Where the survey can be edited
    pub editor_url: String,
}

/// Work directory for an images directory: a sibling named `<dir>_qualtrics`
pub fn work_dir_for(images_dir: &Path) -> Result<PathBuf> {
    let resolved;
    let dir = if images_dir.file_name().is_some() {
        images_dir
    } else {
        resolved = fs::canonicalize(images_dir)?;
        resolved.as_path()
    };

    let name = dir.file_name().ok_or_else(|| {
        TaggerError::Configuration(format!(
            "Cannot derive a work directory from {}",
            images_dir.display()
        ))
    })?;

    let mut work_name = name.to_os_string();
    work_name.push(WORK_DIR_SUFFIX);
    Ok(dir.with_file_name(work_name))
}

/// Builds surveys on a [`SurveyPlatform`]
pub struct SurveyBuilder<'a> {
    platform: &'a dyn SurveyPlatform,
    preprocessor: Option<ImagePreprocessor>,
}

impl<'a> SurveyBuilder<'a> {
    /// Builder that picks its image transform from each request
    pub fn new(platform: &'a dyn SurveyPlatform) -> Self {
        Self {
            platform,
            preprocessor: None,
        }
    }

    /// Use `preprocessor` regardless of the request's max width
    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    /// Create a survey from a directory of images
    pub async fn create(&self, request: &CreateSurveyRequest) -> Result<SurveyCreated> {
        let start = Instant::now();

        let templates = SurveyTemplates::load(&request.templates_dir)?;
        let images = scan_images(&request.images_dir)?;
        tracing::info!(
            images_dir = %request.images_dir.display(),
            count = images.len(),
            "Images found"
        );

        let work_dir = work_dir_for(&request.images_dir)?;
        fs::create_dir_all(&work_dir).map_err(|e| {
            TaggerError::Io(format!(
                "Failed to create work directory {}: {}",
                work_dir.display(),
                e
            ))
        })?;

        let fallback;
        let preprocessor = match &self.preprocessor {
            Some(preprocessor) => preprocessor,
            None => {
                fallback = ImagePreprocessor::for_max_width(request.max_image_width)?;
                &fallback
            }
        };
        let preprocess = preprocessor.prepare_all(&request.images_dir, &work_dir, &images)?;

        let folder = request
            .images_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        let mut uploaded = Vec::with_capacity(images.len());
        for image in images {
            let path = work_dir.join(image.relative_path());
            tracing::debug!(path = %path.display(), "Uploading image");
            let graphic_id = self
                .platform
                .upload_graphic(&path, folder.as_deref(), &request.library_id)
                .await?;
            let url = self.platform.graphic_url(&graphic_id);
            uploaded.push(UploadedImage {
                image,
                graphic_id,
                url,
            });
        }

        let survey_file = work_dir.join(SURVEY_FILE);
        fs::write(&survey_file, render_survey(&templates, &uploaded)).map_err(|e| {
            TaggerError::Io(format!("Failed to write {}: {}", survey_file.display(), e))
        })?;

        let survey_id = self.platform.import_survey(&request.name, &survey_file).await?;
        let editor_url = self.platform.survey_editor_url(&survey_id);

        tracing::info!(
            survey_id = %survey_id,
            images = uploaded.len(),
            duration_ms = start.elapsed().as_millis(),
            "Survey created"
        );

        Ok(SurveyCreated {
            survey_id,
            survey_file,
            image_count: uploaded.len(),
            preprocess,
            header_html: templates.header_html,
            editor_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_work_dir_is_sibling() {
        assert_eq!(
            work_dir_for(Path::new("/data/imgs")).unwrap(),
            PathBuf::from("/data/imgs_qualtrics")
        );
        assert_eq!(
            work_dir_for(Path::new("/data/imgs/")).unwrap(),
            PathBuf::from("/data/imgs_qualtrics")
        );
        assert_eq!(
            work_dir_for(Path::new("imgs")).unwrap(),
            PathBuf::from("imgs_qualtrics")
        );
    }

    #[test]
    fn test_work_dir_resolves_dot_paths() {
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("imgs");
        fs::create_dir_all(&images).unwrap();

        let work_dir = work_dir_for(&images.join(".")).unwrap();
        assert_eq!(
            work_dir.file_name().unwrap().to_string_lossy(),
            "imgs_qualtrics"
        );
    }
}
