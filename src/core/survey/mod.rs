//! Survey creation from a directory of images

pub mod builder;
pub mod preprocess;
pub mod render;
pub mod scan;

pub use builder::{work_dir_for, CreateSurveyRequest, SurveyBuilder, SurveyCreated};
pub use preprocess::{ImagePreprocessor, PrepareOutcome, PreprocessSummary};
pub use render::{render_survey, SurveyTemplates, UploadedImage};
pub use scan::{is_image, scan_images};
