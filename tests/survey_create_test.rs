//! Integration tests for survey creation

mod common;

use common::ScriptedPlatform;
use qualtrics_tagger::adapters::imaging::ImageTransform;
use qualtrics_tagger::core::survey::{
    CreateSurveyRequest, ImagePreprocessor, SurveyBuilder, PreprocessSummary,
};
use qualtrics_tagger::domain::{LibraryId, Result, TaggerError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Copies files and counts how often it ran
struct CountingTransform {
    runs: Arc<AtomicUsize>,
}

impl ImageTransform for CountingTransform {
    fn transform(&self, input: &Path, output: &Path) -> Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        fs::copy(input, output)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

struct Fixture {
    _dir: TempDir,
    images_dir: PathBuf,
    templates_dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let images_dir = dir.path().join("imgs");
        let templates_dir = dir.path().join("templates");

        fs::create_dir_all(images_dir.join("set")).unwrap();
        fs::write(images_dir.join("set").join("a.png"), b"png a").unwrap();
        fs::write(images_dir.join("b.JPG"), b"jpg b").unwrap();
        fs::write(images_dir.join("readme.txt"), b"ignored").unwrap();

        fs::create_dir_all(&templates_dir).unwrap();
        fs::write(
            templates_dir.join("survey_header.txt"),
            "[[AdvancedFormat]]\n{ed_declarations}",
        )
        .unwrap();
        fs::write(
            templates_dir.join("question.txt"),
            "[[Question:Text]]\n{image_path} {image_url} {image_id} {image_ed}",
        )
        .unwrap();

        Self {
            _dir: dir,
            images_dir,
            templates_dir,
        }
    }

    fn request(&self) -> CreateSurveyRequest {
        CreateSurveyRequest {
            name: "Demo Survey".to_string(),
            images_dir: self.images_dir.clone(),
            library_id: LibraryId::new("UR_lib").unwrap(),
            templates_dir: self.templates_dir.clone(),
            max_image_width: None,
        }
    }

    fn work_dir(&self) -> PathBuf {
        self.images_dir.with_file_name("imgs_qualtrics")
    }
}

#[tokio::test]
async fn test_create_uploads_renders_and_imports() {
    let fixture = Fixture::new();
    let platform = ScriptedPlatform::default();

    let created = SurveyBuilder::new(&platform)
        .create(&fixture.request())
        .await
        .unwrap();

    assert_eq!(created.survey_id.as_str(), "SV_test");
    assert_eq!(created.image_count, 2);
    assert_eq!(created.preprocess, PreprocessSummary { processed: 2, skipped: 0 });
    assert_eq!(created.survey_file, fixture.work_dir().join("survey.txt"));
    assert!(created.header_html.is_none());
    assert_eq!(
        created.editor_url,
        "https://test.qualtrics.com/ControlPanel/?ClientAction=EditSurvey&Section=SV_test"
    );

    // Sorted by file name: "b.JPG" before "set"
    let uploads = platform.uploads.lock().unwrap().clone();
    assert_eq!(
        uploads,
        vec![
            (
                fixture.work_dir().join("b.JPG"),
                Some("imgs".to_string()),
                "UR_lib".to_string()
            ),
            (
                fixture.work_dir().join("set").join("a.png"),
                Some("imgs".to_string()),
                "UR_lib".to_string()
            ),
        ]
    );
    assert_eq!(fs::read(fixture.work_dir().join("b.JPG")).unwrap(), b"jpg b");

    let set_a = PathBuf::from("set").join("a.png");
    let expected = format!(
        "[[AdvancedFormat]]\n[[ED:anno_b.JPG]]\n[[ED:anno_set|a.png]]\n\
         [[Question:Text]]\nb.JPG https://test.qualtrics.com/WRQualtricsControlPanel/Graphic.php?IM=IM_1 IM_1 anno_b.JPG\n\
         [[Question:Text]]\n{} https://test.qualtrics.com/WRQualtricsControlPanel/Graphic.php?IM=IM_2 IM_2 anno_set|a.png\n",
        set_a.display()
    );
    let imports = platform.imports.lock().unwrap().clone();
    assert_eq!(imports, vec![("Demo Survey".to_string(), expected.clone())]);
    assert_eq!(fs::read_to_string(&created.survey_file).unwrap(), expected);
}

#[tokio::test]
async fn test_pipe_in_image_path_makes_no_network_calls() {
    let fixture = Fixture::new();
    fs::write(fixture.images_dir.join("bad|name.png"), b"x").unwrap();
    let platform = ScriptedPlatform::default();

    let err = SurveyBuilder::new(&platform)
        .create(&fixture.request())
        .await
        .unwrap_err();

    assert!(matches!(err, TaggerError::Configuration(ref msg) if msg.contains("pipe symbol")));
    assert_eq!(platform.network_calls(), 0);
}

#[tokio::test]
async fn test_missing_template_makes_no_network_calls() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.templates_dir.join("question.txt")).unwrap();
    let platform = ScriptedPlatform::default();

    let err = SurveyBuilder::new(&platform)
        .create(&fixture.request())
        .await
        .unwrap_err();

    assert!(matches!(err, TaggerError::Template(_)));
    assert_eq!(platform.network_calls(), 0);
}

#[tokio::test]
async fn test_second_run_reuses_prepared_images() {
    let fixture = Fixture::new();
    let runs = Arc::new(AtomicUsize::new(0));
    let preprocessor = || {
        ImagePreprocessor::with_transform(Box::new(CountingTransform { runs: runs.clone() }))
    };

    let platform = ScriptedPlatform::default();
    SurveyBuilder::new(&platform)
        .with_preprocessor(preprocessor())
        .create(&fixture.request())
        .await
        .unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    let platform = ScriptedPlatform::default();
    let created = SurveyBuilder::new(&platform)
        .with_preprocessor(preprocessor())
        .create(&fixture.request())
        .await
        .unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(created.preprocess, PreprocessSummary { processed: 0, skipped: 2 });
    assert_eq!(platform.uploads.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_header_html_is_reported() {
    let fixture = Fixture::new();
    fs::write(fixture.templates_dir.join("header.html"), "<style></style>").unwrap();
    let platform = ScriptedPlatform::default();

    let created = SurveyBuilder::new(&platform)
        .create(&fixture.request())
        .await
        .unwrap();

    assert_eq!(
        created.header_html,
        Some(fixture.templates_dir.join("header.html"))
    );
}
