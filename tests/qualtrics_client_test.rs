//! Integration tests for the Qualtrics HTTP client against a mock server

use mockito::{Matcher, Server};
use qualtrics_tagger::adapters::qualtrics::{QualtricsClient, SurveyPlatform};
use qualtrics_tagger::config::{secret_string, QualtricsConfig};
use qualtrics_tagger::domain::{
    ExportFormat, ExportId, JobStatus, LibraryId, QualtricsError, SurveyId, TaggerError,
};
use serde_json::json;
use std::io::Write;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const TOKEN: &str = "test-api-token";

fn client(server: &Server) -> QualtricsClient {
    client_with_timeout(server, 5)
}

fn client_with_timeout(server: &Server, timeout_seconds: u64) -> QualtricsClient {
    QualtricsClient::new(&QualtricsConfig {
        base_url: server.url(),
        api_token: secret_string(TOKEN.to_string()),
        timeout_seconds,
    })
    .unwrap()
}

#[tokio::test]
async fn test_submit_export() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/API/v3/responseexports")
        .match_header("x-api-token", TOKEN)
        .match_body(Matcher::Json(json!({"surveyId": "SV_1", "format": "json"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result":{"id":"ES_42"},"meta":{"httpStatus":"200 - OK"}}"#)
        .create_async()
        .await;

    let export_id = client(&server)
        .submit_export(&SurveyId::new("SV_1").unwrap(), &ExportFormat::Json)
        .await
        .unwrap();

    assert_eq!(export_id.as_str(), "ES_42");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_poll_status_states() {
    let mut server = Server::new_async().await;
    let file_url = format!("{}/API/v3/responseexports/ES_3/file", server.url());

    server
        .mock("GET", "/API/v3/responseexports/ES_1")
        .with_body(r#"{"result":{"status":"in progress","percentComplete":55.0}}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/API/v3/responseexports/ES_2")
        .with_body(r#"{"result":{"status":"failed","info":{"reason":"quota exceeded"}}}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/API/v3/responseexports/ES_3")
        .with_body(json!({"result": {"status": "complete", "file": file_url}}).to_string())
        .create_async()
        .await;

    let client = client(&server);

    assert_eq!(
        client.poll_status(&ExportId::new("ES_1").unwrap()).await.unwrap(),
        JobStatus::InProgress {
            percent_complete: 55.0
        }
    );
    assert_eq!(
        client.poll_status(&ExportId::new("ES_2").unwrap()).await.unwrap(),
        JobStatus::Failed {
            reason: "quota exceeded".to_string()
        }
    );
    assert_eq!(
        client.poll_status(&ExportId::new("ES_3").unwrap()).await.unwrap(),
        JobStatus::Complete { file: file_url }
    );
}

#[tokio::test]
async fn test_download_streams_body() {
    let mut server = Server::new_async().await;
    let body: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
    let mock = server
        .mock("GET", "/API/v3/responseexports/ES_1/file")
        .match_header("x-api-token", TOKEN)
        .with_header("content-type", "application/zip")
        .with_body(body.clone())
        .create_async()
        .await;

    let mut sink = Vec::new();
    let location = format!("{}/API/v3/responseexports/ES_1/file", server.url());
    let written = client(&server).download(&location, &mut sink).await.unwrap();

    assert_eq!(written, body.len() as u64);
    assert_eq!(sink, body);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_download_outlasting_timeout_completes() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/API/v3/responseexports/ES_1/file")
        .with_chunked_body(|w| {
            for (i, part) in ["first-chunk", "second-chunk", "third-chunk", "last-chunk"]
                .iter()
                .enumerate()
            {
                if i > 0 {
                    std::thread::sleep(Duration::from_millis(500));
                }
                w.write_all(part.as_bytes())?;
                w.flush()?;
            }
            Ok(())
        })
        .create_async()
        .await;

    let start = Instant::now();
    let mut sink = Vec::new();
    let location = format!("{}/API/v3/responseexports/ES_1/file", server.url());
    let written = client_with_timeout(&server, 1)
        .download(&location, &mut sink)
        .await
        .unwrap();

    assert!(start.elapsed() > Duration::from_secs(1));
    assert_eq!(sink, b"first-chunksecond-chunkthird-chunklast-chunk");
    assert_eq!(written, sink.len() as u64);
}

#[tokio::test]
async fn test_stalled_download_fails() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/API/v3/responseexports/ES_1/file")
        .with_chunked_body(|w| {
            w.write_all(b"first-chunk")?;
            w.flush()?;
            std::thread::sleep(Duration::from_millis(2500));
            w.write_all(b"too-late")
        })
        .create_async()
        .await;

    let mut sink = Vec::new();
    let location = format!("{}/API/v3/responseexports/ES_1/file", server.url());
    let err = client_with_timeout(&server, 1)
        .download(&location, &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TaggerError::Qualtrics(QualtricsError::DownloadFailed(ref msg)) if msg.contains("no data")
    ));
    assert_eq!(sink, b"first-chunk");
}

#[tokio::test]
async fn test_unauthorized_is_authentication_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/API/v3/responseexports/ES_1")
        .with_status(401)
        .with_body(r#"{"meta":{"error":{"errorMessage":"Invalid token"}}}"#)
        .create_async()
        .await;

    let err = client(&server)
        .poll_status(&ExportId::new("ES_1").unwrap())
        .await
        .unwrap_err();

    match err {
        TaggerError::Qualtrics(QualtricsError::AuthenticationFailed { status, message }) => {
            assert_eq!(status, 401);
            assert!(message.contains("Invalid token"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/API/v3/responseexports")
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let err = client(&server)
        .submit_export(&SurveyId::new("SV_1").unwrap(), &ExportFormat::Csv)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TaggerError::Qualtrics(QualtricsError::ServerError { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_malformed_envelope_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/API/v3/responseexports")
        .with_body(r#"{"unexpected":true}"#)
        .create_async()
        .await;

    let err = client(&server)
        .submit_export(&SurveyId::new("SV_1").unwrap(), &ExportFormat::Json)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TaggerError::Qualtrics(QualtricsError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_upload_graphic_multipart() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("tabby.png");
    std::fs::write(&image, b"fake png bytes").unwrap();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/API/v3/libraries/UR_lib/graphics")
        .match_header("x-api-token", TOKEN)
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="tabby.png""#.to_string()),
            Matcher::Regex("image/png".to_string()),
            Matcher::Regex(r#"name="folder""#.to_string()),
            Matcher::Regex("cats".to_string()),
        ]))
        .with_body(r#"{"result":{"id":"IM_7"}}"#)
        .create_async()
        .await;

    let graphic_id = client(&server)
        .upload_graphic(&image, Some("cats"), &LibraryId::new("UR_lib").unwrap())
        .await
        .unwrap();

    assert_eq!(graphic_id.as_str(), "IM_7");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_import_survey_multipart() {
    let dir = TempDir::new().unwrap();
    let survey = dir.path().join("survey.txt");
    std::fs::write(&survey, "[[AdvancedFormat]]\n").unwrap();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/API/v3/surveys")
        .match_header("x-api-token", TOKEN)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="name""#.to_string()),
            Matcher::Regex("My Survey".to_string()),
            Matcher::Regex("application/vnd.qualtrics.survey.txt".to_string()),
            Matcher::Regex(r"\[\[AdvancedFormat\]\]".to_string()),
        ]))
        .with_body(r#"{"result":{"id":"SV_new"}}"#)
        .create_async()
        .await;

    let survey_id = client(&server)
        .import_survey("My Survey", &survey)
        .await
        .unwrap();

    assert_eq!(survey_id.as_str(), "SV_new");
    mock.assert_async().await;
}
