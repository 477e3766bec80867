//! Integration tests for export polling
//!
//! The tokio clock is paused, so sleeps complete instantly while elapsed
//! time still advances by exactly the poll interval.

mod common;

use common::{complete, failed, in_progress, ScriptedPlatform};
use qualtrics_tagger::core::export::ExportPoller;
use qualtrics_tagger::domain::{ExportFormat, ExportId, SurveyId, TaggerError};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::watch;
use tokio::time::Instant;

const INTERVAL: Duration = Duration::from_millis(1500);

fn export_id() -> ExportId {
    ExportId::new("ES_test").unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_waits_between_polls_then_downloads() {
    let archive = b"PK\x03\x04 pretend archive bytes".to_vec();
    let platform = ScriptedPlatform::new(
        vec![in_progress(10.0), in_progress(55.0), complete()],
        archive.clone(),
    );
    let poller = ExportPoller::new(&platform);

    let start = Instant::now();
    let mut sink = Vec::new();
    let bytes = poller
        .await_and_download(&export_id(), &mut sink)
        .await
        .unwrap();

    assert_eq!(start.elapsed(), INTERVAL * 2);
    assert_eq!(platform.polls(), 3);
    assert_eq!(platform.downloads(), 1);
    assert_eq!(bytes, archive.len() as u64);
    assert_eq!(sink, archive);
}

#[tokio::test(start_paused = true)]
async fn test_failed_export_is_not_downloaded() {
    let platform = ScriptedPlatform::new(
        vec![in_progress(20.0), failed("quota exceeded")],
        Vec::new(),
    );
    let poller = ExportPoller::new(&platform);

    let start = Instant::now();
    let mut sink = Vec::new();
    let err = poller
        .await_and_download(&export_id(), &mut sink)
        .await
        .unwrap_err();

    assert_eq!(start.elapsed(), INTERVAL);
    assert_eq!(platform.polls(), 2);
    assert_eq!(platform.downloads(), 0);
    assert!(sink.is_empty());
    match err {
        TaggerError::ExportFailed { reason, .. } => assert_eq!(reason, "quota exceeded"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_custom_poll_interval() {
    let platform = ScriptedPlatform::new(vec![in_progress(0.0), complete()], b"x".to_vec());
    let poller = ExportPoller::new(&platform).with_poll_interval(Duration::from_millis(200));

    let start = Instant::now();
    poller
        .await_and_download(&export_id(), &mut Vec::new())
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_first_poll() {
    let platform = ScriptedPlatform::new(vec![complete()], b"x".to_vec());
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    let poller = ExportPoller::new(&platform).with_cancellation(rx);

    let err = poller
        .await_and_download(&export_id(), &mut Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TaggerError::Cancelled(_)));
    assert_eq!(platform.polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_while_sleeping() {
    let platform = ScriptedPlatform::new(vec![in_progress(1.0); 10], Vec::new());
    let (tx, rx) = watch::channel(false);
    let poller = ExportPoller::new(&platform).with_cancellation(rx);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        tx.send(true).unwrap();
    });

    let start = Instant::now();
    let err = poller
        .await_and_download(&export_id(), &mut Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TaggerError::Cancelled(_)));
    assert_eq!(platform.polls(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_cancel_sender_keeps_waiting() {
    let platform = ScriptedPlatform::new(vec![in_progress(1.0), complete()], b"ok".to_vec());
    let (tx, rx) = watch::channel(false);
    drop(tx);
    let poller = ExportPoller::new(&platform).with_cancellation(rx);

    let start = Instant::now();
    let bytes = poller
        .await_and_download(&export_id(), &mut Vec::new())
        .await
        .unwrap();

    assert_eq!(bytes, 2);
    assert_eq!(start.elapsed(), INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_exceeded() {
    let platform = ScriptedPlatform::new(vec![in_progress(1.0); 10], Vec::new());
    let poller = ExportPoller::new(&platform).with_max_wait(Some(Duration::from_secs(4)));

    let err = poller
        .await_and_download(&export_id(), &mut Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TaggerError::Timeout { .. }));
    // Polls at 0s, 1.5s, 3s and 4.5s
    assert_eq!(platform.polls(), 4);
    assert_eq!(platform.downloads(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_download_results_writes_file() {
    let archive = b"zip bytes".to_vec();
    let platform = ScriptedPlatform::new(vec![in_progress(50.0), complete()], archive.clone());
    let poller = ExportPoller::new(&platform);
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("data.zip");

    let bytes = poller
        .download_results(
            &SurveyId::new("SV_1").unwrap(),
            &ExportFormat::Csv,
            &destination,
        )
        .await
        .unwrap();

    assert_eq!(bytes, archive.len() as u64);
    assert_eq!(std::fs::read(&destination).unwrap(), archive);
}

#[tokio::test(start_paused = true)]
async fn test_download_results_removes_file_on_failure() {
    let platform = ScriptedPlatform::new(vec![failed("survey closed")], Vec::new());
    let poller = ExportPoller::new(&platform);
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("data.zip");

    let result = poller
        .download_results(
            &SurveyId::new("SV_1").unwrap(),
            &ExportFormat::Json,
            &destination,
        )
        .await;

    assert!(result.is_err());
    assert!(!destination.exists());
    assert!(!dir.path().join("data.zip.part").exists());
}

#[tokio::test(start_paused = true)]
async fn test_failed_reexport_keeps_previous_file() {
    let platform = ScriptedPlatform::new(vec![in_progress(5.0), failed("survey closed")], Vec::new());
    let poller = ExportPoller::new(&platform);
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("data.zip");
    std::fs::write(&destination, b"previous export").unwrap();

    let result = poller
        .download_results(
            &SurveyId::new("SV_1").unwrap(),
            &ExportFormat::Json,
            &destination,
        )
        .await;

    assert!(result.is_err());
    assert_eq!(std::fs::read(&destination).unwrap(), b"previous export");
    assert!(!dir.path().join("data.zip.part").exists());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_reexport_keeps_previous_file() {
    let platform = ScriptedPlatform::new(vec![in_progress(1.0); 10], Vec::new());
    let (tx, rx) = watch::channel(false);
    let poller = ExportPoller::new(&platform).with_cancellation(rx);
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("data.zip");
    std::fs::write(&destination, b"previous export").unwrap();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        tx.send(true).unwrap();
    });

    let err = poller
        .download_results(
            &SurveyId::new("SV_1").unwrap(),
            &ExportFormat::Json,
            &destination,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TaggerError::Cancelled(_)));
    assert_eq!(std::fs::read(&destination).unwrap(), b"previous export");
}

#[tokio::test(start_paused = true)]
async fn test_successful_reexport_replaces_previous_file() {
    let platform = ScriptedPlatform::new(vec![complete()], b"fresh export".to_vec());
    let poller = ExportPoller::new(&platform);
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("data.zip");
    std::fs::write(&destination, b"previous export").unwrap();

    poller
        .download_results(
            &SurveyId::new("SV_1").unwrap(),
            &ExportFormat::Json,
            &destination,
        )
        .await
        .unwrap();

    assert_eq!(std::fs::read(&destination).unwrap(), b"fresh export");
    assert!(!dir.path().join("data.zip.part").exists());
}
