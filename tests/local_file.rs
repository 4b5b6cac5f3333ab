mod common;

use common::{MockHub, local_config};
use modelscope_image_pusher::cli::config::{REPO_ID_ENV, TOKEN_ENV};
use modelscope_image_pusher::cli::{Args, RunState};
use modelscope_image_pusher::{Config, Logger, PusherError, Runner};

#[tokio::test]
async fn uploads_file_under_its_base_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("whisperlivekit.tar");
    let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, &data).unwrap();

    let mut runner = Runner::new(local_config(&path), MockHub::default(), Logger::new_quiet());
    let report = runner.run().await.unwrap();

    assert_eq!(runner.state(), RunState::Done);
    assert_eq!(report.bytes, data.len() as u64);
    assert_eq!(report.expected_bytes, Some(data.len() as u64));

    let upload = &runner.hub().uploads[0];
    assert_eq!(upload.body, data);
    assert_eq!(upload.content_length, Some(data.len() as u64));
    assert_eq!(upload.target.path_in_repo, "whisperlivekit.tar");
    assert_eq!(upload.target.commit_message, "Local test upload");
}

#[tokio::test]
async fn empty_file_is_still_uploaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.bin");
    std::fs::write(&path, b"").unwrap();

    let mut runner = Runner::new(local_config(&path), MockHub::default(), Logger::new_quiet());
    let report = runner.run().await.unwrap();

    assert_eq!(report.bytes, 0);
    assert_eq!(report.expected_bytes, Some(0));
    let upload = &runner.hub().uploads[0];
    assert_eq!(upload.content_length, Some(0));
    assert_eq!(upload.target.path_in_repo, "empty.bin");
    assert!(upload.body.is_empty());
}

#[tokio::test]
async fn missing_file_fails_without_upload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.tar");

    let mut runner = Runner::new(local_config(&path), MockHub::default(), Logger::new_quiet());
    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, PusherError::NotFound(ref p) if *p == path));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(runner.state(), RunState::Failed);
    assert!(runner.hub().uploads.is_empty());
}

#[tokio::test]
async fn upload_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    std::fs::write(&path, vec![1u8; 64]).unwrap();

    let mut runner = Runner::new(
        local_config(&path),
        MockHub::failing_after(16),
        Logger::new_quiet(),
    );
    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, PusherError::Upload(_)));
    assert_eq!(err.exit_code(), 1);
    // The file is closed with the runner's scope and can be removed.
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_credentials_stop_before_any_work() {
    let args = Args {
        image: Some("whisperlivekit:latest".to_string()),
        repo_type: "model".to_string(),
        revision: "master".to_string(),
        ..Args::default()
    };

    let no_token = Config::from_args(&args, |key: &str| {
        (key == REPO_ID_ENV).then(|| "alice/whisper".to_string())
    });
    let no_repo = Config::from_args(&args, |key: &str| {
        (key == TOKEN_ENV).then(|| "ms-token".to_string())
    });

    for result in [no_token, no_repo] {
        let err = result.unwrap_err();
        assert!(matches!(err, PusherError::Config(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
