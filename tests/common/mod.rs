#![allow(dead_code)]

use async_trait::async_trait;
use modelscope_image_pusher::cli::Args;
use modelscope_image_pusher::cli::config::{DOCKER_ENV, REPO_ID_ENV, TOKEN_ENV};
use modelscope_image_pusher::hub::Payload;
use modelscope_image_pusher::{Config, HubApi, PusherError, Result, UploadTarget};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub target: UploadTarget,
    pub content_length: Option<u64>,
    pub body: Vec<u8>,
}

/// In-memory hub that drains payloads and records what it saw
#[derive(Debug, Default)]
pub struct MockHub {
    pub logins: Vec<String>,
    pub uploads: Vec<RecordedUpload>,
    pub reject_login: bool,
    /// Fail the upload after reading this many bytes
    pub fail_after: Option<usize>,
}

impl MockHub {
    pub fn failing_after(bytes: usize) -> Self {
        Self {
            fail_after: Some(bytes),
            ..Self::default()
        }
    }
}

#[async_trait]
impl HubApi for MockHub {
    async fn login(&mut self, token: &str) -> Result<()> {
        self.logins.push(token.to_string());
        if self.reject_login {
            return Err(PusherError::Auth("Invalid access token provided".to_string()));
        }
        Ok(())
    }

    async fn upload(
        &mut self,
        payload: Payload<'_>,
        content_length: Option<u64>,
        target: &UploadTarget,
    ) -> Result<()> {
        let mut body = Vec::new();
        let outcome = match self.fail_after {
            Some(limit) => {
                body.resize(limit, 0);
                payload.read_exact(&mut body).await?;
                Err(PusherError::Upload("connection reset by peer".to_string()))
            }
            None => {
                payload.read_to_end(&mut body).await?;
                Ok(())
            }
        };

        self.uploads.push(RecordedUpload {
            target: target.clone(),
            content_length,
            body,
        });
        outcome
    }
}

pub fn image_config(image: &str, docker: &Path) -> Config {
    let args = Args {
        image: Some(image.to_string()),
        repo_type: "model".to_string(),
        revision: "master".to_string(),
        ..Args::default()
    };
    let docker = docker.to_string_lossy().into_owned();
    Config::from_args(&args, |key: &str| match key {
        TOKEN_ENV => Some("ms-token".to_string()),
        REPO_ID_ENV => Some("alice/whisper".to_string()),
        DOCKER_ENV => Some(docker.clone()),
        _ => None,
    })
    .unwrap()
}

pub fn local_config(path: &Path) -> Config {
    let args = Args {
        local_file: Some(path.to_path_buf()),
        repo_type: "model".to_string(),
        revision: "master".to_string(),
        ..Args::default()
    };
    Config::from_args(&args, |key: &str| match key {
        TOKEN_ENV => Some("ms-token".to_string()),
        REPO_ID_ENV => Some("alice/whisper".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Write an executable stand-in for `docker`.
///
/// `inspect` and `save` are shell snippets run for `docker image inspect ...`
/// and `docker save ...`. Every invocation is appended to `calls.log` next to
/// the script.
#[cfg(unix)]
pub fn fake_docker(dir: &Path, inspect: &str, save: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.join("calls.log");
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> '{log}'\ncase \"$1\" in\n  image)\n    {inspect}\n    ;;\n  save)\n    {save}\n    ;;\nesac\n",
        log = log.display(),
    );
    let path = dir.join("docker");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn docker_calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("calls.log"))
        .map(|log| log.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
