//! HTTP client for the ModelScope hub API

use super::response::{ApiResponse, LoginData};
use super::{HubApi, Payload, UploadTarget};
use crate::error::handlers::HttpErrorHandler;
use crate::error::{PusherError, Result};
use crate::logging::Logger;
use async_trait::async_trait;
use futures::SinkExt;
use futures::channel::mpsc;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::io::AsyncReadExt;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://www.modelscope.cn";

/// Bytes read from the payload per body chunk
const CHUNK_SIZE: usize = 1024 * 1024;

/// Chunks buffered between the payload reader and the request body
const BODY_CHANNEL_DEPTH: usize = 4;

type BodyChunk = std::io::Result<Vec<u8>>;

pub struct HubClient {
    client: Client,
    endpoint: Url,
    access_token: Option<String>,
    output: Logger,
}

impl HubClient {
    pub fn new(endpoint: &str, output: Logger) -> Result<Self> {
        let mut endpoint = Url::parse(endpoint)?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("modelscope-image-pusher/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            access_token: None,
            output,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn login_url(&self) -> Result<Url> {
        Ok(self.endpoint.join("api/v1/login")?)
    }

    pub fn upload_url(&self, target: &UploadTarget) -> Result<Url> {
        let mut url = self.endpoint.join(&format!(
            "api/v1/{}s/{}/file",
            target.repo_type.as_str(),
            target.repo_id
        ))?;
        url.query_pairs_mut()
            .append_pair("FilePath", &target.path_in_repo)
            .append_pair("Revision", &target.revision)
            .append_pair("CommitMessage", &target.commit_message)
            .append_pair("CommitDescription", &target.commit_description);
        Ok(url)
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: Response,
        on_status: impl FnOnce(StatusCode, &str) -> PusherError,
    ) -> Result<ApiResponse<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(on_status(status, &body));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(ApiResponse {
                code: None,
                success: None,
                message: None,
                request_id: None,
                data: None,
            });
        }
        Ok(ApiResponse::parse(&body)?)
    }

    async fn finish_upload(&self, response: Response, target: &UploadTarget) -> Result<()> {
        let envelope: ApiResponse<serde_json::Value> =
            Self::read_envelope(response, |status, text| {
                HttpErrorHandler::handle_upload_error(status, text, "streamed upload")
            })
            .await?;

        if !envelope.is_success() {
            return Err(PusherError::Upload(format!(
                "Hub rejected {}: {}",
                target.path_in_repo,
                envelope.failure_message()
            )));
        }
        Ok(())
    }
}

/// How far the payload got before the body channel stopped accepting it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pumped {
    Complete,
    /// The request dropped its body, usually because the hub already answered
    Disconnected,
}

/// Copy `payload` into the request body channel until end-of-stream.
///
/// A read error is forwarded into the body as well, so the request aborts
/// instead of committing a truncated upload.
async fn pump(payload: Payload<'_>, mut tx: mpsc::Sender<BodyChunk>) -> Result<Pumped> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match payload.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                let _ = tx
                    .send(Err(std::io::Error::new(e.kind(), e.to_string())))
                    .await;
                return Err(PusherError::Io(e));
            }
        };
        if n == 0 {
            return Ok(Pumped::Complete);
        }
        if tx.send(Ok(buf[..n].to_vec())).await.is_err() {
            return Ok(Pumped::Disconnected);
        }
    }
}

fn responded_early() -> PusherError {
    PusherError::Upload("Hub responded before the payload was fully sent".to_string())
}

#[async_trait]
impl HubApi for HubClient {
    async fn login(&mut self, token: &str) -> Result<()> {
        let url = self.login_url()?;
        self.output.detail(&format!("Logging in at {}", url));

        let response = self
            .client
            .post(url)
            .json(&json!({ "AccessToken": token }))
            .send()
            .await?;

        let envelope: ApiResponse<LoginData> =
            Self::read_envelope(response, HttpErrorHandler::handle_auth_error).await?;
        if !envelope.is_success() {
            return Err(PusherError::Auth(envelope.failure_message()));
        }

        let data = envelope
            .data
            .ok_or_else(|| PusherError::Auth("Login response carried no access token".to_string()))?;
        if let Some(username) = &data.username {
            self.output.detail(&format!("Logged in as {}", username));
        }
        self.access_token = Some(data.access_token);
        Ok(())
    }

    async fn upload(
        &mut self,
        payload: Payload<'_>,
        content_length: Option<u64>,
        target: &UploadTarget,
    ) -> Result<()> {
        let token = self
            .access_token
            .clone()
            .ok_or_else(|| PusherError::Auth("Upload attempted before login".to_string()))?;
        let url = self.upload_url(target)?;
        self.output.detail(&format!("Streaming to {}", url));

        let (tx, rx) = mpsc::channel::<BodyChunk>(BODY_CHANNEL_DEPTH);
        let mut request = self
            .client
            .put(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/octet-stream");
        if let Some(len) = content_length {
            request = request.header(CONTENT_LENGTH, len);
        }
        let send = request.body(Body::wrap_stream(rx)).send();
        tokio::pin!(send);

        // Poll the response first so a hub rejection wins over the closed
        // body channel.
        let pumped = tokio::select! {
            biased;
            response = &mut send => {
                self.finish_upload(response?, target).await?;
                return Err(responded_early());
            }
            pumped = pump(payload, tx) => pumped?,
        };

        let response = send.await?;
        self.finish_upload(response, target).await?;
        match pumped {
            Pumped::Complete => Ok(()),
            Pumped::Disconnected => Err(responded_early()),
        }
    }
}
