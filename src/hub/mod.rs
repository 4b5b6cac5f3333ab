//! ModelScope hub access
//!
//! [`HubApi`] is the seam between the upload driver and the remote hub:
//! one login, then one streamed upload per run. [`HubClient`] speaks the
//! hub's HTTP API; tests substitute their own implementation.

pub mod client;
pub mod response;

pub use client::HubClient;

use crate::error::{PusherError, Result};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use tokio::io::AsyncRead;

/// Streaming payload accepted by [`HubApi::upload`]
pub type Payload<'a> = &'a mut (dyn AsyncRead + Unpin + Send);

#[async_trait]
pub trait HubApi: Send {
    /// Establish a session with the given access token.
    async fn login(&mut self, token: &str) -> Result<()>;

    /// Stream `payload` to completion into `target`.
    ///
    /// `content_length` is set only when the exact byte count is known in
    /// advance; otherwise the body is sent with chunked encoding.
    async fn upload(
        &mut self,
        payload: Payload<'_>,
        content_length: Option<u64>,
        target: &UploadTarget,
    ) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoType {
    #[default]
    Model,
    Dataset,
}

impl RepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoType::Model => "model",
            RepoType::Dataset => "dataset",
        }
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepoType {
    type Err = PusherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "model" => Ok(RepoType::Model),
            "dataset" => Ok(RepoType::Dataset),
            other => Err(PusherError::Config(format!(
                "Repository type must be one of: model, dataset (got '{}')",
                other
            ))),
        }
    }
}

/// Where an upload lands and how the resulting commit is described
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub repo_id: String,
    pub repo_type: RepoType,
    pub revision: String,
    pub path_in_repo: String,
    pub commit_message: String,
    pub commit_description: String,
}
