//! Error types for the upload pipelines and the hub client

pub mod handlers;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PusherError>;

#[derive(Debug, Error)]
pub enum PusherError {
    /// Missing or malformed configuration, detected before any side effect
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local input that does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Login rejected or the session could not be established
    #[error("Authentication error: {0}")]
    Auth(String),

    /// External command could not be started
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The upload call failed or the hub rejected the payload
    #[error("Upload error: {0}")]
    Upload(String),

    /// `docker save` exited non-zero after its stream was consumed
    #[error("Image export failed with exit code {code}")]
    ExportFailed { code: i32 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl PusherError {
    /// Process exit code for this failure.
    ///
    /// A failed export surfaces the exporter's own code so callers can tell
    /// it apart from upload or configuration failures, which all map to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            PusherError::ExportFailed { code } if *code != 0 => *code,
            _ => 1,
        }
    }
}
