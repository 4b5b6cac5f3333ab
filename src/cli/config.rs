//! Configuration management module
//!
//! The environment is read exactly once, when [`Config`] is built; everything
//! downstream receives the resolved values.

use super::args::Args;
use super::operation_mode::{OperationMode, image_archive_name};
use crate::error::{PusherError, Result};
use crate::hub::client::DEFAULT_ENDPOINT;
use crate::hub::{RepoType, UploadTarget};

pub const TOKEN_ENV: &str = "MODELSCOPE_TOKEN";
pub const REPO_ID_ENV: &str = "MODELSCOPE_REPO_ID";
pub const ENDPOINT_ENV: &str = "MODELSCOPE_DOMAIN";
pub const DOCKER_ENV: &str = "DOCKER_BIN";

const IMAGE_COMMIT_MESSAGE: &str = "Update Docker image (streamed upload)";
const IMAGE_COMMIT_DESCRIPTION: &str = "Uploaded via automation";
const LOCAL_COMMIT_MESSAGE: &str = "Local test upload";
const LOCAL_COMMIT_DESCRIPTION: &str = "Uploaded from local file";

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub repo_id: String,
    pub repo_type: RepoType,
    pub revision: String,
    pub endpoint: String,
    pub docker: String,
    pub mode: OperationMode,
    pub path_in_repo: Option<String>,
    pub commit_message: Option<String>,
    pub commit_description: Option<String>,
}

impl Config {
    /// Build from parsed arguments and the process environment
    pub fn from_env(args: &Args) -> Result<Self> {
        Self::from_args(args, |key| std::env::var(key).ok())
    }

    /// Build from parsed arguments and an environment lookup
    pub fn from_args<F>(args: &Args, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let token = non_empty(TOKEN_ENV).ok_or_else(|| {
            PusherError::Config(format!("Environment variable {} must be set", TOKEN_ENV))
        })?;
        let repo_id = non_empty(REPO_ID_ENV).ok_or_else(|| {
            PusherError::Config(format!("Environment variable {} must be set", REPO_ID_ENV))
        })?;

        let mode = match (&args.image, &args.local_file) {
            (Some(image), None) => OperationMode::ImageExport {
                image: image.clone(),
            },
            (None, Some(path)) => OperationMode::LocalFile { path: path.clone() },
            (Some(_), Some(_)) => {
                return Err(PusherError::Config(
                    "Give either an image or --local-file, not both".to_string(),
                ));
            }
            (None, None) => {
                return Err(PusherError::Config(
                    "An image or --local-file <PATH> is required".to_string(),
                ));
            }
        };

        let endpoint = args
            .endpoint
            .clone()
            .or_else(|| non_empty(ENDPOINT_ENV))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let docker = args
            .docker
            .clone()
            .or_else(|| non_empty(DOCKER_ENV))
            .unwrap_or_else(|| "docker".to_string());

        let config = Self {
            token,
            repo_id: repo_id.trim().to_string(),
            repo_type: args.repo_type.parse()?,
            revision: args.revision.clone(),
            endpoint,
            docker,
            mode,
            path_in_repo: args.path_in_repo.clone(),
            commit_message: args.commit_message.clone(),
            commit_description: args.commit_description.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(PusherError::Config("Access token cannot be empty".to_string()));
        }

        let mut parts = self.repo_id.split('/');
        let valid_repo_id = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !valid_repo_id {
            return Err(PusherError::Config(format!(
                "Repository id must look like <owner>/<name>, got '{}'",
                self.repo_id
            )));
        }

        if self.revision.trim().is_empty() {
            return Err(PusherError::Config("Revision cannot be empty".to_string()));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(PusherError::Config(format!(
                "Invalid hub endpoint: {}. Must start with http:// or https://",
                self.endpoint
            )));
        }

        if let Some(path) = &self.path_in_repo {
            if path.trim().is_empty() || path.starts_with('/') {
                return Err(PusherError::Config(format!(
                    "Invalid destination path in repository: '{}'",
                    path
                )));
            }
        }

        self.mode.validate()
    }

    /// Target for an exported image
    pub fn image_target(&self, image: &str) -> UploadTarget {
        self.target(
            self.path_in_repo
                .clone()
                .unwrap_or_else(|| image_archive_name(image)),
            IMAGE_COMMIT_MESSAGE,
            IMAGE_COMMIT_DESCRIPTION,
        )
    }

    /// Target for a local file; the destination is always the file's base name
    pub fn local_target(&self, file_name: &str) -> UploadTarget {
        self.target(
            file_name.to_string(),
            LOCAL_COMMIT_MESSAGE,
            LOCAL_COMMIT_DESCRIPTION,
        )
    }

    fn target(&self, path_in_repo: String, message: &str, description: &str) -> UploadTarget {
        UploadTarget {
            repo_id: self.repo_id.clone(),
            repo_type: self.repo_type,
            revision: self.revision.clone(),
            path_in_repo,
            commit_message: self
                .commit_message
                .clone()
                .unwrap_or_else(|| message.to_string()),
            commit_description: self
                .commit_description
                .clone()
                .unwrap_or_else(|| description.to_string()),
        }
    }
}
