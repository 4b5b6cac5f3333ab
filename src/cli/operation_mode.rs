//! The two invocation modes

use crate::error::{PusherError, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationMode {
    /// Export a local image with `docker save` and stream it
    ImageExport { image: String },

    /// Stream an existing file from disk
    LocalFile { path: PathBuf },
}

impl OperationMode {
    pub fn description(&self) -> &'static str {
        match self {
            OperationMode::ImageExport { .. } => "Stream docker image export",
            OperationMode::LocalFile { .. } => "Upload local file",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            OperationMode::ImageExport { image } => {
                if image.trim().is_empty() {
                    return Err(PusherError::Config("Image cannot be empty".to_string()));
                }
                if image.starts_with('-') {
                    return Err(PusherError::Config(format!("Invalid image name: {}", image)));
                }
            }
            OperationMode::LocalFile { path } => {
                if path.as_os_str().is_empty() {
                    return Err(PusherError::Config("Local file path cannot be empty".to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Archive name derived from an image reference.
///
/// Drops the registry/namespace, tag and digest:
/// `ghcr.io/org/whisperlivekit:latest` becomes `whisperlivekit.tar`.
pub fn image_archive_name(image: &str) -> String {
    let without_digest = image.split('@').next().unwrap_or(image);
    let name = without_digest
        .rsplit('/')
        .next()
        .unwrap_or(without_digest);
    let name = name.split(':').next().unwrap_or(name);

    if name.is_empty() {
        "image.tar".to_string()
    } else {
        format!("{}.tar", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_name_strips_registry_tag_and_digest() {
        assert_eq!(image_archive_name("whisperlivekit"), "whisperlivekit.tar");
        assert_eq!(image_archive_name("whisperlivekit:latest"), "whisperlivekit.tar");
        assert_eq!(
            image_archive_name("ghcr.io/org/whisperlivekit:v1.2"),
            "whisperlivekit.tar"
        );
        assert_eq!(
            image_archive_name("localhost:5000/app@sha256:abcdef"),
            "app.tar"
        );
        assert_eq!(image_archive_name("localhost:5000/app"), "app.tar");
        assert_eq!(image_archive_name(""), "image.tar");
    }

    #[test]
    fn blank_image_is_invalid() {
        let mode = OperationMode::ImageExport { image: "  ".into() };
        assert!(mode.validate().is_err());
        let mode = OperationMode::ImageExport { image: "--all".into() };
        assert!(mode.validate().is_err());
    }
}
