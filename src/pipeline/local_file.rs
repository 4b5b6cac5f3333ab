//! Local file opened as an upload payload

use crate::error::{PusherError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// A local file held open for the duration of one upload.
///
/// The handle is closed when this value drops, on success and failure alike.
#[derive(Debug)]
pub struct LocalFile {
    file: File,
    path: PathBuf,
    size: u64,
    file_name: String,
}

impl LocalFile {
    pub async fn open(path: &Path) -> Result<Self> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PusherError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(PusherError::Config(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                PusherError::Config(format!("{} has no usable file name", path.display()))
            })?
            .to_string();

        let file = File::open(path).await?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            size: metadata.len(),
            file_name,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size from filesystem metadata
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Base name used as the destination path in the repository
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn reader(&mut self) -> &mut File {
        &mut self.file
    }
}
