//! `docker save` subprocess feeding the upload stream

use crate::error::{PusherError, Result};
use std::io;
use std::process::Stdio;
use tokio::io::BufReader;
use tokio::process::{Child, ChildStdout, Command};

/// Read buffer on the export pipe; large reads keep syscall counts down on
/// multi-gigabyte archives.
pub const EXPORT_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// A running `docker save` whose stdout is the upload payload.
///
/// The export is killed if dropped without [`ImageExport::finish`] or
/// [`ImageExport::kill`], so an abandoned run never leaves it behind.
#[derive(Debug)]
pub struct ImageExport {
    child: Child,
    stdout: BufReader<ChildStdout>,
}

impl ImageExport {
    pub fn spawn(docker: &str, image: &str) -> Result<Self> {
        let mut child = Command::new(docker)
            .arg("save")
            .arg(image)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PusherError::Spawn {
                program: docker.to_string(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("export stdout was not captured"))?;

        Ok(Self {
            child,
            stdout: BufReader::with_capacity(EXPORT_BUFFER_SIZE, stdout),
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// The tar stream produced by the export
    pub fn stdout(&mut self) -> &mut BufReader<ChildStdout> {
        &mut self.stdout
    }

    /// Terminate the export and reap it.
    pub async fn kill(mut self) -> Result<()> {
        self.child.kill().await?;
        Ok(())
    }

    /// Close the pipe, wait for the export to exit, and check its status.
    ///
    /// Call only after the stream has been read to the end; a signal death
    /// reports exit code 1.
    pub async fn finish(self) -> Result<()> {
        let Self { mut child, stdout } = self;
        drop(stdout);

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(PusherError::ExportFailed {
                code: status.code().filter(|&c| c != 0).unwrap_or(1),
            })
        }
    }
}
