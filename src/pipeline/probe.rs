//! Best-effort image size lookup for progress scaling

use crate::logging::Logger;
use std::process::Stdio;
use tokio::process::Command;

/// Ask docker for the image size in bytes.
///
/// Any failure yields `None`; the size is only a display hint and must never
/// stop an upload.
pub async fn probe_image_size(docker: &str, image: &str, output: &Logger) -> Option<u64> {
    let result = Command::new(docker)
        .args(["image", "inspect", "--format", "{{.Size}}", image])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await;

    let out = match result {
        Ok(out) => out,
        Err(e) => {
            output.detail(&format!("Size probe could not run {}: {}", docker, e));
            return None;
        }
    };

    if !out.status.success() {
        output.detail(&format!("Size probe exited with {}", out.status));
        return None;
    }

    let size = parse_size(&out.stdout);
    if size.is_none() {
        output.detail("Size probe returned non-numeric output");
    }
    size
}

pub fn parse_size(stdout: &[u8]) -> Option<u64> {
    std::str::from_utf8(stdout).ok()?.trim().parse().ok()
}
