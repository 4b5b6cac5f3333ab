//! Upload driver: one login, one streamed upload, then reconciliation

use crate::cli::config::Config;
use crate::cli::operation_mode::OperationMode;
use crate::error::Result;
use crate::hub::{HubApi, UploadTarget};
use crate::logging::Logger;
use crate::pipeline::{ImageExport, LocalFile, probe_image_size};
use crate::upload::{ProgressReader, progress_sink};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

/// Progress of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Authenticated,
    SourceOpened,
    Uploading,
    Uploaded,
    /// Export exit status checked; image mode only
    SourceVerified,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Start => "start",
            RunState::Authenticated => "authenticated",
            RunState::SourceOpened => "source opened",
            RunState::Uploading => "uploading",
            RunState::Uploaded => "uploaded",
            RunState::SourceVerified => "source verified",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub target: UploadTarget,
    pub bytes: u64,
    pub expected_bytes: Option<u64>,
    pub elapsed: Duration,
}

pub struct Runner<H> {
    config: Config,
    hub: H,
    output: Logger,
    state: RunState,
}

impl<H: HubApi> Runner<H> {
    pub fn new(config: Config, hub: H, output: Logger) -> Self {
        Self {
            config,
            hub,
            output,
            state: RunState::Start,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn hub(&self) -> &H {
        &self.hub
    }

    fn enter(&mut self, state: RunState) {
        self.output
            .detail(&format!("State: {} -> {}", self.state, state));
        self.state = state;
    }

    pub async fn run(&mut self) -> Result<UploadReport> {
        match self.run_inner().await {
            Ok(report) => {
                self.enter(RunState::Done);
                Ok(report)
            }
            Err(e) => {
                self.enter(RunState::Failed);
                Err(e)
            }
        }
    }

    async fn run_inner(&mut self) -> Result<UploadReport> {
        self.output.section("ModelScope Upload");
        self.output.info(self.config.mode.description());
        self.output.info(&format!(
            "Repository: {} ({})",
            self.config.repo_id, self.config.repo_type
        ));

        self.output.step("Logging in to ModelScope");
        self.hub.login(&self.config.token).await?;
        self.enter(RunState::Authenticated);

        match self.config.mode.clone() {
            OperationMode::ImageExport { image } => self.push_image(&image).await,
            OperationMode::LocalFile { path } => self.push_local_file(&path).await,
        }
    }

    async fn push_image(&mut self, image: &str) -> Result<UploadReport> {
        let start = Instant::now();
        let docker = self.config.docker.clone();

        let size = probe_image_size(&docker, image, &self.output).await;
        match size {
            Some(size) => self
                .output
                .info(&format!("Image size: {}", self.output.format_size(size))),
            None => self.output.info("Image size unknown"),
        }

        self.output
            .step(&format!("Starting {} save for {}", docker, image));
        let mut export = ImageExport::spawn(&docker, image)?;
        if let Some(pid) = export.id() {
            self.output.detail(&format!("Export process pid {}", pid));
        }
        self.enter(RunState::SourceOpened);

        let target = self.config.image_target(image);
        self.output.step(&format!(
            "Uploading stream to {} as {}",
            target.repo_id, target.path_in_repo
        ));

        let sink = progress_sink(size, &self.output, "Uploading");
        let mut reader = ProgressReader::new(export.stdout(), size, sink);
        self.enter(RunState::Uploading);
        // The probed size describes the image, not the archive, so the body
        // is sent without a length.
        let result = self.hub.upload(&mut reader, None, &target).await;
        reader.close();
        let bytes = reader.transferred();

        if let Err(e) = result {
            self.output.warning("Upload failed, stopping image export");
            if let Err(kill_error) = export.kill().await {
                self.output
                    .warning(&format!("Could not stop image export: {}", kill_error));
            }
            return Err(e);
        }
        self.enter(RunState::Uploaded);

        // Only trusted once the stream has been drained by the upload.
        export.finish().await?;
        self.enter(RunState::SourceVerified);

        self.report(target, bytes, size, start)
    }

    async fn push_local_file(&mut self, path: &Path) -> Result<UploadReport> {
        let start = Instant::now();

        let mut file = LocalFile::open(path).await?;
        let size = file.size();
        self.output.info(&format!(
            "Local file: {} ({})",
            file.path().display(),
            self.output.format_size(size)
        ));
        self.enter(RunState::SourceOpened);

        let target = self.config.local_target(file.file_name());
        self.output.step(&format!(
            "Uploading {} to {}",
            target.path_in_repo, target.repo_id
        ));

        let sink = progress_sink(Some(size), &self.output, "Uploading");
        let mut reader = ProgressReader::new(file.reader(), Some(size), sink);
        self.enter(RunState::Uploading);
        let result = self.hub.upload(&mut reader, Some(size), &target).await;
        reader.close();
        let bytes = reader.transferred();
        result?;
        self.enter(RunState::Uploaded);

        self.report(target, bytes, Some(size), start)
    }

    fn report(
        &self,
        target: UploadTarget,
        bytes: u64,
        expected_bytes: Option<u64>,
        start: Instant,
    ) -> Result<UploadReport> {
        let elapsed = start.elapsed();
        self.output.success("Upload completed successfully.");
        self.output.summary_kv(
            "Upload summary",
            &[
                ("Repository", target.repo_id.clone()),
                ("Path", target.path_in_repo.clone()),
                ("Transferred", self.output.format_size(bytes)),
                ("Duration", self.output.format_duration(elapsed)),
            ],
        );

        Ok(UploadReport {
            target,
            bytes,
            expected_bytes,
            elapsed,
        })
    }
}
