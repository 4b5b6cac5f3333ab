//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "modelscope-image-pusher")]
#[command(about = "Stream a local Docker image or file into a ModelScope repository")]
#[command(version)]
pub struct Args {
    /// Local Docker image to export and upload
    #[arg(value_name = "IMAGE", conflicts_with = "local_file")]
    pub image: Option<String>,

    /// Upload a local file instead of exporting an image
    #[arg(long = "local-file", value_name = "PATH")]
    pub local_file: Option<PathBuf>,

    /// Destination file name in the repository (image mode)
    #[arg(
        long = "path-in-repo",
        help = "Destination file name in the repository; defaults to <image name>.tar"
    )]
    pub path_in_repo: Option<String>,

    /// Commit message for the upload
    #[arg(long = "commit-message")]
    pub commit_message: Option<String>,

    /// Commit description for the upload
    #[arg(long = "commit-description")]
    pub commit_description: Option<String>,

    /// Repository type
    #[arg(
        long = "repo-type",
        default_value = "model",
        help = "Repository type: model, dataset"
    )]
    pub repo_type: String,

    /// Branch to commit to
    #[arg(long = "revision", default_value = "master")]
    pub revision: String,

    /// Hub endpoint
    #[arg(
        long = "endpoint",
        help = "Hub endpoint URL (default: $MODELSCOPE_DOMAIN or https://www.modelscope.cn)"
    )]
    pub endpoint: Option<String>,

    /// Docker executable
    #[arg(long = "docker", help = "Docker executable (default: $DOCKER_BIN or docker)")]
    pub docker: Option<String>,

    /// Verbose output
    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    /// Quiet output
    #[arg(
        long = "quiet",
        short = 'q',
        conflicts_with = "verbose",
        help = "Only print errors"
    )]
    pub quiet: bool,
}

impl Args {
    /// Print usage examples
    pub fn print_examples() {
        eprintln!("Usage: modelscope-image-pusher <IMAGE>");
        eprintln!("       modelscope-image-pusher --local-file <PATH>");
        eprintln!();
        eprintln!("Environment variables MODELSCOPE_TOKEN and MODELSCOPE_REPO_ID must be set.");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  # Stream an image built locally");
        eprintln!("  modelscope-image-pusher whisperlivekit:latest");
        eprintln!();
        eprintln!("  # Upload an existing archive");
        eprintln!("  modelscope-image-pusher --local-file ./whisperlivekit.tar");
    }
}
