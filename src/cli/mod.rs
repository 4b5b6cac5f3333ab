//! Command line interface module
//!
//! Argument parsing, configuration resolution, and the [`Runner`] that drives
//! one upload from login to exit status.

pub mod args;
pub mod config;
pub mod operation_mode;
pub mod runner;

pub use args::Args;
pub use config::Config;
pub use operation_mode::OperationMode;
pub use runner::{RunState, Runner, UploadReport};
