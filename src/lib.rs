//! ModelScope Image Pusher Library
//!
//! Streams a `docker save` export or a local file into a ModelScope
//! repository through a single upload call, reporting progress on the way.

pub mod cli;
pub mod error;
pub mod hub;
pub mod logging;
pub mod pipeline;
pub mod upload;

pub use cli::{Config, Runner, UploadReport};
pub use error::{PusherError, Result};
pub use hub::{HubApi, HubClient, UploadTarget};
pub use logging::Logger;

/// Run one upload against the live hub.
pub async fn run(config: Config, output: Logger) -> Result<UploadReport> {
    let hub = HubClient::new(&config.endpoint, output.clone())?;
    Runner::new(config, hub, output).run().await
}
