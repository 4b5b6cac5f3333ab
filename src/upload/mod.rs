//! Upload module: the counting stream adapter and its progress sinks

pub mod progress;
pub mod reader;

pub use progress::{ConsoleProgress, NoProgress, ProgressSink};
pub use reader::ProgressReader;

use crate::logging::Logger;

/// Pick the sink matching the logger's mode.
pub fn progress_sink(
    total: Option<u64>,
    output: &Logger,
    operation_name: &str,
) -> Box<dyn ProgressSink> {
    if output.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ConsoleProgress::new(total, output.clone(), operation_name))
    }
}
