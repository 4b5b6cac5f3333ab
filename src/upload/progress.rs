//! Progress sinks for streamed uploads

use crate::logging::Logger;
use std::time::{Duration, Instant};

/// Receives byte deltas from a [`ProgressReader`](super::ProgressReader).
pub trait ProgressSink: Send {
    /// Called once per non-empty chunk with the chunk length.
    fn advance(&mut self, delta: u64);

    /// Stop rendering. Called at most once.
    fn finish(&mut self);
}

impl<S: ProgressSink + ?Sized> ProgressSink for Box<S> {
    fn advance(&mut self, delta: u64) {
        (**self).advance(delta);
    }

    fn finish(&mut self) {
        (**self).finish();
    }
}

/// Discards all progress. Used in quiet mode.
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&mut self, _delta: u64) {}

    fn finish(&mut self) {}
}

/// Renders transferred/total on a single console line.
///
/// With an unknown total the line degrades to transferred bytes and speed.
/// Redraws are throttled to every 500ms or 5% of the total, whichever comes
/// first, so a multi-gigabyte stream does not flood the terminal.
pub struct ConsoleProgress {
    total: Option<u64>,
    transferred: u64,
    start_time: Instant,
    last_update: Instant,
    last_rendered: u64,
    output: Logger,
    operation_name: String,
}

impl ConsoleProgress {
    const REDRAW_INTERVAL: Duration = Duration::from_millis(500);

    pub fn new(total: Option<u64>, output: Logger, operation_name: impl Into<String>) -> Self {
        let now = Instant::now();
        Self {
            total,
            transferred: 0,
            start_time: now,
            last_update: now,
            last_rendered: 0,
            output,
            operation_name: operation_name.into(),
        }
    }

    fn should_render(&self, now: Instant) -> bool {
        if now.duration_since(self.last_update) >= Self::REDRAW_INTERVAL {
            return true;
        }
        match self.total {
            Some(total) if total > 0 => {
                let step = (total / 20).max(1);
                let reached_end = self.transferred >= total && self.last_rendered < total;
                self.transferred - self.last_rendered >= step || reached_end
            }
            _ => false,
        }
    }

    fn speed(&self) -> u64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            (self.transferred as f64 / elapsed) as u64
        } else {
            0
        }
    }

    fn render(&self) {
        let line = match self.total {
            Some(total) if total > 0 => {
                let percent = (self.transferred as f64 / total as f64 * 100.0).min(100.0);
                format!(
                    "{}: {:.1}% ({}/{}) - {}",
                    self.operation_name,
                    percent,
                    self.output.format_size(self.transferred),
                    self.output.format_size(total),
                    self.output.format_speed(self.speed())
                )
            }
            _ => format!(
                "{}: {} - {}",
                self.operation_name,
                self.output.format_size(self.transferred),
                self.output.format_speed(self.speed())
            ),
        };
        self.output.progress_line(&line);
    }
}

impl ProgressSink for ConsoleProgress {
    fn advance(&mut self, delta: u64) {
        self.transferred += delta;
        let now = Instant::now();
        if self.should_render(now) {
            self.render();
            self.last_update = now;
            self.last_rendered = self.transferred;
        }
    }

    fn finish(&mut self) {
        self.render();
        self.output.progress_done();

        let total_elapsed = self.start_time.elapsed();
        self.output.detail(&format!(
            "{} streamed {} in {} (avg speed: {})",
            self.operation_name,
            self.output.format_size(self.transferred),
            self.output.format_duration(total_elapsed),
            self.output.format_speed(self.speed())
        ));
    }
}
