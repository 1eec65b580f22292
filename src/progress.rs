//! Progress display while waiting on network sources
//!
//! Draws an indicatif spinner on stderr for as long as a future is pending.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::future::Future;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Spinner reporter for fetches of unknown duration
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    /// Whether spinners are drawn (off in quiet and JSON modes)
    enabled: bool,
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Await `future`, showing `message` next to a spinner until it resolves
    pub async fn while_pending<F: Future>(&self, message: &str, future: F) -> F::Output {
        let spinner = self.spinner(message);
        let output = future.await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        output
    }

    fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars(TICK_CHARS)
                .template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .expect("Invalid template"),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    }
}
