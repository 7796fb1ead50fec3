//! Spinner with elapsed time for long-running operations
//!
//! Sessions can run for an hour, so the spinner shows elapsed time to make
//! it clear the process is still alive. In quiet mode (or without a TTY)
//! the spinner is a no-op.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_MILLIS: u64 = 120;

/// Terminal spinner that disables itself in quiet mode
pub struct CommandSpinner {
    bar: Option<ProgressBar>,
}

impl CommandSpinner {
    /// Create a spinner unless quiet mode is active or stderr is not a TTY
    pub fn new_maybe(message: &str, quiet: bool) -> Self {
        if quiet || !console::user_attended_stderr() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(TICK_MILLIS));
        Self { bar: Some(bar) }
    }

    /// Replace the spinner message
    pub fn update(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Finish the spinner with a success mark
    pub fn success(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!("{} {message}", console::style("\u{2713}").green()));
        }
    }

    /// Finish the spinner with a failure mark
    pub fn fail(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!("{} {message}", console::style("\u{2717}").red()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_mode_has_no_bar() {
        let spinner = CommandSpinner::new_maybe("working...", true);
        assert!(spinner.bar.is_none());
        // All operations are no-ops without a bar
        spinner.update("still working...");
        spinner.success("done");
        spinner.fail("failed");
    }
}
