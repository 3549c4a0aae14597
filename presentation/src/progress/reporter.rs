//! Progress reporting while waiting for the tutor

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use tutor_application::ports::progress::{RetryEvent, RetryNotifier};
use tutor_domain::RetryCause;

/// Text shown for a retry about to happen
pub fn retry_message(event: &RetryEvent) -> String {
    match event.cause {
        RetryCause::EmptyResponse => "No response from the model. Retrying...".to_string(),
        RetryCause::TransientUnavailable => format!(
            "Service Unavailable. Retrying in {} seconds... (Attempt {}/{})",
            event.delay.as_secs(),
            event.attempt,
            event.max_attempts
        ),
    }
}

const GIVE_UP_MESSAGE: &str = "Max retries reached. Please try again later.";

/// Spinner while a request is in flight, with retry notices printed above it
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn print(&self, line: String) {
        match self.spinner.lock().ok().as_deref().and_then(Option::as_ref) {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryNotifier for ProgressReporter {
    fn on_request_start(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message("Thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn on_retry(&self, event: &RetryEvent) {
        self.print(retry_message(event).yellow().to_string());
    }

    fn on_give_up(&self, _cause: RetryCause, _attempts: u32) {
        self.print(GIVE_UP_MESSAGE.red().to_string());
    }

    fn on_request_end(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no spinner)
pub struct SimpleProgress;

impl RetryNotifier for SimpleProgress {
    fn on_retry(&self, event: &RetryEvent) {
        println!("{}", retry_message(event));
    }

    fn on_give_up(&self, _cause: RetryCause, _attempts: u32) {
        println!("{}", GIVE_UP_MESSAGE);
    }
}
