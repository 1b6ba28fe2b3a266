//! Sequential task runner with start/stop progress indication.
//!
//! [`run_one`] returns the bare result of a single task and [`run_many`]
//! the ordered results of a batch. Tasks run strictly one after another;
//! the first failure is returned and the remaining tasks never start.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Error;

/// Start/stop progress indication around each task.
pub trait Progress {
    fn start(&mut self, label: &str);
    fn stop(&mut self, label: &str);
    /// Called instead of [`Progress::stop`] when the task failed.
    fn abort(&mut self) {}
}

/// Terminal spinner.
#[derive(Default)]
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progress for Spinner {
    fn start(&mut self, label: &str) {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
        bar.set_style(style);
        bar.set_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    fn stop(&mut self, label: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(format!("{} {}", "✓".green(), label));
        }
    }

    fn abort(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// No output at all; for non-interactive runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {
    fn start(&mut self, _label: &str) {}
    fn stop(&mut self, _label: &str) {}
}

type Work<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a>>;

/// A labelled unit of asynchronous work.
pub struct Task<'a, T, E = Error> {
    pub start: String,
    pub finish: String,
    work: Work<'a, T, E>,
}

impl<'a, T, E> Task<'a, T, E> {
    pub fn new(
        start: impl Into<String>,
        finish: impl Into<String>,
        work: impl Future<Output = Result<T, E>> + 'a,
    ) -> Self {
        Task {
            start: start.into(),
            finish: finish.into(),
            work: Box::pin(work),
        }
    }
}

/// Run a single task and return its result unwrapped.
pub async fn run_one<T, E>(progress: &mut dyn Progress, task: Task<'_, T, E>) -> Result<T, E> {
    progress.start(&task.start);
    match task.work.await {
        Ok(value) => {
            progress.stop(&task.finish);
            Ok(value)
        }
        Err(e) => {
            progress.abort();
            Err(e)
        }
    }
}

/// Run tasks in order and collect their results in execution order.
pub async fn run_many<T, E>(
    progress: &mut dyn Progress,
    tasks: Vec<Task<'_, T, E>>,
) -> Result<Vec<T>, E> {
    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        results.push(run_one(progress, task).await?);
    }
    Ok(results)
}
