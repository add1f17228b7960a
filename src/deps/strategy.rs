// Tue Jan 15 2026 - Alex

use crate::config::ExecutionMode;
use crate::deps::task::CheckoutTask;
use crate::deps::SyncError;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::io::Write;

/// The per-dependency function a strategy dispatches.
pub type Job<'a> = dyn Fn(&CheckoutTask) -> Result<(), SyncError> + Sync + 'a;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub index: usize,
    pub label: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<TaskFailure>,
}

impl SyncReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record(&mut self, index: usize, task: &CheckoutTask, result: Result<(), SyncError>) {
        match result {
            Ok(()) => self.succeeded += 1,
            Err(e) => self.failures.push(TaskFailure {
                index,
                label: task.label.clone(),
                message: e.to_string(),
            }),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// A single aggregate error if any task failed.
    pub fn into_result(self) -> Result<Self, SyncError> {
        if self.all_succeeded() {
            Ok(self)
        } else {
            Err(SyncError::TasksFailed {
                failed: self.failed(),
                total: self.total,
            })
        }
    }
}

/// Dispatches checkout tasks. Every task is attempted; failures are collected, not raised.
pub trait ExecutionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn execute(&self, tasks: &[CheckoutTask], job: &Job<'_>) -> Result<SyncReport, SyncError>;
}

pub fn strategy_for(mode: ExecutionMode, show_progress: bool) -> Box<dyn ExecutionStrategy> {
    match mode {
        ExecutionMode::Serial => Box::new(SerialStrategy::new()),
        ExecutionMode::Parallel => Box::new(ParallelStrategy::new().with_progress(show_progress)),
    }
}

/// Runs tasks one after another on the calling thread.
pub struct SerialStrategy {
    out: Mutex<Box<dyn Write + Send>>,
}

impl SerialStrategy {
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self { out: Mutex::new(out) }
    }

    fn say(&self, line: &str) {
        let mut out = self.out.lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

impl Default for SerialStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionStrategy for SerialStrategy {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn execute(&self, tasks: &[CheckoutTask], job: &Job<'_>) -> Result<SyncReport, SyncError> {
        let total = tasks.len();
        self.say("Running git-sync-deps in SERIAL mode to avoid 429 rate limits...");
        self.say(&format!("Syncing {} dependencies one at a time...", total));

        let mut report = SyncReport::new(total);
        for (index, task) in tasks.iter().enumerate() {
            self.say(&format!("  [{}/{}] {}", index + 1, total, task.directory.display()));

            let result = job(task);
            if let Err(e) = &result {
                self.say(&format!("Error: {}", e));
                log::error!("{} failed: {}", task.label, e);
            }
            report.record(index, task, result);
        }
        Ok(report)
    }
}

/// Fans tasks out to a pool with one worker per task (or `max_workers`).
pub struct ParallelStrategy {
    max_workers: Option<usize>,
    show_progress: bool,
}

impl ParallelStrategy {
    pub fn new() -> Self {
        Self {
            max_workers: None,
            show_progress: false,
        }
    }

    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress || !atty::is(atty::Stream::Stdout) {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let pb = ProgressBar::new(len as u64);
        pb.set_style(style);
        pb
    }
}

impl Default for ParallelStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionStrategy for ParallelStrategy {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn execute(&self, tasks: &[CheckoutTask], job: &Job<'_>) -> Result<SyncReport, SyncError> {
        let total = tasks.len();
        if total == 0 {
            return Ok(SyncReport::new(0));
        }

        let workers = self.max_workers.unwrap_or(total).clamp(1, total);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("sync-worker-{}", i))
            .build()
            .map_err(|e| SyncError::Pool(e.to_string()))?;

        let progress = self.progress_bar(total);
        let report = Mutex::new(SyncReport::new(total));

        pool.install(|| {
            tasks.par_iter().enumerate().for_each(|(index, task)| {
                progress.set_message(task.label.clone());
                let result = job(task);
                if let Err(e) = &result {
                    log::error!("{} failed: {}", task.label, e);
                }
                report.lock().record(index, task, result);
                progress.inc(1);
            });
        });
        progress.finish_and_clear();

        let mut report = report.into_inner();
        report.failures.sort_by_key(|f| f.index);
        Ok(report)
    }
}
