//! Installation jobs and the queue that runs them.
//!
//! A job is one side-effecting step. Modules build jobs from the choices the
//! user made; the queue runs them strictly in order against a single
//! `GlobalStorage`, stopping at the first failure.

use crate::global_storage::GlobalStorage;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Why a job failed: a short message plus optional details for the log view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct JobError {
    pub message: String,
    pub details: String,
}

impl JobError {
    pub fn new(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: details.into(),
        }
    }
}

impl From<crate::error::SetupError> for JobError {
    fn from(err: crate::error::SetupError) -> Self {
        Self::new("Internal error", err.to_string())
    }
}

pub type JobResult = Result<(), JobError>;

/// One installation step.
pub trait Job {
    /// Short title, e.g. "Set partition information".
    fn pretty_name(&self) -> String;

    /// Longer text shown on the summary page before anything runs.
    fn pretty_description(&self) -> String {
        String::new()
    }

    /// Shown while the job runs.
    fn pretty_status_message(&self) -> String {
        self.pretty_name()
    }

    fn exec(&self, storage: &mut GlobalStorage) -> JobResult;
}

impl fmt::Debug for dyn Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("name", &self.pretty_name()).finish()
    }
}

/// Outcome of `JobQueue::run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueReport {
    /// Number of jobs that finished successfully.
    pub completed: usize,
    pub total: usize,
    /// Index and error of the job that stopped the queue.
    pub failure: Option<(usize, JobError)>,
}

impl QueueReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

type ProgressFn<'a> = Box<dyn FnMut(usize, usize, &str) + 'a>;

/// Runs jobs sequentially; one job at a time touches the storage.
#[derive(Default)]
pub struct JobQueue<'a> {
    jobs: Vec<Box<dyn Job + 'a>>,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> JobQueue<'a> {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            progress: None,
        }
    }

    pub fn enqueue(&mut self, job: Box<dyn Job + 'a>) {
        self.jobs.push(job);
    }

    pub fn enqueue_all<I: IntoIterator<Item = Box<dyn Job + 'a>>>(&mut self, jobs: I) {
        self.jobs.extend(jobs);
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Called before each job with `(index, total, status message)`.
    pub fn on_progress(&mut self, f: impl FnMut(usize, usize, &str) + 'a) {
        self.progress = Some(Box::new(f));
    }

    /// Descriptions of all queued jobs, skipping empty ones.
    pub fn summary(&self) -> Vec<String> {
        self.jobs
            .iter()
            .map(|j| j.pretty_description())
            .filter(|d| !d.is_empty())
            .collect()
    }

    pub fn run(&mut self, storage: &mut GlobalStorage) -> QueueReport {
        let total = self.jobs.len();
        for (index, job) in self.jobs.iter().enumerate() {
            let status = job.pretty_status_message();
            if let Some(progress) = self.progress.as_mut() {
                progress(index, total, &status);
            }
            info!(job = %job.pretty_name(), "[{}/{}] {}", index + 1, total, status);

            if let Err(err) = job.exec(storage) {
                warn!(job = %job.pretty_name(), error = %err, details = %err.details, "job failed");
                return QueueReport {
                    completed: index,
                    total,
                    failure: Some((index, err)),
                };
            }
        }
        QueueReport {
            completed: total,
            total,
            failure: None,
        }
    }
}
