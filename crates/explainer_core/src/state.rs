use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::logs::{LogAggregator, MergeOutcome};
use crate::report::StatusReport;
use crate::view_model::{self, AppViewModel, LogRow};

/// Local job status as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Running,
    Error,
    Done,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Error | Status::Done)
    }
}

/// Opaque, server-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The single job tracked by the client. Outputs are sticky: once the backend
/// reports one it stays until the next submission resets the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub status: Status,
    pub message: String,
    pub video_url: Option<String>,
    pub video_path: Option<String>,
    pub output_dir: Option<String>,
}

impl Job {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            status: Status::Running,
            message: String::new(),
            video_url: None,
            video_path: None,
            output_dir: None,
        }
    }
}

/// PDF chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfSelection {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

/// Optional generation parameters forwarded with the submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationOptions {
    pub use_rag: bool,
    pub model: Option<String>,
    pub helper_model: Option<String>,
}

/// Source of timestamps for log lines.
///
/// Clones share the same function, and two clocks compare equal only when
/// they share it.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> String + Send + Sync>);

impl Clock {
    pub fn new(now: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(now))
    }

    /// Local wall-clock time formatted as `HH:MM:SS`.
    pub fn system() -> Self {
        Self::new(|| chrono::Local::now().format("%H:%M:%S").to_string())
    }

    pub fn fixed(timestamp: impl Into<String>) -> Self {
        let timestamp = timestamp.into();
        Self::new(move || timestamp.clone())
    }

    pub fn now(&self) -> String {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl PartialEq for Clock {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Clock {}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Clock(..)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Phase {
    /// Nothing in flight.
    #[default]
    Settled,
    /// A submission with this attempt number is in flight.
    Submitting(u64),
    /// A poll for the tracked job is outstanding.
    Polling,
}

pub(crate) const INITIAL_STATUS_MESSAGE: &str = "Idle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    api_key: String,
    pdf: Option<PdfSelection>,
    options: GenerationOptions,
    status: Status,
    status_message: String,
    job: Option<Job>,
    artifacts: Vec<String>,
    logs: LogAggregator,
    phase: Phase,
    attempts: u64,
    clock: Clock,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_clock(Clock::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            api_key: String::new(),
            pdf: None,
            options: GenerationOptions::default(),
            status: Status::Idle,
            status_message: INITIAL_STATUS_MESSAGE.to_string(),
            job: None,
            artifacts: Vec::new(),
            logs: LogAggregator::new(),
            phase: Phase::Settled,
            attempts: 0,
            clock,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let skip = self.artifacts.len().saturating_sub(view_model::ARTIFACTS_SHOWN);
        AppViewModel {
            status: self.status,
            status_label: view_model::status_label(self.status),
            status_class: view_model::status_class(self.status),
            status_message: self.status_message.clone(),
            job_id: self.job.as_ref().map(|job| job.id.clone()),
            pdf_summary: view_model::pdf_summary(self.pdf.as_ref()),
            preview: view_model::preview(self.job.as_ref()),
            artifacts: self.artifacts[skip..].to_vec(),
            artifact_count: self.artifacts.len(),
            logs: self.logs.combined().into_iter().map(LogRow::from).collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn artifacts(&self) -> &[String] {
        &self.artifacts
    }

    pub fn logs(&self) -> &LogAggregator {
        &self.logs
    }

    /// True while a submission or a poll is outstanding.
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Settled
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn pdf(&self) -> Option<&PdfSelection> {
        self.pdf.as_ref()
    }

    pub(crate) fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub(crate) fn set_api_key(&mut self, api_key: String) {
        if self.api_key != api_key {
            self.api_key = api_key;
            self.dirty = true;
        }
    }

    pub(crate) fn set_pdf(&mut self, pdf: Option<PdfSelection>) {
        if self.pdf != pdf {
            self.pdf = pdf;
            self.dirty = true;
        }
    }

    pub(crate) fn set_options(&mut self, options: GenerationOptions) {
        if self.options != options {
            self.options = options;
            self.dirty = true;
        }
    }

    /// Sets the displayed status, mirroring it onto the tracked job.
    pub(crate) fn set_status(&mut self, status: Status, message: impl Into<String>) {
        let message = message.into();
        if let Some(job) = self.job.as_mut() {
            job.status = status;
            job.message = message.clone();
        }
        self.set_display_status(status, message);
    }

    /// Sets the displayed status only. The tracked job keeps what the backend
    /// last reported.
    pub(crate) fn set_display_status(&mut self, status: Status, message: impl Into<String>) {
        self.status = status;
        self.status_message = message.into();
        self.dirty = true;
    }

    pub(crate) fn log_client(&mut self, text: impl Into<String>) {
        let timestamp = self.clock.now();
        self.logs.push_client(timestamp, text);
        self.dirty = true;
    }

    pub(crate) fn merge_generator_logs(&mut self, snapshot: &[String]) -> MergeOutcome {
        let timestamp = self.clock.now();
        let outcome = self.logs.merge_generator(snapshot, &timestamp);
        if outcome.appended() > 0 {
            self.dirty = true;
        }
        outcome
    }

    pub(crate) fn replace_artifacts(&mut self, artifacts: Vec<String>) {
        if self.artifacts != artifacts {
            self.artifacts = artifacts;
            self.dirty = true;
        }
    }

    /// Clears everything left over from a previous job and opens a new
    /// submission attempt.
    pub(crate) fn begin_submission(&mut self) -> u64 {
        self.attempts += 1;
        self.phase = Phase::Submitting(self.attempts);
        self.job = None;
        self.artifacts.clear();
        self.logs.clear();
        self.dirty = true;
        self.attempts
    }

    pub(crate) fn is_current_attempt(&self, attempt: u64) -> bool {
        self.phase == Phase::Submitting(attempt)
    }

    pub(crate) fn accept_job(&mut self, job_id: JobId) {
        self.job = Some(Job::new(job_id));
        self.phase = Phase::Polling;
        self.dirty = true;
    }

    pub(crate) fn is_polling(&self, job_id: &JobId) -> bool {
        self.phase == Phase::Polling && self.job.as_ref().is_some_and(|job| &job.id == job_id)
    }

    pub(crate) fn settle(&mut self) {
        self.phase = Phase::Settled;
    }

    /// Records any outputs the backend reported. Blank values are ignored.
    pub(crate) fn record_outputs(&mut self, report: &StatusReport) {
        let Some(job) = self.job.as_mut() else {
            return;
        };
        let changed = remember(&mut job.video_url, report.video_url())
            | remember(&mut job.video_path, report.video_path())
            | remember(&mut job.output_dir, report.output_dir());
        if changed {
            self.dirty = true;
        }
    }
}

fn remember(slot: &mut Option<String>, reported: Option<&str>) -> bool {
    match reported {
        Some(value) if slot.as_deref() != Some(value) => {
            *slot = Some(value.to_string());
            true
        }
        _ => false,
    }
}
