use crate::{Job, JobId, LogLine, LogSource, PdfSelection, Status};

/// Number of most recent artifacts the view lists.
pub const ARTIFACTS_SHOWN: usize = 6;

pub const PREVIEW_PLACEHOLDER: &str = "Output preview will appear here once a job finishes.";
const PREVIEW_GENERIC_DONE: &str = "Generation finished. Check backend logs for artifacts.";
const PDF_PROMPT: &str = "Select a PDF research paper or document to explain.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub status: Status,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub status_message: String,
    pub job_id: Option<JobId>,
    pub pdf_summary: String,
    pub preview: Preview,
    /// The last [`ARTIFACTS_SHOWN`] artifacts, oldest first.
    pub artifacts: Vec<String>,
    pub artifact_count: usize,
    pub logs: Vec<LogRow>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub seq: u64,
    pub source: LogSource,
    pub text: String,
}

impl From<&LogLine> for LogRow {
    fn from(line: &LogLine) -> Self {
        Self {
            seq: line.seq,
            source: line.source,
            text: line.render(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// A playable video is available.
    Video { url: String },
    Message(String),
}

pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Idle => "Idle",
        Status::Running => "Running",
        Status::Done => "Done",
        Status::Error => "Error",
    }
}

/// Style class of the status indicator.
pub fn status_class(status: Status) -> &'static str {
    match status {
        Status::Idle => "status-dot",
        Status::Running => "status-dot running",
        Status::Error => "status-dot error",
        Status::Done => "status-dot done",
    }
}

/// Preview for a job snapshot.
///
/// A playable video URL wins over a video path on disk, which wins over the
/// output directory, which wins over a generic completion note. Before
/// completion only a video URL replaces the placeholder.
pub fn preview(job: Option<&Job>) -> Preview {
    let Some(job) = job else {
        return Preview::Message(PREVIEW_PLACEHOLDER.to_string());
    };
    if let Some(url) = &job.video_url {
        return Preview::Video { url: url.clone() };
    }
    if job.status != Status::Done {
        return Preview::Message(PREVIEW_PLACEHOLDER.to_string());
    }
    let message = match (&job.video_path, &job.output_dir) {
        (Some(path), _) => format!("Video ready at: {path}"),
        (None, Some(dir)) => format!("Artifacts saved to: {dir}"),
        (None, None) => PREVIEW_GENERIC_DONE.to_string(),
    };
    Preview::Message(message)
}

pub fn pdf_summary(pdf: Option<&PdfSelection>) -> String {
    match pdf {
        Some(pdf) => format!(
            "Selected: {} ({:.2} MB)",
            pdf.file_name,
            pdf.size_bytes as f64 / 1024.0 / 1024.0
        ),
        None => PDF_PROMPT.to_string(),
    }
}
