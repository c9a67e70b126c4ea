/// Status value reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Queued,
    Running,
    Done,
    /// Anything else is a terminal failure.
    Other(String),
}

impl BackendStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => BackendStatus::Queued,
            "running" => BackendStatus::Running,
            "done" => BackendStatus::Done,
            other => BackendStatus::Other(other.to_string()),
        }
    }

    /// Whether polling should continue.
    pub fn is_active(&self) -> bool {
        matches!(self, BackendStatus::Queued | BackendStatus::Running)
    }
}

/// One poll response. `logs` and `artifacts` are cumulative snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusReport {
    pub status: String,
    pub message: Option<String>,
    pub logs: Vec<String>,
    pub artifacts: Vec<String>,
    pub video_url: Option<String>,
    pub video_path: Option<String>,
    pub output_dir: Option<String>,
}

impl StatusReport {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Self::default()
        }
    }

    pub fn backend_status(&self) -> BackendStatus {
        BackendStatus::parse(&self.status)
    }

    pub fn message(&self) -> Option<&str> {
        non_blank(&self.message)
    }

    pub fn video_url(&self) -> Option<&str> {
        non_blank(&self.video_url)
    }

    pub fn video_path(&self) -> Option<&str> {
        non_blank(&self.video_path)
    }

    pub fn output_dir(&self) -> Option<&str> {
        non_blank(&self.output_dir)
    }
}

// The backend initialises optional fields to "" rather than omitting them.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
