use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

/// Everything needed to post one generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub pdf_path: PathBuf,
    pub file_name: String,
    pub api_key: String,
    pub use_rag: bool,
    pub model: Option<String>,
    pub helper_model: Option<String>,
}

/// Body of a successful `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub job_id: String,
}

/// Body of `GET /api/status/{jobId}`. Unknown fields are ignored and absent
/// or null lists decode as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub logs: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artifacts: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_path: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub(crate) fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Submitted {
        attempt: u64,
        result: Result<String, BackendError>,
    },
    Status {
        job_id: String,
        result: Result<StatusResponse, BackendError>,
    },
}

/// A failed exchange with the backend. `message` is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    HttpStatus(u16),
    Timeout,
    Network,
    /// The response body was not the expected JSON.
    Decode,
    /// The PDF could not be read.
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
