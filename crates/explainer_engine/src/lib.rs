//! Explainer engine: backend HTTP client, poll scheduling and effect execution.
mod backend;
mod engine;
mod scheduler;
mod settings;
mod types;

pub use backend::{Backend, ReqwestBackend};
pub use engine::{EngineHandle, EngineStopped};
pub use scheduler::PollScheduler;
pub use settings::{BackendSettings, SettingsError, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL};
pub use types::{
    BackendError, EngineEvent, FailureKind, GenerateResponse, StatusResponse, SubmitRequest,
};
