//! Explainer core: pure job lifecycle state machine and view-model helpers.
mod effect;
mod logs;
mod msg;
mod report;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use logs::{LogAggregator, LogLine, LogSource, MergeOutcome, MAX_LOG_LINES};
pub use msg::Msg;
pub use report::{BackendStatus, StatusReport};
pub use state::{AppState, Clock, GenerationOptions, Job, JobId, PdfSelection, Status};
pub use update::update;
pub use view_model::{
    pdf_summary, preview, status_class, status_label, AppViewModel, LogRow, Preview,
    ARTIFACTS_SHOWN, PREVIEW_PLACEHOLDER,
};
