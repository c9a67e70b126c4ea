use crate::{GenerationOptions, JobId, PdfSelection, StatusReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the API key field.
    ApiKeyChanged(String),
    /// User picked a PDF, or cleared the selection.
    PdfSelected(Option<PdfSelection>),
    /// User changed the optional generation settings.
    OptionsChanged(GenerationOptions),
    /// User asked to generate from the selected PDF.
    SubmitClicked,
    /// Backend accepted submission `attempt` and assigned a job id.
    SubmitAccepted { attempt: u64, job_id: JobId },
    /// Submission `attempt` failed before a job id was assigned.
    SubmitFailed { attempt: u64, message: String },
    /// A poll cycle returned a status report.
    StatusReceived { job_id: JobId, report: StatusReport },
    /// A poll cycle failed to fetch or decode the status.
    StatusFailed { job_id: JobId, message: String },
    /// The consumer is going away; stop all polling.
    Teardown,
    /// No engine event arrived within the wait; nothing to apply.
    Tick,
}
