use crate::{GenerationOptions, JobId, PdfSelection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the PDF and credential. The result comes back tagged with `attempt`.
    SubmitJob {
        attempt: u64,
        pdf: PdfSelection,
        api_key: String,
        options: GenerationOptions,
    },
    /// Fetch the job status right away.
    PollNow { job_id: JobId },
    /// Fetch the job status after the poll interval, replacing any pending poll.
    SchedulePoll { job_id: JobId },
    /// Drop any pending poll.
    CancelPoll,
}
