use explainer_logging::{explainer_debug, explainer_info, explainer_warn};

use crate::{AppState, BackendStatus, Effect, JobId, MergeOutcome, Msg, Status, StatusReport};

const MISSING_PDF: &str = "Please select a PDF.";
const MISSING_API_KEY: &str = "API key required.";
const SUBMITTING: &str = "Submitting job to backend...";
const PROCESSING_STARTED: &str = "Processing started...";
const PROCESSING: &str = "Processing...";
const GENERATION_COMPLETE: &str = "Generation complete.";
const GENERATION_FAILED: &str = "Generation failed.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ApiKeyChanged(api_key) => {
            state.set_api_key(api_key);
            Vec::new()
        }
        Msg::PdfSelected(pdf) => {
            state.set_pdf(pdf);
            Vec::new()
        }
        Msg::OptionsChanged(options) => {
            state.set_options(options);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::SubmitAccepted { attempt, job_id } => {
            if !state.is_current_attempt(attempt) {
                explainer_debug!("Ignoring stale submission {} (job {})", attempt, job_id);
                return (state, Vec::new());
            }
            explainer_info!("Job {} accepted", job_id);
            state.accept_job(job_id.clone());
            state.log_client(format!("Job accepted by backend. Job ID: {job_id}"));
            state.set_status(Status::Running, PROCESSING_STARTED);
            vec![Effect::PollNow { job_id }]
        }
        Msg::SubmitFailed { attempt, message } => {
            if !state.is_current_attempt(attempt) {
                explainer_debug!("Ignoring stale submission failure {}", attempt);
                return (state, Vec::new());
            }
            explainer_warn!("Submission failed: {}", message);
            state.settle();
            state.set_status(Status::Error, message.clone());
            state.log_client(format!("Submission failed: {message}"));
            Vec::new()
        }
        Msg::StatusReceived { job_id, report } => {
            if !state.is_polling(&job_id) {
                explainer_debug!("Ignoring status for job {} with no poll outstanding", job_id);
                return (state, Vec::new());
            }
            apply_status_report(&mut state, job_id, report)
        }
        Msg::StatusFailed { job_id, message } => {
            if !state.is_polling(&job_id) {
                explainer_debug!("Ignoring poll failure for job {}", job_id);
                return (state, Vec::new());
            }
            explainer_warn!("Status check for job {} failed: {}", job_id, message);
            state.settle();
            state.set_status(Status::Error, message.clone());
            state.log_client(format!("Status check failed: {message}"));
            vec![Effect::CancelPoll]
        }
        Msg::Teardown => {
            state.settle();
            vec![Effect::CancelPoll]
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    let Some(pdf) = state.pdf().cloned() else {
        state.set_display_status(Status::Error, MISSING_PDF);
        state.log_client("Missing PDF file.");
        return Vec::new();
    };
    let api_key = state.api_key().trim().to_string();
    if api_key.is_empty() {
        state.set_display_status(Status::Error, MISSING_API_KEY);
        state.log_client("Missing API key.");
        return Vec::new();
    }

    let options = state.options().clone();
    let attempt = state.begin_submission();
    state.set_status(Status::Running, SUBMITTING);
    state.log_client(format!("Submitting job: pdf=\"{}\"", pdf.file_name));

    // Cancel first so a poll for the previous job cannot land after the reset.
    vec![
        Effect::CancelPoll,
        Effect::SubmitJob {
            attempt,
            pdf,
            api_key,
            options,
        },
    ]
}

/// One poll cycle. Logs and artifacts are updated before the status is
/// evaluated so a terminal status never shows with stale logs.
fn apply_status_report(state: &mut AppState, job_id: JobId, report: StatusReport) -> Vec<Effect> {
    if let MergeOutcome::Diverged { appended } = state.merge_generator_logs(&report.logs) {
        explainer_warn!(
            "Generator log for job {} is no longer append-only ({} lines reported, {} new)",
            job_id,
            report.logs.len(),
            appended
        );
    }
    state.record_outputs(&report);
    let message = report.message().map(str::to_string);
    let backend_status = report.backend_status();
    state.replace_artifacts(report.artifacts);

    match backend_status {
        BackendStatus::Queued | BackendStatus::Running => {
            state.set_status(
                Status::Running,
                message.unwrap_or_else(|| PROCESSING.to_string()),
            );
            vec![Effect::SchedulePoll { job_id }]
        }
        BackendStatus::Done => {
            explainer_info!("Job {} done", job_id);
            state.settle();
            state.set_status(
                Status::Done,
                message.unwrap_or_else(|| GENERATION_COMPLETE.to_string()),
            );
            state.log_client("Job completed.");
            vec![Effect::CancelPoll]
        }
        BackendStatus::Other(raw) => {
            explainer_warn!("Job {} ended with status {:?}", job_id, raw);
            state.settle();
            state.set_status(
                Status::Error,
                message.unwrap_or_else(|| GENERATION_FAILED.to_string()),
            );
            state.log_client("Job failed. Check logs for details.");
            vec![Effect::CancelPoll]
        }
    }
}
