use std::time::Duration;

use explainer_core::{Effect, JobId, Msg, StatusReport};
use explainer_engine::{
    BackendError, BackendSettings, EngineEvent, EngineHandle, EngineStopped, StatusResponse,
    SubmitRequest,
};
use explainer_logging::explainer_info;

/// Executes core effects on the engine and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        Ok(Self::with_engine(EngineHandle::new(settings)?))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob {
                    attempt,
                    pdf,
                    api_key,
                    options,
                } => {
                    explainer_info!(
                        "SubmitJob attempt={} pdf={} bytes={}",
                        attempt,
                        pdf.file_name,
                        pdf.size_bytes
                    );
                    self.engine.submit(
                        attempt,
                        SubmitRequest {
                            pdf_path: pdf.path,
                            file_name: pdf.file_name,
                            api_key,
                            use_rag: options.use_rag,
                            model: options.model,
                            helper_model: options.helper_model,
                        },
                    );
                }
                Effect::PollNow { job_id } => self.engine.poll_now(job_id.as_str()),
                Effect::SchedulePoll { job_id } => self.engine.schedule_poll(job_id.as_str()),
                Effect::CancelPoll => self.engine.cancel_poll(),
            }
        }
    }

    /// Waits up to `timeout` for the next engine event. `Ok(None)` on timeout.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        Ok(self.engine.recv_timeout(timeout)?.map(map_event))
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { attempt, result } => match result {
            Ok(job_id) => Msg::SubmitAccepted {
                attempt,
                job_id: JobId::from(job_id),
            },
            Err(err) => Msg::SubmitFailed {
                attempt,
                message: err.message,
            },
        },
        EngineEvent::Status { job_id, result } => match result {
            Ok(response) => Msg::StatusReceived {
                job_id: JobId::from(job_id),
                report: map_status(response),
            },
            Err(err) => Msg::StatusFailed {
                job_id: JobId::from(job_id),
                message: err.message,
            },
        },
    }
}

fn map_status(response: StatusResponse) -> StatusReport {
    StatusReport {
        status: response.status,
        message: response.message,
        logs: response.logs,
        artifacts: response.artifacts,
        video_url: response.video_url,
        video_path: response.video_path,
        output_dir: response.output_dir,
    }
}
