use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use explainer_logging::{explainer_debug, explainer_error, explainer_info};

use crate::{
    Backend, BackendError, BackendSettings, EngineEvent, FailureKind, PollScheduler,
    ReqwestBackend, SubmitRequest,
};

enum EngineCommand {
    Submit { attempt: u64, request: SubmitRequest },
    PollNow { job_id: String },
    SchedulePoll { job_id: String },
    CancelPoll,
    Shutdown,
}

/// Runs backend calls on a dedicated tokio runtime thread.
///
/// Commands go in through the handle, results come back as [`EngineEvent`]s.
/// Dropping the handle cancels any pending poll and stops the thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

/// The engine thread is gone; no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("engine thread stopped")]
pub struct EngineStopped;

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let poll_interval = settings.poll_interval;
        let backend = ReqwestBackend::new(settings)?;
        Self::with_backend(Arc::new(backend), poll_interval)
    }

    pub fn with_backend(
        backend: Arc<dyn Backend>,
        poll_interval: Duration,
    ) -> Result<Self, BackendError> {
        let runtime = tokio::runtime::Runtime::new().map_err(|err| {
            BackendError::new(
                FailureKind::Io,
                format!("Failed to start engine runtime: {err}"),
            )
        })?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut scheduler = PollScheduler::new(runtime.handle().clone());

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Submit { attempt, request } => {
                        let backend = backend.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = backend.submit(&request).await;
                            let _ = event_tx.send(EngineEvent::Submitted { attempt, result });
                        });
                    }
                    EngineCommand::PollNow { job_id } => {
                        scheduler.arm(
                            Duration::ZERO,
                            poll(backend.clone(), job_id, event_tx.clone()),
                        );
                    }
                    EngineCommand::SchedulePoll { job_id } => {
                        scheduler.arm(
                            poll_interval,
                            poll(backend.clone(), job_id, event_tx.clone()),
                        );
                    }
                    EngineCommand::CancelPoll => {
                        if scheduler.cancel() {
                            explainer_debug!("Cancelled pending poll");
                        }
                    }
                    EngineCommand::Shutdown => break,
                }
            }

            scheduler.cancel();
            explainer_info!("Engine stopped");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, attempt: u64, request: SubmitRequest) {
        self.send(EngineCommand::Submit { attempt, request });
    }

    pub fn poll_now(&self, job_id: impl Into<String>) {
        self.send(EngineCommand::PollNow {
            job_id: job_id.into(),
        });
    }

    pub fn schedule_poll(&self, job_id: impl Into<String>) {
        self.send(EngineCommand::SchedulePoll {
            job_id: job_id.into(),
        });
    }

    pub fn cancel_poll(&self) {
        self.send(EngineCommand::CancelPoll);
    }

    /// Stops the engine thread. Pending polls are cancelled and in-flight
    /// submissions are dropped.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            explainer_error!("Engine thread stopped; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn poll(backend: Arc<dyn Backend>, job_id: String, event_tx: mpsc::Sender<EngineEvent>) {
    let result = backend.status(&job_id).await;
    let _ = event_tx.send(EngineEvent::Status { job_id, result });
}
