use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use explainer_engine::{
    Backend, BackendError, EngineEvent, EngineHandle, EngineStopped, StatusResponse,
    SubmitRequest,
};

const WAIT: Duration = Duration::from_secs(2);

/// Scripted backend: hands out queued status responses and records calls.
#[derive(Default)]
struct ScriptedBackend {
    statuses: Mutex<VecDeque<StatusResponse>>,
    status_calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn with_statuses(statuses: &[&str]) -> Arc<Self> {
        let queue = statuses
            .iter()
            .map(|status| StatusResponse {
                status: status.to_string(),
                ..StatusResponse::default()
            })
            .collect();
        Arc::new(Self {
            statuses: Mutex::new(queue),
            status_calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn submit(&self, request: &SubmitRequest) -> Result<String, BackendError> {
        Ok(format!("job-for-{}", request.file_name))
    }

    async fn status(&self, job_id: &str) -> Result<StatusResponse, BackendError> {
        self.status_calls.lock().unwrap().push(job_id.to_string());
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

fn request() -> SubmitRequest {
    SubmitRequest {
        pdf_path: "paper.pdf".into(),
        file_name: "paper.pdf".to_string(),
        api_key: "key".to_string(),
        use_rag: false,
        model: None,
        helper_model: None,
    }
}

#[test]
fn submit_result_is_tagged_with_attempt() {
    let backend = ScriptedBackend::with_statuses(&[]);
    let engine = EngineHandle::with_backend(backend, Duration::from_millis(10)).unwrap();

    engine.submit(7, request());

    let event = engine.recv_timeout(WAIT).unwrap().expect("submitted event");
    assert_eq!(
        event,
        EngineEvent::Submitted {
            attempt: 7,
            result: Ok("job-for-paper.pdf".to_string()),
        }
    );
}

#[test]
fn poll_now_and_scheduled_poll_deliver_status_events() {
    let backend = ScriptedBackend::with_statuses(&["queued", "running"]);
    let engine = EngineHandle::with_backend(backend.clone(), Duration::from_millis(20)).unwrap();

    engine.poll_now("abc");
    match engine.recv_timeout(WAIT).unwrap() {
        Some(EngineEvent::Status { job_id, result }) => {
            assert_eq!(job_id, "abc");
            assert_eq!(result.unwrap().status, "queued");
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.schedule_poll("abc");
    match engine.recv_timeout(WAIT).unwrap() {
        Some(EngineEvent::Status { result, .. }) => {
            assert_eq!(result.unwrap().status, "running");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(backend.calls(), vec!["abc".to_string(), "abc".to_string()]);
}

#[test]
fn cancelled_poll_never_reaches_the_backend() {
    let backend = ScriptedBackend::with_statuses(&["running"]);
    let engine = EngineHandle::with_backend(backend.clone(), Duration::from_millis(200)).unwrap();

    engine.schedule_poll("abc");
    engine.cancel_poll();

    assert!(engine.recv_timeout(Duration::from_millis(500)).unwrap().is_none());
    assert!(backend.calls().is_empty());
}

#[test]
fn only_the_latest_scheduled_poll_runs() {
    let backend = ScriptedBackend::with_statuses(&["running", "running"]);
    let engine = EngineHandle::with_backend(backend.clone(), Duration::from_millis(50)).unwrap();

    engine.schedule_poll("old");
    engine.schedule_poll("new");

    match engine.recv_timeout(WAIT).unwrap() {
        Some(EngineEvent::Status { job_id, .. }) => assert_eq!(job_id, "new"),
        other => panic!("unexpected event {other:?}"),
    }
    assert!(engine.recv_timeout(Duration::from_millis(300)).unwrap().is_none());
    assert_eq!(backend.calls(), vec!["new".to_string()]);
}

#[test]
fn dropping_the_handle_stops_polling() {
    let backend = ScriptedBackend::with_statuses(&["running"]);
    {
        let engine = EngineHandle::with_backend(backend.clone(), Duration::from_millis(100)).unwrap();
        engine.schedule_poll("abc");
    }
    std::thread::sleep(Duration::from_millis(400));

    assert!(backend.calls().is_empty());
}

#[test]
fn stopped_engine_is_reported_instead_of_timing_out() {
    let backend = ScriptedBackend::with_statuses(&["running"]);
    let engine = EngineHandle::with_backend(backend.clone(), Duration::from_millis(10)).unwrap();

    engine.shutdown();
    engine.poll_now("abc");

    assert_eq!(engine.recv_timeout(WAIT), Err(EngineStopped));
    assert!(backend.calls().is_empty());
}
