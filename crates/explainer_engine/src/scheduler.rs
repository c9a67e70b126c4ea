use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Single-slot cancellable deferred action.
///
/// At most one action is pending at a time: arming a new one cancels the
/// previous. Cancelling drops the action even if it already started, so a
/// cancelled poll can never deliver its result.
pub struct PollScheduler {
    runtime: Handle,
    slot: Option<(CancellationToken, JoinHandle<()>)>,
}

impl PollScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            slot: None,
        }
    }

    /// Runs `action` after `delay`, replacing whatever was pending.
    pub fn arm<F>(&mut self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let task = self.runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = async {
                    tokio::time::sleep(delay).await;
                    action.await;
                } => {}
            }
        });
        self.slot = Some((token, task));
    }

    /// Cancels the pending action. Returns whether one was still pending.
    pub fn cancel(&mut self) -> bool {
        match self.slot.take() {
            Some((token, task)) => {
                let pending = !task.is_finished();
                token.cancel();
                pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|(_, task)| !task.is_finished())
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
