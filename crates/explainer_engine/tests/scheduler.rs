use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use explainer_engine::PollScheduler;
use tokio::runtime::Handle;

const INTERVAL: Duration = Duration::from_millis(4000);

fn counting(counter: &Arc<AtomicUsize>) -> impl std::future::Future<Output = ()> + Send + 'static {
    let counter = counter.clone();
    async move {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(start_paused = true)]
async fn armed_action_runs_after_the_delay() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut scheduler = PollScheduler::new(Handle::current());

    scheduler.arm(INTERVAL, counting(&fired));
    tokio::time::sleep(Duration::from_millis(3999)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert!(scheduler.is_pending());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!scheduler.is_pending());
}

#[tokio::test(start_paused = true)]
async fn rearming_replaces_the_pending_action() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let mut scheduler = PollScheduler::new(Handle::current());

    scheduler.arm(INTERVAL, counting(&first));
    scheduler.arm(INTERVAL, counting(&second));
    tokio::time::sleep(INTERVAL * 3).await;

    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_prevents_the_action() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut scheduler = PollScheduler::new(Handle::current());

    scheduler.arm(INTERVAL, counting(&fired));
    assert!(scheduler.cancel());
    assert!(!scheduler.cancel());
    tokio::time::sleep(INTERVAL * 2).await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_scheduler_cancels() {
    let fired = Arc::new(AtomicUsize::new(0));
    {
        let mut scheduler = PollScheduler::new(Handle::current());
        scheduler.arm(INTERVAL, counting(&fired));
    }
    tokio::time::sleep(INTERVAL * 2).await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_interrupts_an_action_already_running() {
    let finished = Arc::new(AtomicUsize::new(0));
    let mut scheduler = PollScheduler::new(Handle::current());

    let done = finished.clone();
    scheduler.arm(Duration::ZERO, async move {
        tokio::time::sleep(Duration::from_secs(30)).await;
        done.fetch_add(1, Ordering::SeqCst);
    });
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(scheduler.cancel());
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(finished.load(Ordering::SeqCst), 0);
}
