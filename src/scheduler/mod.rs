use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Handle to a repeating job. Cancelling (or dropping) stops it before its
/// next run.
pub struct ScheduledTask {
    name: &'static str,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn cancel(&self) {
        if !self.cancel.swap(true, Ordering::SeqCst) {
            debug!(task = self.name, "cancelling scheduled task");
        }
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `job` every `period`, first run one period from now. Runs never
/// overlap: the next tick waits for the current job to finish.
pub fn spawn_every<F, Fut>(name: &'static str, period: Duration, mut job: F) -> ScheduledTask
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    let period = period.max(Duration::from_millis(1));

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() completes its first tick immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if flag.load(Ordering::SeqCst) {
                break;
            }
            job().await;
        }
    });

    debug!(task = name, period_ms = period.as_millis() as u64, "scheduled task started");
    ScheduledTask {
        name,
        cancel,
        handle,
    }
}
