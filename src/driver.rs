// ============================================================================
// Async Driver
// Feeds wall-clock time into a shared session machine on a tokio interval
// ============================================================================

use crate::engine::SessionMachine;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Session machine shared between the driver and the input side
pub type SharedSession = Arc<Mutex<SessionMachine>>;

pub fn shared(machine: SessionMachine) -> SharedSession {
    Arc::new(Mutex::new(machine))
}

/// Running driver task
pub struct DriverHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl DriverHandle {
    /// Stop advancing time and wait for the task to finish
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            // The task may already be gone
            let _ = stop.send(());
        }
        if let Err(err) = self.task.await {
            tracing::warn!(%err, "session driver task failed");
        }
    }
}

/// Advance `session` by the real time elapsed, checked every `resolution`.
///
/// The lock is held only for the `advance` call, so user operations
/// interleave freely between wake-ups.
pub fn spawn(session: SharedSession, resolution: Duration) -> DriverHandle {
    let (stop, mut stopped) = oneshot::channel::<()>();
    let resolution = resolution.max(Duration::from_millis(1));

    let task = tokio::spawn(async move {
        let mut interval = time::interval(resolution);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            tokio::select! {
                _ = &mut stopped => break,
                now = interval.tick() => {
                    let elapsed = now.saturating_duration_since(last);
                    last = now;
                    if elapsed.is_zero() {
                        continue;
                    }
                    let events = session.lock().advance(elapsed);
                    if !events.is_empty() {
                        tracing::trace!(count = events.len(), "driver advanced session");
                    }
                }
            }
        }
        tracing::debug!("session driver stopped");
    });

    DriverHandle {
        stop: Some(stop),
        task,
    }
}
