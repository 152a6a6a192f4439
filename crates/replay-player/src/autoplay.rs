//! Autoplay: advance the cursor every `speed_ms` while playing.
//!
//! The timer is a tokio task owned through an [`AutoplayHandle`]. Dropping
//! the handle marks the timer cancelled while holding the controller lock,
//! then aborts the task. Ticks check the mark under the same lock, so once
//! the drop returns no tick can move the cursor or publish it, even when a
//! tick was already running on another worker thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::controller::{PlaybackController, PlaybackCursor};

pub type SharedController<S> = Arc<Mutex<PlaybackController<S>>>;

pub(crate) fn lock<S>(controller: &Mutex<PlaybackController<S>>) -> MutexGuard<'_, PlaybackController<S>> {
    // a poisoned lock still holds a consistent cursor
    controller.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(isize),
    Stopped,
}

/// One autoplay step. Stops instead of advancing when already at the end,
/// and stops right after landing on the last position.
pub fn tick<S>(controller: &mut PlaybackController<S>) -> TickOutcome {
    if !controller.cursor().is_playing {
        return TickOutcome::Stopped;
    }
    if controller.is_at_end() {
        controller.set_playing(false);
        return TickOutcome::Stopped;
    }
    let cursor = controller.go_to_next();
    if controller.is_at_end() {
        controller.set_playing(false);
    }
    TickOutcome::Advanced(cursor.index)
}

/// Running autoplay timer. Cancelled on drop.
pub struct AutoplayHandle<S> {
    task: JoinHandle<()>,
    speed_ms: u64,
    cancelled: Arc<AtomicBool>,
    controller: Weak<Mutex<PlaybackController<S>>>,
}

impl<S> AutoplayHandle<S> {
    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<S> Drop for AutoplayHandle<S> {
    fn drop(&mut self) {
        match self.controller.upgrade() {
            Some(controller) => {
                let _guard = lock(&controller);
                self.cancelled.store(true, Ordering::SeqCst);
            }
            None => self.cancelled.store(true, Ordering::SeqCst),
        }
        self.task.abort();
        tracing::debug!(speed_ms = self.speed_ms, "Autoplay timer released");
    }
}

/// Start a repeating timer that ticks `controller` every `speed_ms` and
/// publishes the cursor on `updates`. The first tick fires one period after
/// the call. Returns `None` outside a tokio runtime.
pub fn spawn<S>(
    controller: &SharedController<S>,
    updates: watch::Sender<PlaybackCursor>,
    speed_ms: u64,
) -> Option<AutoplayHandle<S>>
where
    S: Send + 'static,
{
    let Ok(runtime) = Handle::try_current() else {
        tracing::warn!(speed_ms, "No runtime available, autoplay timer not started");
        return None;
    };
    let period = Duration::from_millis(speed_ms.max(1));
    let controller: Weak<Mutex<PlaybackController<S>>> = Arc::downgrade(controller);
    let cancelled = Arc::new(AtomicBool::new(false));

    let task_controller = controller.clone();
    let task_cancelled = cancelled.clone();
    let task = runtime.spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(controller) = task_controller.upgrade() else {
                break;
            };
            // the cursor is published before unlocking so a drop never
            // lands between the tick and the send
            let (outcome, cursor) = {
                let mut guard = lock(&controller);
                if task_cancelled.load(Ordering::SeqCst) {
                    break;
                }
                let outcome = tick(&mut guard);
                let cursor = guard.cursor();
                updates.send_replace(cursor);
                (outcome, cursor)
            };
            if let TickOutcome::Stopped = outcome {
                tracing::debug!(index = cursor.index, "Autoplay reached the end");
                break;
            }
            if !cursor.is_playing {
                break;
            }
        }
    });

    tracing::debug!(speed_ms, "Autoplay timer started");
    Some(AutoplayHandle {
        task,
        speed_ms,
        cancelled,
        controller,
    })
}
