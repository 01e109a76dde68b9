//! Cancellable repeating tasks.
//!
//! A [`TickHandle`] owns the spawned task. Dropping the handle cancels the
//! task, so a tick source cannot outlive whoever started it.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest accepted period; `tokio::time::interval` rejects zero.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug)]
pub struct TickHandle {
    task: Option<JoinHandle<()>>,
    period: Duration,
}

impl TickHandle {
    pub fn period(&self) -> Duration {
        self.period
    }

    /// False once cancelled or once the callback asked to stop.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Call `on_tick` every `period` until it returns `ControlFlow::Break` or the
/// handle is cancelled. The first call happens one period after spawning.
///
/// Late ticks are skipped rather than bunched up; callers re-read the clock
/// on every tick anyway.
///
/// Must be called from within a tokio runtime.
pub fn spawn_repeating<F>(period: Duration, mut on_tick: F) -> TickHandle
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    let period = period.max(MIN_PERIOD);
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            if on_tick().is_break() {
                break;
            }
        }
    });
    TickHandle {
        task: Some(task),
        period,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() -> ControlFlow<()> + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        })
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_at_the_requested_period() {
        let (count, f) = counter();
        let handle = spawn_repeating(Duration::from_millis(10), f);
        tokio::time::sleep(Duration::from_millis(35)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(handle.is_active());
        assert_eq!(handle.period(), Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticking() {
        let (count, f) = counter();
        let mut handle = spawn_repeating(Duration::from_millis(100), f);
        tokio::time::sleep(Duration::from_millis(250)).await;
        handle.cancel();
        assert!(!handle.is_active());
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels() {
        let (count, f) = counter();
        let handle = spawn_repeating(Duration::from_millis(100), f);
        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn break_ends_the_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        let handle = spawn_repeating(Duration::from_millis(10), move || {
            if inner.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_clamped() {
        let (_count, f) = counter();
        let handle = spawn_repeating(Duration::ZERO, f);
        assert_eq!(handle.period(), MIN_PERIOD);
    }
}
