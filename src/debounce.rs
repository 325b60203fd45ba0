// src/debounce.rs
//! Trailing-edge debouncer over the tokio timer.
//!
//! Every call cancels the previously scheduled task and schedules a new one
//! carrying the latest argument. The pending task is owned by the debouncer,
//! so dropping the debouncer cancels it as well.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Coalesces a burst of calls into one trailing call of `action`.
pub struct Debouncer<T> {
    delay: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            action: Arc::new(action),
            pending: None,
        }
    }

    /// Schedules `action(arg)` after the window, superseding any pending call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call(&mut self, arg: T) {
        self.cancel();

        let action = Arc::clone(&self.action);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action(arg);
        }));
    }

    /// Cancels the pending call. Returns `true` if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DEBOUNCE_WINDOW;
    use parking_lot::Mutex;

    fn recording() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |arg| sink.lock().push(arg))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_with_last_argument() {
        let (calls, action) = recording();
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW, action);

        for arg in 1..=5 {
            debouncer.call(arg);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(calls.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(*calls.lock(), vec![5]);
        assert!(!debouncer.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn separated_calls_each_fire() {
        let (calls, action) = recording();
        let mut debouncer = Debouncer::new(Duration::from_millis(50), action);

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(60)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(*calls.lock(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_call() {
        let (calls, action) = recording();
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW, action);

        debouncer.call(7);
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_call() {
        let (calls, action) = recording();
        {
            let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW, action);
            debouncer.call(9);
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(calls.lock().is_empty());
    }
}
