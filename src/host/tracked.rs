// src/host/tracked.rs
//! Keeps a short-lived process alive until fire-and-forget exports finish.
//!
//! Sessions never wait for copy or upload results. A CLI that exits right
//! after `deliver_output` would cut those writes off, so the binary wraps
//! its adapters in [`Tracked`] and waits on [`InFlight::settled`] before
//! shutting the runtime down.

use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::capabilities::{Clipboard, NetworkDelivery};
use crate::error::CapabilityError;
use crate::types::{HttpMethod, RemoteUrl};

/// Counts capability calls that have started but not finished.
#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    async fn track<F: Future>(&self, call: F) -> F::Output {
        self.count.fetch_add(1, Ordering::SeqCst);
        let output = call.await;
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
        output
    }

    /// Resolves once no tracked call is running.
    ///
    /// Yields first so calls spawned just before are able to register.
    pub async fn settled(&self) {
        tokio::task::yield_now().await;
        loop {
            let idle = self.idle.notified();
            if self.pending() == 0 {
                return;
            }
            log::debug!("Waiting for {} export(s) to finish", self.pending());
            idle.await;
        }
    }
}

/// Adapter wrapper that registers every call with an [`InFlight`] counter.
pub struct Tracked<C> {
    inner: C,
    in_flight: Arc<InFlight>,
}

impl<C> Tracked<C> {
    pub fn new(inner: C, in_flight: Arc<InFlight>) -> Self {
        Self { inner, in_flight }
    }
}

#[async_trait]
impl<C: Clipboard> Clipboard for Tracked<C> {
    async fn read_text(&self) -> Result<String, CapabilityError> {
        self.in_flight.track(self.inner.read_text()).await
    }

    async fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        self.in_flight.track(self.inner.write_text(text)).await
    }
}

#[async_trait]
impl<C: NetworkDelivery> NetworkDelivery for Tracked<C> {
    async fn send(
        &self,
        target: &RemoteUrl,
        method: &HttpMethod,
        mime_type: &str,
        body: &str,
    ) -> Result<(), CapabilityError> {
        self.in_flight
            .track(self.inner.send(target, method, mime_type, body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct SlowClipboard;

    #[async_trait]
    impl Clipboard for SlowClipboard {
        async fn read_text(&self) -> Result<String, CapabilityError> {
            Ok(String::new())
        }

        async fn write_text(&self, _text: &str) -> Result<(), CapabilityError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn settled_waits_for_spawned_calls() {
        let in_flight = InFlight::new();
        let clipboard = Arc::new(Tracked::new(SlowClipboard, Arc::clone(&in_flight)));

        let writer = Arc::clone(&clipboard);
        tokio::spawn(async move { writer.write_text("bye").await });

        let started = tokio::time::Instant::now();
        in_flight.settled().await;

        assert_eq!(in_flight.pending(), 0);
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn settled_returns_immediately_when_idle() {
        let in_flight = InFlight::new();
        in_flight.settled().await;
        assert_eq!(in_flight.pending(), 0);
    }
}
