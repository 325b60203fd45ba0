// src/session/mod.rs
//! Input acquisition and output delivery sessions.
//!
//! Each session is one task driving a `tokio::select!` loop. Host events and
//! completed capability calls are handled one at a time, so session state
//! needs no locking. Capability calls run as detached tasks and are never
//! aborted once started.

mod input;
mod output;

pub use input::acquire_input;
pub use output::deliver_output;

use crate::types::{MountPoint, OverlayId};
use crate::ui::UiHost;
use tokio::sync::mpsc;

/// Removes the overlay if it is still owned. Runs at most once per overlay;
/// a host that already lost the overlay only produces a debug line.
fn detach_overlay(ui: &dyn UiHost, mount: &MountPoint, overlay: &mut Option<OverlayId>) {
    let Some(id) = overlay.take() else {
        return;
    };

    match ui.unmount(mount, id) {
        Ok(()) => log::debug!("Detached {} from {}", id, mount),
        Err(e) => log::debug!("Overlay {} was already detached: {}", id, e),
    }
}

/// Waits for the next overlay event. Pends forever once the stream is gone.
async fn next_event<E>(events: &mut Option<mpsc::UnboundedReceiver<E>>) -> Option<E> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
