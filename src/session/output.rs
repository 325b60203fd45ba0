// src/session/output.rs
//! Output session: present a text artifact and export it.
//!
//! Silent mode (`auto_copy` / `auto_download`) exports without an overlay.
//! Interactive mode mounts an overlay with a raw/preview toggle and export
//! actions. Invoking any export resolves the session whether or not the
//! export itself succeeds; export failures are only logged.

use tokio::sync::mpsc;

use super::{detach_overlay, next_event};
use crate::capabilities::Capabilities;
use crate::config::OutputConfig;
use crate::error::SessionFailure;
use crate::types::OverlayId;
use crate::ui::{OutputEvent, OutputOverlay, OverlayStyle, ViewMode, ViewSwap};

/// Delivers `output` to the user according to `config`.
pub async fn deliver_output(output: String, config: OutputConfig, caps: &Capabilities) {
    if config.is_silent() {
        export_silently(output, &config, caps);
        return;
    }

    match OutputSession::start(output, config, caps.clone()) {
        Some(session) => session.run().await,
        None => log::warn!("Output session resolved without presenting the overlay"),
    }
}

/// Initiates the requested exports and returns without awaiting them.
fn export_silently(output: String, config: &OutputConfig, caps: &Capabilities) {
    log::info!(
        "Exporting {} characters silently (copy: {}, download: {})",
        output.chars().count(),
        config.auto_copy,
        config.auto_download
    );

    if config.auto_copy {
        spawn_copy(caps, output.clone());
    }
    if config.auto_download {
        download(caps, &output, config);
    }
}

struct OutputSession {
    output: String,
    config: OutputConfig,
    caps: Capabilities,
    view: ViewMode,
    overlay: Option<OverlayId>,
    events: Option<mpsc::UnboundedReceiver<OutputEvent>>,
}

impl OutputSession {
    fn start(output: String, config: OutputConfig, caps: Capabilities) -> Option<Self> {
        let view = ViewMode::default();
        let overlay = OutputOverlay {
            text: output.clone(),
            initial_view: view,
            raw_label: config.raw_label.clone(),
            preview_label: config.preview_label.clone(),
            download_label: config.download_label.clone(),
            copy_label: config.copy_label.clone(),
            upload_label: config
                .upload_target
                .as_ref()
                .map(|_| config.upload_label.clone()),
            style: OverlayStyle::output(),
        };

        let mounted = match caps.ui.mount_output(&config.mount, overlay) {
            Ok(mounted) => mounted,
            Err(e) => {
                log::error!("Failed to mount output overlay: {}", e);
                return None;
            }
        };
        log::debug!("Mounted output {} under {}", mounted.id, config.mount);

        Some(Self {
            output,
            config,
            caps,
            view,
            overlay: Some(mounted.id),
            events: Some(mounted.events),
        })
    }

    async fn run(mut self) {
        loop {
            match next_event(&mut self.events).await {
                Some(event) => {
                    if self.on_event(event) {
                        self.finish();
                        return;
                    }
                }
                None => {
                    log::warn!("Output overlay closed its event stream before an export");
                    self.events = None;
                }
            }
        }
    }

    /// Returns `true` once an export was initiated.
    fn on_event(&mut self, event: OutputEvent) -> bool {
        match event {
            OutputEvent::Show(mode) => {
                self.show(mode);
                false
            }
            OutputEvent::Download => {
                download(&self.caps, &self.output, &self.config);
                true
            }
            OutputEvent::Copy => {
                spawn_copy(&self.caps, self.output.clone());
                true
            }
            OutputEvent::Upload => match self.config.upload_target.clone() {
                Some(target) => {
                    let network = self.caps.network.clone();
                    let method = self.config.upload_method.clone();
                    let mime_type = self.config.upload_mime_type.clone();
                    let body = self.output.clone();
                    tokio::spawn(async move {
                        match network.send(&target, &method, &mime_type, &body).await {
                            Ok(()) => log::info!("Uploaded output to {}", target),
                            Err(e) => SessionFailure::Export {
                                action: "upload",
                                cause: e.to_string(),
                            }
                            .report(),
                        }
                    });
                    true
                }
                None => {
                    log::warn!("Upload requested but no upload target is configured");
                    false
                }
            },
        }
    }

    /// Mounts `mode`, detaching the other view. Showing the current view is a no-op.
    fn show(&mut self, mode: ViewMode) {
        if mode == self.view {
            return;
        }

        let swap = ViewSwap {
            detach: self.view,
            attach: mode,
        };
        if let Some(id) = self.overlay {
            self.caps.ui.swap_view(id, swap);
        }
        log::debug!("Switched output view {:?} -> {:?}", swap.detach, swap.attach);
        self.view = mode;
    }

    fn finish(&mut self) {
        detach_overlay(self.caps.ui.as_ref(), &self.config.mount, &mut self.overlay);
        log::info!("Output session resolved");
    }
}

fn spawn_copy(caps: &Capabilities, text: String) {
    let clipboard = caps.clipboard.clone();
    tokio::spawn(async move {
        match clipboard.write_text(&text).await {
            Ok(()) => log::info!("Output copied to clipboard"),
            Err(e) => SessionFailure::Export {
                action: "copy",
                cause: e.to_string(),
            }
            .report(),
        }
    });
}

fn download(caps: &Capabilities, text: &str, config: &OutputConfig) {
    match caps
        .download
        .save(text, &config.download_filename, &config.download_mime_type)
    {
        Ok(()) => log::info!("Saved output as {}", config.download_filename),
        Err(e) => SessionFailure::Export {
            action: "download",
            cause: e.to_string(),
        }
        .report(),
    }
}
