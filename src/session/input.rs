// src/session/input.rs
//! Input session: acquire one validated block of text.
//!
//! Text arrives by manual edits, a single dropped or selected file, a
//! clipboard paste, an optional prefill fetch, or text provided by the host.
//! The session resolves exactly once and never fails; read failures become
//! inline notices and the session stays open.

use std::future::Future;

use tokio::sync::mpsc;

use super::{detach_overlay, next_event};
use crate::capabilities::Capabilities;
use crate::config::InputConfig;
use crate::debounce::Debouncer;
use crate::error::{CapabilityError, SessionFailure};
use crate::types::{preview, FileHandle, OverlayId};
use crate::ui::{InputArea, InputEvent, InputOverlay, InputView, OverlayStyle};

/// Acquires a block of text that satisfies `config.valid`.
///
/// Resolves with the current text when the start action is invoked while
/// enabled, or as soon as installed text is valid under `auto_start`.
pub async fn acquire_input(config: InputConfig, caps: &Capabilities) -> String {
    InputSession::start(config, caps.clone()).run().await
}

/// Results delivered back into the session loop.
#[derive(Debug)]
enum Signal {
    /// A debounced edit is due for validation.
    Validate(String),
    Prefilled(String),
    FileDecoded(Result<String, CapabilityError>),
    ClipboardRead(Result<String, CapabilityError>),
}

struct InputSession {
    config: InputConfig,
    caps: Capabilities,
    current_text: String,
    area: InputArea,
    start_enabled: bool,
    overlay: Option<OverlayId>,
    events: Option<mpsc::UnboundedReceiver<InputEvent>>,
    signals_tx: mpsc::UnboundedSender<Signal>,
    signals: mpsc::UnboundedReceiver<Signal>,
    validation: Debouncer<String>,
}

impl InputSession {
    fn start(config: InputConfig, caps: Capabilities) -> Self {
        let (signals_tx, signals) = mpsc::unbounded_channel();

        let debounced_tx = signals_tx.clone();
        let validation = Debouncer::new(config.debounce_window(), move |text| {
            // The receiver is gone only after the session resolved.
            let _ = debounced_tx.send(Signal::Validate(text));
        });

        let start_enabled = config.show_ui && config.valid.check("");
        let overlay = InputOverlay {
            show_ui: config.show_ui,
            placeholder: config.placeholder.clone(),
            start_label: config.start_label.clone(),
            clear_label: config.clear_label.clone(),
            paste_label: config.paste_label.clone(),
            start_enabled,
            style: OverlayStyle::input(config.show_ui),
        };

        let (overlay, events) = match caps.ui.mount_input(&config.mount, overlay) {
            Ok(mounted) => {
                log::debug!("Mounted input {} under {}", mounted.id, config.mount);
                (Some(mounted.id), Some(mounted.events))
            }
            Err(e) => {
                log::error!("Failed to mount input overlay: {}", e);
                (None, None)
            }
        };

        let session = Self {
            config,
            caps,
            current_text: String::new(),
            area: InputArea::Text(String::new()),
            start_enabled,
            overlay,
            events,
            signals_tx,
            signals,
            validation,
        };

        if let Some(source) = session.config.prefill.clone() {
            log::info!("Prefilling input from {}", source);
            let fetch = session.caps.fetch.clone();
            session.spawn_signal(async move { Signal::Prefilled(fetch.fetch(&source).await) });
        }

        session
    }

    async fn run(mut self) -> String {
        loop {
            let resolved = tokio::select! {
                event = next_event(&mut self.events) => match event {
                    Some(event) => self.on_event(event),
                    None => {
                        log::warn!("Input overlay closed its event stream; waiting on pending reads");
                        self.events = None;
                        None
                    }
                },
                Some(signal) = self.signals.recv() => self.on_signal(signal),
            };

            if let Some(text) = resolved {
                return text;
            }
        }
    }

    fn on_event(&mut self, event: InputEvent) -> Option<String> {
        match event {
            InputEvent::Edit(text) => {
                self.current_text = text.clone();
                self.area = InputArea::Text(text.clone());
                if self.config.show_ui {
                    self.validation.call(text);
                }
                None
            }
            InputEvent::FilesSelected(files) => {
                self.read_files(files);
                None
            }
            InputEvent::DragOver => {
                self.highlight(true);
                None
            }
            InputEvent::DragLeave => {
                self.highlight(false);
                None
            }
            InputEvent::Drop(files) => {
                self.highlight(false);
                self.read_files(files);
                None
            }
            InputEvent::Paste => {
                let clipboard = self.caps.clipboard.clone();
                self.spawn_signal(async move { Signal::ClipboardRead(clipboard.read_text().await) });
                None
            }
            InputEvent::Clear => self.install(String::new()),
            InputEvent::Provide(text) => self.install(text),
            InputEvent::Start => {
                if !self.config.show_ui {
                    log::debug!("Ignoring start on a session without controls");
                    return None;
                }
                // Edits still inside the debounce window are validated now.
                self.validation.cancel();
                if let InputArea::Text(_) = self.area {
                    let valid = self.config.valid.check(&self.current_text);
                    if valid != self.start_enabled {
                        self.set_start_enabled(valid);
                    }
                }
                if self.start_enabled {
                    let text = std::mem::take(&mut self.current_text);
                    Some(self.finish(text))
                } else {
                    log::debug!("Ignoring start while the action is disabled");
                    None
                }
            }
        }
    }

    fn on_signal(&mut self, signal: Signal) -> Option<String> {
        match signal {
            Signal::Validate(text) => {
                // Superseded by installed text or a notice since it was scheduled.
                if text != self.current_text || matches!(self.area, InputArea::Notice(_)) {
                    return None;
                }
                let valid = self.config.valid.check(&text);
                if !valid {
                    SessionFailure::Validation.report();
                }
                self.set_start_enabled(valid);
                None
            }
            Signal::Prefilled(text) => {
                if text.is_empty() {
                    SessionFailure::EmptyPrefill.report();
                }
                self.install(text)
            }
            Signal::FileDecoded(Ok(text)) | Signal::ClipboardRead(Ok(text)) => self.install(text),
            Signal::FileDecoded(Err(e)) => {
                self.show_notice(SessionFailure::FileDecode {
                    cause: e.to_string(),
                });
                None
            }
            Signal::ClipboardRead(Err(e)) => {
                self.show_notice(SessionFailure::Clipboard {
                    cause: e.to_string(),
                });
                None
            }
        }
    }

    /// Makes `text` the current input, validating it immediately.
    fn install(&mut self, text: String) -> Option<String> {
        self.validation.cancel();
        log::debug!("Installing input: {:?}", preview(&text));

        let valid = self.config.valid.check(&text);
        self.current_text = text.clone();
        self.area = InputArea::Text(text.clone());

        if !valid {
            SessionFailure::Validation.report();
        }
        self.set_start_enabled(valid);

        if self.config.auto_start && valid {
            return Some(self.finish(text));
        }
        None
    }

    fn read_files(&mut self, files: Vec<FileHandle>) {
        match <[FileHandle; 1]>::try_from(files) {
            Ok([file]) => {
                log::debug!("Decoding {}", file.display_name());
                let decoder = self.caps.files.clone();
                self.spawn_signal(async move { Signal::FileDecoded(decoder.decode(&file).await) });
            }
            Err(files) => self.show_notice(SessionFailure::MultiFileRejection { count: files.len() }),
        }
    }

    fn show_notice(&mut self, failure: SessionFailure) {
        failure.report();

        let Some(notice) = failure.notice() else {
            return;
        };
        if !self.config.show_ui {
            return;
        }

        self.validation.cancel();
        self.current_text.clear();
        self.area = InputArea::Notice(notice);
        self.set_start_enabled(false);
    }

    fn set_start_enabled(&mut self, enabled: bool) {
        if !self.config.show_ui {
            return;
        }
        self.start_enabled = enabled;
        self.render();
    }

    fn render(&self) {
        if let Some(id) = self.overlay {
            self.caps.ui.render_input(
                id,
                &InputView {
                    area: self.area.clone(),
                    start_enabled: self.start_enabled,
                },
            );
        }
    }

    fn highlight(&self, active: bool) {
        if let Some(id) = self.overlay {
            self.caps.ui.set_drag_highlight(id, active);
        }
    }

    fn finish(&mut self, text: String) -> String {
        self.validation.cancel();
        detach_overlay(self.caps.ui.as_ref(), &self.config.mount, &mut self.overlay);
        log::info!("Input session resolved with {} characters", text.chars().count());
        text
    }

    /// Runs a capability call to completion and feeds its result back in.
    /// Results arriving after the session resolved are dropped.
    fn spawn_signal<F>(&self, task: F)
    where
        F: Future<Output = Signal> + Send + 'static,
    {
        let tx = self.signals_tx.clone();
        tokio::spawn(async move {
            let signal = task.await;
            if let Err(late) = tx.send(signal) {
                log::debug!("Input session already resolved; dropping {:?}", late.0);
            }
        });
    }
}
