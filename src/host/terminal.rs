// src/host/terminal.rs
//! Line-oriented terminal UI host.
//!
//! Each stdin line becomes one overlay event. Lines starting with `:` are
//! commands; any other line is a manual edit appended to the input text.
//! Overlay output goes to stderr so stdout stays reserved for results.

use parking_lot::Mutex;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::CapabilityError;
use crate::types::{FileHandle, MountPoint, OverlayId};
use crate::ui::{
    InputArea, InputEvent, InputOverlay, InputView, Overlay, OutputEvent, OutputOverlay, UiHost,
    ViewMode, ViewSwap,
};

enum Route {
    Input(mpsc::UnboundedSender<InputEvent>),
    Output {
        events: mpsc::UnboundedSender<OutputEvent>,
        text: String,
    },
}

struct Attached {
    id: OverlayId,
    mount: MountPoint,
    route: Route,
}

#[derive(Default)]
struct TerminalState {
    attached: Option<Attached>,
    /// Mirror of the input text area, extended by edit lines.
    buffer: String,
}

/// UI host that drives overlays from stdin.
#[derive(Clone)]
pub struct TerminalHost {
    state: Arc<Mutex<TerminalState>>,
}

impl TerminalHost {
    /// Host without an event source; lines are fed with [`TerminalHost::feed_line`].
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(TerminalState::default())),
        }
    }

    /// Creates the host and starts forwarding stdin lines.
    ///
    /// Stdin is read with blocking IO on a dedicated thread, never on the
    /// runtime.
    pub fn spawn() -> Self {
        let host = Self::new();

        let state = Arc::clone(&host.state);
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => dispatch_line(&state, &line),
                    Err(e) => {
                        log::error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
            log::debug!("Stdin closed; detaching event streams");
            if let Some(attached) = state.lock().attached.as_mut() {
                attached.route = closed_route(&attached.route);
            }
        });

        host
    }

    /// Routes one line to the attached overlay.
    pub fn feed_line(&self, line: &str) {
        dispatch_line(&self.state, line);
    }

    fn attach(
        &self,
        mount: &MountPoint,
        route: impl FnOnce(OverlayId) -> Route,
    ) -> Result<OverlayId, CapabilityError> {
        let mut state = self.state.lock();
        if let Some(existing) = &state.attached {
            return Err(CapabilityError::Host(format!(
                "{} is already attached under {}",
                existing.id, existing.mount
            )));
        }

        let id = OverlayId::new();
        state.buffer.clear();
        state.attached = Some(Attached {
            id,
            mount: mount.clone(),
            route: route(id),
        });
        Ok(id)
    }
}

/// Replaces a route with one whose receiver is already gone.
fn closed_route(route: &Route) -> Route {
    match route {
        Route::Input(_) => Route::Input(mpsc::unbounded_channel().0),
        Route::Output { text, .. } => Route::Output {
            events: mpsc::unbounded_channel().0,
            text: text.clone(),
        },
    }
}

fn dispatch_line(state: &Mutex<TerminalState>, line: &str) {
    let mut state = state.lock();
    let TerminalState { attached, buffer } = &mut *state;

    let Some(attached) = attached.as_ref() else {
        log::debug!("No overlay attached; ignoring input line");
        return;
    };

    let delivered = match &attached.route {
        Route::Input(events) => parse_input_line(line, buffer).map(|e| events.send(e).is_ok()),
        Route::Output { events, .. } => parse_output_line(line).map(|e| events.send(e).is_ok()),
    };

    match delivered {
        Some(true) => {}
        Some(false) => log::debug!("{} no longer listens for events", attached.id),
        None => eprintln!("unknown command: {}", line.trim()),
    }
}

/// Parses one line typed into an input overlay.
pub fn parse_input_line(line: &str, buffer: &mut String) -> Option<InputEvent> {
    let Some(command) = line.trim_end().strip_prefix(':') else {
        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(line);
        return Some(InputEvent::Edit(buffer.clone()));
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));

    match name {
        "paste" => Some(InputEvent::Paste),
        "clear" => Some(InputEvent::Clear),
        "start" => Some(InputEvent::Start),
        "provide" => Some(InputEvent::Provide(rest.to_string())),
        // The rest of the line is one path, spaces included.
        "file" if !rest.is_empty() => {
            Some(InputEvent::FilesSelected(vec![FileHandle::new(rest)]))
        }
        _ => None,
    }
}

/// Parses one line typed into an output overlay.
pub fn parse_output_line(line: &str) -> Option<OutputEvent> {
    match line.trim() {
        ":raw" => Some(OutputEvent::Show(ViewMode::Raw)),
        ":preview" => Some(OutputEvent::Show(ViewMode::Preview)),
        ":download" => Some(OutputEvent::Download),
        ":copy" => Some(OutputEvent::Copy),
        ":upload" => Some(OutputEvent::Upload),
        _ => None,
    }
}

/// Preview rendering: the text framed in a gutter.
fn render_preview(text: &str) -> String {
    text.lines()
        .map(|line| format!("│ {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_view(mode: ViewMode, text: &str) {
    match mode {
        ViewMode::Raw => eprintln!("── raw ──\n{}", text),
        ViewMode::Preview => eprintln!("── preview ──\n{}", render_preview(text)),
    }
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl UiHost for TerminalHost {
    fn mount_input(
        &self,
        container: &MountPoint,
        overlay: InputOverlay,
    ) -> Result<Overlay<InputEvent>, CapabilityError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.attach(container, |_| Route::Input(tx))?;

        if overlay.show_ui {
            eprintln!("{}", overlay.placeholder);
            eprintln!(
                "commands: :paste ({}) | :clear ({}) | :start ({}) | :file <path> | :provide <text>",
                overlay.paste_label, overlay.clear_label, overlay.start_label
            );
        }
        Ok(Overlay { id, events: rx })
    }

    fn mount_output(
        &self,
        container: &MountPoint,
        overlay: OutputOverlay,
    ) -> Result<Overlay<OutputEvent>, CapabilityError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let text = overlay.text.clone();
        let id = self.attach(container, |_| Route::Output { events: tx, text })?;

        print_view(overlay.initial_view, &overlay.text);
        let mut actions = vec![
            format!(":raw ({})", overlay.raw_label),
            format!(":preview ({})", overlay.preview_label),
            format!(":download ({})", overlay.download_label),
            format!(":copy ({})", overlay.copy_label),
        ];
        if let Some(upload) = &overlay.upload_label {
            actions.push(format!(":upload ({})", upload));
        }
        eprintln!("commands: {}", actions.join(" | "));
        Ok(Overlay { id, events: rx })
    }

    fn render_input(&self, id: OverlayId, view: &InputView) {
        let mut state = self.state.lock();
        if state.attached.as_ref().map(|a| a.id) != Some(id) {
            return;
        }

        match &view.area {
            InputArea::Text(text) => state.buffer = text.clone(),
            InputArea::Notice(notice) => {
                state.buffer.clear();
                eprintln!("{}", notice);
            }
        }
        eprintln!(
            "[{} characters, start {}]",
            view.area.as_str().chars().count(),
            if view.start_enabled { "enabled" } else { "disabled" }
        );
    }

    fn set_drag_highlight(&self, _id: OverlayId, _active: bool) {}

    fn swap_view(&self, id: OverlayId, swap: ViewSwap) {
        let state = self.state.lock();
        if let Some(Attached {
            id: attached_id,
            route: Route::Output { text, .. },
            ..
        }) = &state.attached
        {
            if *attached_id == id {
                print_view(swap.attach, text);
            }
        }
    }

    fn unmount(&self, container: &MountPoint, id: OverlayId) -> Result<(), CapabilityError> {
        let mut state = self.state.lock();
        match &state.attached {
            Some(attached) if attached.id == id && &attached.mount == container => {
                state.attached = None;
                state.buffer.clear();
                Ok(())
            }
            _ => Err(CapabilityError::Host(format!(
                "{} is not attached under {}",
                id, container
            ))),
        }
    }
}
