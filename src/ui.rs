// src/ui.rs
//! UI host contract: overlays, the events they emit and the view state the
//! sessions write back.
//!
//! The host owns the concrete controls. A session mounts an overlay
//! description, receives an event stream for it, pushes view updates and
//! finally unmounts it.

use tokio::sync::mpsc;

use crate::error::CapabilityError;
use crate::types::{FileHandle, MountPoint, OverlayId};

/// Which rendering of the output text is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    Raw,
    #[default]
    Preview,
}


/// Styling owned by a single overlay for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayStyle {
    pub class_name: &'static str,
    /// Translucent backdrop without controls, used by headless input sessions.
    pub dimmed: bool,
}

impl OverlayStyle {
    pub fn input(show_ui: bool) -> Self {
        Self {
            class_name: "dropin",
            dimmed: !show_ui,
        }
    }

    pub fn output() -> Self {
        Self {
            class_name: "dropout",
            dimmed: false,
        }
    }
}

/// Description of an input overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct InputOverlay {
    /// `false` mounts a bare drop region with no controls.
    pub show_ui: bool,
    pub placeholder: String,
    pub start_label: String,
    pub clear_label: String,
    pub paste_label: String,
    pub start_enabled: bool,
    pub style: OverlayStyle,
}

/// Description of an output overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputOverlay {
    pub text: String,
    pub initial_view: ViewMode,
    pub raw_label: String,
    pub preview_label: String,
    pub download_label: String,
    pub copy_label: String,
    /// Present only when an upload target is configured.
    pub upload_label: Option<String>,
    pub style: OverlayStyle,
}

/// Events an input overlay emits.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The text area content changed by typing.
    Edit(String),
    /// Files were chosen through the file picker.
    FilesSelected(Vec<FileHandle>),
    DragOver,
    DragLeave,
    Drop(Vec<FileHandle>),
    Paste,
    Clear,
    Start,
    /// Text pushed by the host program rather than the user.
    Provide(String),
}

/// Events an output overlay emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    Show(ViewMode),
    Download,
    Copy,
    Upload,
}

/// A mounted overlay and its event stream.
#[derive(Debug)]
pub struct Overlay<E> {
    pub id: OverlayId,
    pub events: mpsc::UnboundedReceiver<E>,
}

/// What the input text area displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputArea {
    Text(String),
    /// A literal notice replacing the text, e.g. a read failure.
    Notice(&'static str),
}

impl InputArea {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Notice(notice) => notice,
        }
    }
}

/// Snapshot of the input controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub area: InputArea,
    pub start_enabled: bool,
}

/// Replaces the mounted output view. The toggle for `attach` becomes the
/// disabled one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSwap {
    pub detach: ViewMode,
    pub attach: ViewMode,
}

/// Host that renders overlays under a container.
pub trait UiHost: Send + Sync {
    fn mount_input(
        &self,
        container: &MountPoint,
        overlay: InputOverlay,
    ) -> Result<Overlay<InputEvent>, CapabilityError>;

    fn mount_output(
        &self,
        container: &MountPoint,
        overlay: OutputOverlay,
    ) -> Result<Overlay<OutputEvent>, CapabilityError>;

    /// Only called for overlays mounted with controls.
    fn render_input(&self, id: OverlayId, view: &InputView);

    fn set_drag_highlight(&self, id: OverlayId, active: bool);

    fn swap_view(&self, id: OverlayId, swap: ViewSwap);

    /// Fails if the overlay is no longer attached to `container`.
    fn unmount(&self, container: &MountPoint, id: OverlayId) -> Result<(), CapabilityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_mode_defaults_to_preview() {
        assert_eq!(ViewMode::default(), ViewMode::Preview);
    }

    #[test]
    fn headless_input_overlay_is_dimmed() {
        assert!(OverlayStyle::input(false).dimmed);
        assert!(!OverlayStyle::input(true).dimmed);
        assert_eq!(OverlayStyle::output().class_name, "dropout");
    }
}
