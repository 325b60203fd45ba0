// src/host/mod.rs
//! Native adapters for the capability traits.
//!
//! The session core never depends on this module; it only sees the traits.

mod clipboard;
mod files;
mod http;
mod terminal;
mod tracked;

pub use clipboard::{copy_to_clipboard, read_from_clipboard, SystemClipboard};
pub use files::{sanitize_filename, DirectoryDownload, FsFileDecode};
pub use http::{HttpDelivery, HttpTextFetch};
pub use terminal::{parse_input_line, parse_output_line, TerminalHost};
pub use tracked::{InFlight, Tracked};

use std::path::PathBuf;
use std::sync::Arc;

use crate::capabilities::Capabilities;
use crate::error::AppError;
use crate::ui::UiHost;

/// Wires the native adapters around a UI host. Clipboard and network calls
/// are registered with `in_flight`.
pub fn native_capabilities(
    ui: Arc<dyn UiHost>,
    download_dir: impl Into<PathBuf>,
    in_flight: Arc<InFlight>,
) -> Result<Capabilities, AppError> {
    Ok(Capabilities {
        fetch: Arc::new(HttpTextFetch::new()?),
        clipboard: Arc::new(Tracked::new(SystemClipboard, Arc::clone(&in_flight))),
        files: Arc::new(FsFileDecode),
        network: Arc::new(Tracked::new(HttpDelivery::new()?, in_flight)),
        download: Arc::new(DirectoryDownload::new(download_dir)),
        ui,
    })
}
