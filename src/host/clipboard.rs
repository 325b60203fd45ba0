// src/host/clipboard.rs
//! System clipboard access.
//!
//! arboard is tried first; when it fails the platform's clipboard command is
//! used instead. Both are blocking, so they run on tokio's blocking pool.

use async_trait::async_trait;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::capabilities::Clipboard;
use crate::error::CapabilityError;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn read_text(&self) -> Result<String, CapabilityError> {
        tokio::task::spawn_blocking(read_from_clipboard)
            .await
            .map_err(|e| CapabilityError::Clipboard(format!("Clipboard task failed: {}", e)))?
    }

    async fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        let content = text.to_string();
        tokio::task::spawn_blocking(move || copy_to_clipboard(&content))
            .await
            .map_err(|e| CapabilityError::Clipboard(format!("Clipboard task failed: {}", e)))?
    }
}

/// Reads text from the system clipboard.
pub fn read_from_clipboard() -> Result<String, CapabilityError> {
    match arboard::Clipboard::new().and_then(|mut c| c.get_text()) {
        Ok(text) => {
            log::debug!("Read {} characters from clipboard using arboard", text.len());
            return Ok(text);
        }
        Err(e) => log::debug!("Arboard read failed: {}, trying platform command", e),
    }

    let (program, args) = platform_paste_command()?;
    read_from_command(program, args)
}

/// Copies content to the system clipboard.
pub fn copy_to_clipboard(content: &str) -> Result<(), CapabilityError> {
    log::debug!("Copying {} characters to clipboard", content.len());

    match arboard::Clipboard::new().and_then(|mut c| c.set_text(content)) {
        Ok(()) => {
            log::info!("Content copied to clipboard using arboard");
            return Ok(());
        }
        Err(e) => log::debug!("Arboard failed: {}, trying platform command", e),
    }

    let (program, args) = platform_copy_command()?;
    let result = pipe_into_command(program, args, content);
    match &result {
        Ok(()) => log::info!("Content copied to clipboard using {}", program),
        Err(e) => log::error!("Failed to copy to clipboard: {}", e),
    }
    result
}

#[cfg(target_os = "linux")]
fn is_wayland() -> bool {
    std::env::var("WAYLAND_DISPLAY").is_ok()
        || std::env::var("XDG_SESSION_TYPE").is_ok_and(|s| s == "wayland")
}

#[cfg(target_os = "linux")]
fn platform_copy_command() -> Result<(&'static str, &'static [&'static str]), CapabilityError> {
    if is_wayland() {
        Ok(("wl-copy", &[]))
    } else {
        Ok(("xclip", &["-selection", "clipboard"]))
    }
}

#[cfg(target_os = "linux")]
fn platform_paste_command() -> Result<(&'static str, &'static [&'static str]), CapabilityError> {
    if is_wayland() {
        Ok(("wl-paste", &["--no-newline"]))
    } else {
        Ok(("xclip", &["-selection", "clipboard", "-o"]))
    }
}

#[cfg(target_os = "macos")]
fn platform_copy_command() -> Result<(&'static str, &'static [&'static str]), CapabilityError> {
    Ok(("pbcopy", &[]))
}

#[cfg(target_os = "macos")]
fn platform_paste_command() -> Result<(&'static str, &'static [&'static str]), CapabilityError> {
    Ok(("pbpaste", &[]))
}

#[cfg(target_os = "windows")]
fn platform_copy_command() -> Result<(&'static str, &'static [&'static str]), CapabilityError> {
    Ok(("clip", &[]))
}

#[cfg(target_os = "windows")]
fn platform_paste_command() -> Result<(&'static str, &'static [&'static str]), CapabilityError> {
    Ok(("powershell", &["-NoProfile", "-Command", "Get-Clipboard -Raw"]))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_copy_command() -> Result<(&'static str, &'static [&'static str]), CapabilityError> {
    Err(CapabilityError::Clipboard(
        "Clipboard not supported on this platform".to_string(),
    ))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_paste_command() -> Result<(&'static str, &'static [&'static str]), CapabilityError> {
    platform_copy_command()
}

fn pipe_into_command(program: &str, args: &[&str], content: &str) -> Result<(), CapabilityError> {
    log::debug!("Attempting to copy with {}", program);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CapabilityError::Clipboard(format!("Failed to spawn {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(content.as_bytes()).map_err(|e| {
            CapabilityError::Clipboard(format!("Failed to write to {}: {}", program, e))
        })?;
    }

    let output = child.wait_with_output().map_err(|e| {
        CapabilityError::Clipboard(format!("Failed to wait for {}: {}", program, e))
    })?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(CapabilityError::Clipboard(format!(
            "{} failed: {}",
            program, stderr
        )))
    }
}

fn read_from_command(program: &str, args: &[&str]) -> Result<String, CapabilityError> {
    log::debug!("Attempting to paste with {}", program);

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| CapabilityError::Clipboard(format!("Failed to spawn {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CapabilityError::Clipboard(format!(
            "{} failed: {}",
            program, stderr
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| CapabilityError::Clipboard(format!("Clipboard is not text: {}", e)))
}
