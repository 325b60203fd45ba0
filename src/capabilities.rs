// src/capabilities.rs
//! Capability traits the session core calls through.
//!
//! Each trait describes one host capability, never an implementation.
//! All of them are **object-safe** and used as `Arc<dyn Trait>`, so the
//! sessions can run against fake adapters with zero real I/O.
//!
//! # Laws
//!
//! - **Fetch tolerance**: `TextFetch::fetch` never fails. Transport errors and
//!   non-success statuses yield empty text.
//! - **Clipboard round trip**: after `write_text(t)` succeeds, `read_text()`
//!   returns `t` until something else writes the clipboard.
//! - **Download is synchronous**: `Download::save` has triggered the host
//!   save path by the time it returns.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CapabilityError;
use crate::types::{FileHandle, HttpMethod, RemoteUrl};
use crate::ui::UiHost;

/// Fetches remote text for input prefill.
#[async_trait]
pub trait TextFetch: Send + Sync {
    async fn fetch(&self, source: &RemoteUrl) -> String;
}

/// Reads and writes the system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn read_text(&self) -> Result<String, CapabilityError>;

    async fn write_text(&self, text: &str) -> Result<(), CapabilityError>;
}

/// Decodes a single file as text.
#[async_trait]
pub trait FileDecode: Send + Sync {
    async fn decode(&self, file: &FileHandle) -> Result<String, CapabilityError>;
}

/// Sends text to a remote target.
#[async_trait]
pub trait NetworkDelivery: Send + Sync {
    async fn send(
        &self,
        target: &RemoteUrl,
        method: &HttpMethod,
        mime_type: &str,
        body: &str,
    ) -> Result<(), CapabilityError>;
}

/// Hands text to the user as a saved file.
pub trait Download: Send + Sync {
    fn save(&self, text: &str, filename: &str, mime_type: &str) -> Result<(), CapabilityError>;
}

/// The full set of ports a session may use.
#[derive(Clone)]
pub struct Capabilities {
    pub fetch: Arc<dyn TextFetch>,
    pub clipboard: Arc<dyn Clipboard>,
    pub files: Arc<dyn FileDecode>,
    pub network: Arc<dyn NetworkDelivery>,
    pub download: Arc<dyn Download>,
    pub ui: Arc<dyn UiHost>,
}
