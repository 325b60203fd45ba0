// tests/common/mod.rs
//! Fake capability adapters shared by the session tests.
//!
//! Every fake records what the session asked of it so tests can assert on
//! the exact calls; none of them touch the network, clipboard or disk.

#![allow(dead_code)]

use async_trait::async_trait;
use dropio::{
    Capabilities, CapabilityError, Clipboard, Download, FileDecode, FileHandle, HttpMethod,
    InputEvent, InputOverlay, InputView, MountPoint, NetworkDelivery, OutputEvent, OutputOverlay,
    Overlay, OverlayId, RemoteUrl, TextFetch, UiHost, ViewMode, ViewSwap,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// UI host
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct UiRecord {
    pub input_overlays: Vec<InputOverlay>,
    pub output_overlays: Vec<OutputOverlay>,
    pub renders: Vec<InputView>,
    pub highlights: Vec<bool>,
    pub swaps: Vec<ViewSwap>,
    pub unmounts: Vec<OverlayId>,
    /// Output views currently attached to the overlay.
    pub mounted_views: Vec<ViewMode>,
    attached: Option<OverlayId>,
    input_tx: Option<mpsc::UnboundedSender<InputEvent>>,
    output_tx: Option<mpsc::UnboundedSender<OutputEvent>>,
}

#[derive(Default)]
pub struct FakeUi {
    pub record: Mutex<UiRecord>,
    pub fail_mount: bool,
    /// Simulates a container that lost the overlay before teardown.
    pub fail_unmount: bool,
}

impl FakeUi {
    /// Sender for the mounted input overlay, once the session mounted it.
    pub async fn input_events(&self) -> mpsc::UnboundedSender<InputEvent> {
        loop {
            if let Some(tx) = self.record.lock().input_tx.clone() {
                return tx;
            }
            tokio::task::yield_now().await;
        }
    }

    pub async fn output_events(&self) -> mpsc::UnboundedSender<OutputEvent> {
        loop {
            if let Some(tx) = self.record.lock().output_tx.clone() {
                return tx;
            }
            tokio::task::yield_now().await;
        }
    }

    pub fn last_render(&self) -> Option<InputView> {
        self.record.lock().renders.last().cloned()
    }

    pub fn render_count(&self) -> usize {
        self.record.lock().renders.len()
    }

    pub fn unmount_count(&self) -> usize {
        self.record.lock().unmounts.len()
    }

    fn attach(&self) -> Result<OverlayId, CapabilityError> {
        if self.fail_mount {
            return Err(CapabilityError::Host("container is gone".to_string()));
        }
        let id = OverlayId::new();
        self.record.lock().attached = Some(id);
        Ok(id)
    }
}

impl UiHost for FakeUi {
    fn mount_input(
        &self,
        _container: &MountPoint,
        overlay: InputOverlay,
    ) -> Result<Overlay<InputEvent>, CapabilityError> {
        let id = self.attach()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let mut record = self.record.lock();
        record.input_overlays.push(overlay);
        record.input_tx = Some(tx);
        Ok(Overlay { id, events: rx })
    }

    fn mount_output(
        &self,
        _container: &MountPoint,
        overlay: OutputOverlay,
    ) -> Result<Overlay<OutputEvent>, CapabilityError> {
        let id = self.attach()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let mut record = self.record.lock();
        record.mounted_views = vec![overlay.initial_view];
        record.output_overlays.push(overlay);
        record.output_tx = Some(tx);
        Ok(Overlay { id, events: rx })
    }

    fn render_input(&self, _id: OverlayId, view: &InputView) {
        self.record.lock().renders.push(view.clone());
    }

    fn set_drag_highlight(&self, _id: OverlayId, active: bool) {
        self.record.lock().highlights.push(active);
    }

    fn swap_view(&self, _id: OverlayId, swap: ViewSwap) {
        let mut record = self.record.lock();
        assert_eq!(record.mounted_views, vec![swap.detach], "detached view was not mounted");
        record.mounted_views = vec![swap.attach];
        record.swaps.push(swap);
    }

    fn unmount(&self, _container: &MountPoint, id: OverlayId) -> Result<(), CapabilityError> {
        let mut record = self.record.lock();
        record.unmounts.push(id);
        if self.fail_unmount || record.attached != Some(id) {
            return Err(CapabilityError::Host("overlay not attached".to_string()));
        }
        record.attached = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Prefill source answering after a delay. Unknown sources yield empty text.
#[derive(Default)]
pub struct FakeFetch {
    pub responses: HashMap<String, String>,
    pub delay: Duration,
    pub calls: Mutex<Vec<String>>,
}

impl FakeFetch {
    pub fn answering(url: &str, text: &str) -> Self {
        Self {
            responses: HashMap::from([(RemoteUrl::parse(url).unwrap().to_string(), text.to_string())]),
            ..Self::default()
        }
    }
}

#[async_trait]
impl TextFetch for FakeFetch {
    async fn fetch(&self, source: &RemoteUrl) -> String {
        self.calls.lock().push(source.to_string());
        tokio::time::sleep(self.delay).await;
        self.responses
            .get(source.as_str())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    pub contents: Mutex<Option<String>>,
    pub fail_writes: bool,
    pub writes: Mutex<Vec<String>>,
}

impl FakeClipboard {
    pub fn holding(text: &str) -> Self {
        Self {
            contents: Mutex::new(Some(text.to_string())),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn read_text(&self) -> Result<String, CapabilityError> {
        self.contents
            .lock()
            .clone()
            .ok_or_else(|| CapabilityError::Clipboard("permission denied".to_string()))
    }

    async fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        self.writes.lock().push(text.to_string());
        if self.fail_writes {
            return Err(CapabilityError::Clipboard("write refused".to_string()));
        }
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeFiles {
    pub files: HashMap<PathBuf, String>,
    pub decoded: Mutex<Vec<FileHandle>>,
}

impl FakeFiles {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            files: entries
                .iter()
                .map(|(path, text)| (PathBuf::from(path), text.to_string()))
                .collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl FileDecode for FakeFiles {
    async fn decode(&self, file: &FileHandle) -> Result<String, CapabilityError> {
        self.decoded.lock().push(file.clone());
        self.files
            .get(file.path())
            .cloned()
            .ok_or_else(|| CapabilityError::FileDecode {
                path: file.path().display().to_string(),
                reason: "not readable".to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRequest {
    pub target: String,
    pub method: String,
    pub mime_type: String,
    pub body: String,
}

#[derive(Default)]
pub struct FakeNetwork {
    pub fail: bool,
    pub sent: Mutex<Vec<SentRequest>>,
}

#[async_trait]
impl NetworkDelivery for FakeNetwork {
    async fn send(
        &self,
        target: &RemoteUrl,
        method: &HttpMethod,
        mime_type: &str,
        body: &str,
    ) -> Result<(), CapabilityError> {
        self.sent.lock().push(SentRequest {
            target: target.to_string(),
            method: method.to_string(),
            mime_type: mime_type.to_string(),
            body: body.to_string(),
        });
        if self.fail {
            return Err(CapabilityError::Network {
                target: target.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub text: String,
    pub filename: String,
    pub mime_type: String,
}

#[derive(Default)]
pub struct FakeDownload {
    pub fail: bool,
    pub saved: Mutex<Vec<SavedFile>>,
}

impl Download for FakeDownload {
    fn save(&self, text: &str, filename: &str, mime_type: &str) -> Result<(), CapabilityError> {
        self.saved.lock().push(SavedFile {
            text: text.to_string(),
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
        });
        if self.fail {
            return Err(CapabilityError::Download {
                filename: filename.to_string(),
                reason: "disk full".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// All fakes plus the `Capabilities` bundle wired to them.
pub struct Harness {
    pub ui: Arc<FakeUi>,
    pub fetch: Arc<FakeFetch>,
    pub clipboard: Arc<FakeClipboard>,
    pub files: Arc<FakeFiles>,
    pub network: Arc<FakeNetwork>,
    pub download: Arc<FakeDownload>,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            ui: Arc::new(FakeUi::default()),
            fetch: Arc::new(FakeFetch::default()),
            clipboard: Arc::new(FakeClipboard::default()),
            files: Arc::new(FakeFiles::default()),
            network: Arc::new(FakeNetwork::default()),
            download: Arc::new(FakeDownload::default()),
        }
    }
}

impl Harness {
    pub fn caps(&self) -> Capabilities {
        Capabilities {
            fetch: self.fetch.clone(),
            clipboard: self.clipboard.clone(),
            files: self.files.clone(),
            network: self.network.clone(),
            download: self.download.clone(),
            ui: self.ui.clone(),
        }
    }
}

/// Lets spawned tasks and due timers run. Needs a paused clock.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Past the default debounce window.
pub async fn after_debounce() {
    tokio::time::sleep(Duration::from_millis(300)).await;
}
