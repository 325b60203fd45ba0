// src/lib.rs
//! dropio library: interactive sessions that acquire a validated block of
//! text from a user and deliver computed text back out.
//!
//! # Public API
//!
//! - **Sessions**: `acquire_input`, `deliver_output`
//! - **Configuration**: `InputConfig`, `OutputConfig`
//! - **Validation**: `Validator`, `BuiltinValidator`
//! - **Rate limiting**: `Debouncer`
//! - **Capabilities**: `TextFetch`, `Clipboard`, `FileDecode`,
//!   `NetworkDelivery`, `Download`, `UiHost`
//! - **Native host**: reqwest, arboard, filesystem and terminal adapters

pub mod capabilities;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod host;
pub mod session;
pub mod types;
pub mod ui;
pub mod validator;

// --- Sessions ---
pub use crate::session::{acquire_input, deliver_output};

// --- Configuration ---
pub use crate::config::{InputConfig, OutputConfig};

// --- Error Handling ---
pub use crate::error::{AppError, CapabilityError, ConfigError, SessionFailure};

// --- Validation & Debounce ---
pub use crate::debounce::Debouncer;
pub use crate::validator::{BuiltinValidator, Validator};

// --- Capabilities ---
pub use crate::capabilities::{
    Capabilities, Clipboard, Download, FileDecode, NetworkDelivery, TextFetch,
};
pub use crate::ui::{
    InputArea, InputEvent, InputOverlay, InputView, OutputEvent, OutputOverlay, Overlay,
    OverlayStyle, UiHost, ViewMode, ViewSwap,
};

// --- Domain Types ---
pub use crate::types::{FileHandle, HttpMethod, MountPoint, OverlayId, RemoteUrl};
