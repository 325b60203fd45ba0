// src/error.rs
//! Error types with structured error handling.
//!
//! Sessions never surface errors to their callers. Capability failures are
//! still typed so they can be logged, classified and turned into inline
//! notices by the session state machines.

use std::fmt;
use thiserror::Error;

/// Failure reported by a host capability (clipboard, file decode, network,
/// download, UI host).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("Error interacting with clipboard: {0}")]
    Clipboard(String),

    #[error("Failed to decode file {path}: {reason}")]
    FileDecode { path: String, reason: String },

    #[error("Network delivery to {target} failed: {reason}")]
    Network { target: String, reason: String },

    #[error("Failed to save {filename}: {reason}")]
    Download { filename: String, reason: String },

    #[error("UI host error: {0}")]
    Host(String),
}

/// Configuration could not be resolved.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration overrides: {0}")]
    InvalidOverrides(#[from] serde_json::Error),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Interactive output needs a source file; stdin is used for commands")]
    InteractiveStdin,
}

/// Binary-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(ConfigError::InvalidOverrides(err))
    }
}

/// Domain vocabulary for what went wrong during a session.
///
/// This is not an error type. It classifies a failure so the session can
/// decide whether it becomes an inline notice, a log line, or nothing at all.
/// None of these ever resolve or reject a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionFailure {
    /// The validator rejected the current text. Expected while typing.
    Validation,
    /// More than one file was dropped or selected.
    MultiFileRejection { count: usize },
    /// A dropped or selected file could not be decoded as text.
    FileDecode { cause: String },
    /// Reading from or writing to the clipboard failed.
    Clipboard { cause: String },
    /// The prefill produced empty text. A failed fetch degrades to this too;
    /// the fetch adapter logs its own cause.
    EmptyPrefill,
    /// A copy, download or upload failed after the session resolved.
    Export { action: &'static str, cause: String },
}

impl SessionFailure {
    /// The literal replacement text shown in the input area, if any.
    pub fn notice(&self) -> Option<&'static str> {
        use crate::constants::{
            NOTICE_CLIPBOARD_READ_FAILED, NOTICE_FILE_READ_FAILED, NOTICE_SINGLE_FILE_ONLY,
        };

        match self {
            Self::MultiFileRejection { .. } => Some(NOTICE_SINGLE_FILE_ONLY),
            Self::FileDecode { .. } => Some(NOTICE_FILE_READ_FAILED),
            Self::Clipboard { .. } => Some(NOTICE_CLIPBOARD_READ_FAILED),
            Self::Validation | Self::EmptyPrefill | Self::Export { .. } => None,
        }
    }

    /// How loudly this failure is reported in the log.
    pub fn log_level(&self) -> log::Level {
        match self {
            Self::Validation | Self::EmptyPrefill => log::Level::Debug,
            Self::MultiFileRejection { .. } => log::Level::Info,
            Self::FileDecode { .. } | Self::Clipboard { .. } | Self::Export { .. } => {
                log::Level::Error
            }
        }
    }

    /// Logs the failure at its own level.
    pub fn report(&self) {
        log::log!(self.log_level(), "{}", self);
    }
}

impl fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "input rejected by validator"),
            Self::MultiFileRejection { count } => {
                write!(f, "expected a single input file, got {}", count)
            }
            Self::FileDecode { cause } => write!(f, "error reading file: {}", cause),
            Self::Clipboard { cause } => {
                write!(f, "failed to access clipboard contents: {}", cause)
            }
            Self::EmptyPrefill => write!(f, "prefill returned empty text"),
            Self::Export { action, cause } => write!(f, "{} failed: {}", action, cause),
        }
    }
}
