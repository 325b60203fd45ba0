// src/constants.rs
//! Constants that define the observable behaviour of a session.
//!
//! Notices are literal replacement text shown in the input area; they are
//! part of the user-facing contract and must not change casually.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Delay after the last manual edit before validation is recomputed.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Inline notices
// ---------------------------------------------------------------------------

pub const NOTICE_FILE_READ_FAILED: &str = "<error reading file>";

pub const NOTICE_SINGLE_FILE_ONLY: &str = "<please drop a single input text file>";

pub const NOTICE_CLIPBOARD_READ_FAILED: &str = "<error reading clipboard>";

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Container overlays attach to when the caller names none.
pub const DEFAULT_MOUNT_POINT: &str = "body";

pub const DEFAULT_UPLOAD_METHOD: &str = "POST";

pub const DEFAULT_MIME_TYPE: &str = "text/plain";

pub const DEFAULT_DOWNLOAD_FILENAME: &str = "output";

/// Maximum characters kept when sanitizing a download filename.
pub const FILENAME_MAX_LENGTH: usize = 100;

/// Maximum characters shown when previewing text in log lines.
pub const LOG_PREVIEW_LENGTH: usize = 60;
