// src/host/files.rs
//! Local filesystem adapters: decoding dropped files and saving downloads.
//!
//! This module is the only place where the native host touches the disk.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

use crate::capabilities::{Download, FileDecode};
use crate::constants::FILENAME_MAX_LENGTH;
use crate::error::CapabilityError;
use crate::types::FileHandle;

/// Decodes files as UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileDecode;

#[async_trait]
impl FileDecode for FsFileDecode {
    async fn decode(&self, file: &FileHandle) -> Result<String, CapabilityError> {
        let decode_error = |reason: String| CapabilityError::FileDecode {
            path: file.path().display().to_string(),
            reason,
        };

        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|e| decode_error(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| decode_error(e.to_string()))
    }
}

/// Saves downloads into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where a download named `filename` lands.
    pub fn target_path(&self, filename: &str) -> PathBuf {
        self.dir.join(sanitize_filename(filename))
    }
}

impl Download for DirectoryDownload {
    fn save(&self, text: &str, filename: &str, mime_type: &str) -> Result<(), CapabilityError> {
        let path = self.target_path(filename);
        log::debug!("Saving {} bytes of {} to {}", text.len(), mime_type, path.display());

        write_file(&path, text).map_err(|e| CapabilityError::Download {
            filename: filename.to_string(),
            reason: e.to_string(),
        })?;

        log::info!("Wrote file: {}", path.display());
        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Sanitizes a string to be safe for use as a filename.
pub fn sanitize_filename(name: &str) -> String {
    let mut safe_name = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>();

    safe_name = safe_name.trim().trim_matches('.').to_string();

    if let Some((cut, _)) = safe_name.char_indices().nth(FILENAME_MAX_LENGTH) {
        safe_name.truncate(cut);
    }

    if safe_name.is_empty() {
        safe_name = crate::constants::DEFAULT_DOWNLOAD_FILENAME.to_string();
    }

    safe_name
}
