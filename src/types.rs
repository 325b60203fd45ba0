// src/types.rs
//! Domain-specific newtypes for type safety and validation.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Validated http(s) URL used for prefill sources and upload targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl(Url);

impl RemoteUrl {
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(input.trim()).map_err(|e| ConfigError::InvalidUrl {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(ConfigError::InvalidUrl {
                url: input.to_string(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RemoteUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RemoteUrl::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// HTTP method token, normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMethod(String);

impl HttpMethod {
    pub fn new(method: impl Into<String>) -> Result<Self, ConfigError> {
        let method = method.into();
        let is_token = !method.is_empty()
            && method
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c));

        if !is_token {
            return Err(ConfigError::InvalidMethod(method));
        }

        Ok(Self(method.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        Self(crate::constants::DEFAULT_UPLOAD_METHOD.to_string())
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HttpMethod::new(s).map_err(serde::de::Error::custom)
    }
}

/// Identifies the container an overlay is attached under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct MountPoint(String);

impl MountPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MountPoint {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_MOUNT_POINT)
    }
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dropped or selected file, as handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle(PathBuf);

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn display_name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.display().to_string())
    }
}

/// Host-assigned identity of a mounted overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(uuid::Uuid);

impl OverlayId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for OverlayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0.simple())
    }
}

/// Shortens text for log lines.
pub fn preview(text: &str) -> String {
    let limit = crate::constants::LOG_PREVIEW_LENGTH;
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_url_accepts_http_only() {
        assert!(RemoteUrl::parse("https://example.com/input.json").is_ok());
        assert!(RemoteUrl::parse(" http://localhost:8080/in ").is_ok());
        assert!(RemoteUrl::parse("ftp://example.com/file").is_err());
        assert!(RemoteUrl::parse("not a url").is_err());
    }

    #[test]
    fn http_method_is_normalized() {
        assert_eq!(HttpMethod::new("put").unwrap().as_str(), "PUT");
        assert_eq!(HttpMethod::default().as_str(), "POST");
        assert!(HttpMethod::new("").is_err());
        assert!(HttpMethod::new("PO ST").is_err());
    }

    #[test]
    fn preview_truncates_long_text() {
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(200);
        assert_eq!(preview(&long).chars().count(), 61);
    }

    #[test]
    fn file_handle_display_name() {
        assert_eq!(FileHandle::new("/tmp/in/data.json").display_name(), "data.json");
    }
}
