// src/config.rs
//! Session configuration and command-line input.
//!
//! Both session configs are built from defaults plus caller overrides and
//! stay immutable for the session's lifetime. Overrides come either from
//! struct-update syntax over `Default::default()` or from a partial JSON
//! object (missing fields keep their defaults).

use crate::constants::{
    DEFAULT_DEBOUNCE_WINDOW, DEFAULT_DOWNLOAD_FILENAME, DEFAULT_MIME_TYPE,
};
use crate::error::{AppError, ConfigError};
use crate::types::{HttpMethod, MountPoint, RemoteUrl};
use crate::validator::{BuiltinValidator, Validator};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration of an input session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputConfig {
    #[serde(alias = "parent")]
    pub mount: MountPoint,
    /// Remote source fetched at session start to prefill the input.
    #[serde(alias = "apiIn", deserialize_with = "optional_url")]
    pub prefill: Option<RemoteUrl>,
    pub auto_start: bool,
    #[serde(rename = "showUI")]
    pub show_ui: bool,
    #[serde(deserialize_with = "builtin_validator")]
    pub valid: Validator,
    #[serde(alias = "placeholderText")]
    pub placeholder: String,
    #[serde(alias = "startButtonText")]
    pub start_label: String,
    #[serde(alias = "clearButtonText")]
    pub clear_label: String,
    #[serde(alias = "pasteButtonText")]
    pub paste_label: String,
    pub debounce_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mount: MountPoint::default(),
            prefill: None,
            auto_start: false,
            show_ui: true,
            valid: Validator::not_empty(),
            placeholder: "paste input or drop input file".to_string(),
            start_label: "start".to_string(),
            clear_label: "clear".to_string(),
            paste_label: "paste".to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_WINDOW.as_millis() as u64,
        }
    }
}

impl InputConfig {
    /// Merges a partial JSON object over the defaults.
    pub fn with_overrides(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Configuration of an output session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(alias = "parent")]
    pub mount: MountPoint,
    #[serde(alias = "apiOut", deserialize_with = "optional_url")]
    pub upload_target: Option<RemoteUrl>,
    #[serde(alias = "apiMethod")]
    pub upload_method: HttpMethod,
    #[serde(alias = "apiOutMimeType")]
    pub upload_mime_type: String,
    pub auto_download: bool,
    pub auto_copy: bool,
    #[serde(alias = "copyButtonText")]
    pub copy_label: String,
    #[serde(alias = "downloadButtonText")]
    pub download_label: String,
    #[serde(alias = "uploadButtonText")]
    pub upload_label: String,
    #[serde(alias = "rawButtonText")]
    pub raw_label: String,
    #[serde(alias = "previewButtonText")]
    pub preview_label: String,
    #[serde(alias = "downloadFileName")]
    pub download_filename: String,
    #[serde(alias = "downloadFileMimeType")]
    pub download_mime_type: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mount: MountPoint::default(),
            upload_target: None,
            upload_method: HttpMethod::default(),
            upload_mime_type: DEFAULT_MIME_TYPE.to_string(),
            auto_download: false,
            auto_copy: false,
            copy_label: "copy".to_string(),
            download_label: "download".to_string(),
            upload_label: "upload".to_string(),
            raw_label: "raw".to_string(),
            preview_label: "preview".to_string(),
            download_filename: DEFAULT_DOWNLOAD_FILENAME.to_string(),
            download_mime_type: DEFAULT_MIME_TYPE.to_string(),
        }
    }
}

impl OutputConfig {
    /// Merges a partial JSON object over the defaults.
    pub fn with_overrides(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Silent mode skips the overlay entirely.
    pub fn is_silent(&self) -> bool {
        self.auto_copy || self.auto_download
    }
}

/// An empty string means "not configured".
fn optional_url<'de, D>(deserializer: D) -> Result<Option<RemoteUrl>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(url) => RemoteUrl::parse(url)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn builtin_validator<'de, D>(deserializer: D) -> Result<Validator, D::Error>
where
    D: Deserializer<'de>,
{
    BuiltinValidator::deserialize(deserializer).map(Validator::from)
}

/// Overrides file layout: `{ "input": {...}, "output": {...} }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// JSON file with partial "input" / "output" overrides
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Acquire a block of text and print it to stdout
    Input {
        /// URL fetched at start to prefill the input
        #[arg(long)]
        prefill: Option<String>,

        /// Finish as soon as installed text is valid
        #[arg(long, default_value_t = false)]
        auto_start: bool,

        /// Run without controls (only prefill, drops and provided text)
        #[arg(long, default_value_t = false)]
        headless: bool,

        /// Validator gating completion
        #[arg(long, value_enum)]
        validator: Option<BuiltinValidator>,

        /// Debounce window for manual edits, in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
    },

    /// Present text and export it
    Output {
        /// File holding the text to deliver (stdin when omitted)
        source: Option<PathBuf>,

        /// Upload target URL
        #[arg(long)]
        upload: Option<String>,

        /// HTTP method used for uploads
        #[arg(long)]
        method: Option<String>,

        /// Copy to the clipboard without showing the overlay
        #[arg(long, default_value_t = false)]
        auto_copy: bool,

        /// Save the file without showing the overlay
        #[arg(long, default_value_t = false)]
        auto_download: bool,

        /// Filename used for downloads
        #[arg(long)]
        filename: Option<String>,

        /// Directory downloads are saved into
        #[arg(long, default_value = ".")]
        download_dir: PathBuf,
    },
}

/// A fully resolved invocation.
#[derive(Debug, Clone)]
pub enum SessionPlan {
    Input(InputConfig),
    Output {
        config: OutputConfig,
        source: Option<PathBuf>,
        download_dir: PathBuf,
    },
}

impl SessionPlan {
    /// Resolves CLI flags over the overrides file over the defaults.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let file = match &cli.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                serde_json::from_str::<ConfigFile>(&raw)?
            }
            None => ConfigFile::default(),
        };

        match cli.command {
            SessionCommand::Input {
                prefill,
                auto_start,
                headless,
                validator,
                debounce_ms,
            } => {
                let mut config = file.input;
                if let Some(url) = prefill {
                    config.prefill = Some(RemoteUrl::parse(&url)?);
                }
                config.auto_start |= auto_start;
                config.show_ui &= !headless;
                if let Some(kind) = validator {
                    config.valid = kind.into();
                }
                if let Some(ms) = debounce_ms {
                    config.debounce_ms = ms;
                }
                Ok(Self::Input(config))
            }
            SessionCommand::Output {
                source,
                upload,
                method,
                auto_copy,
                auto_download,
                filename,
                download_dir,
            } => {
                let mut config = file.output;
                if let Some(url) = upload {
                    config.upload_target = Some(RemoteUrl::parse(&url)?);
                }
                if let Some(method) = method {
                    config.upload_method = HttpMethod::new(method)?;
                }
                config.auto_copy |= auto_copy;
                config.auto_download |= auto_download;
                if let Some(filename) = filename {
                    config.download_filename = filename;
                }
                Ok(Self::Output {
                    config,
                    source,
                    download_dir,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn input_defaults() {
        let config = InputConfig::default();
        assert_eq!(config.mount.as_str(), "body");
        assert!(config.prefill.is_none());
        assert!(!config.auto_start);
        assert!(config.show_ui);
        assert_eq!(config.valid.name(), "not-empty");
        assert_eq!(config.placeholder, "paste input or drop input file");
        assert_eq!(config.debounce_window(), Duration::from_millis(250));
    }

    #[test]
    fn partial_input_overrides_keep_defaults() {
        let config = InputConfig::with_overrides(
            r#"{ "apiIn": "https://example.com/seed.json", "autoStart": true, "valid": "json" }"#,
        )
        .unwrap();

        assert_eq!(
            config.prefill.as_ref().map(RemoteUrl::as_str),
            Some("https://example.com/seed.json")
        );
        assert!(config.auto_start);
        assert!(config.show_ui);
        assert_eq!(config.valid.name(), "json");
        assert_eq!(config.start_label, "start");
    }

    #[test]
    fn original_validator_names_are_accepted() {
        let json = InputConfig::with_overrides(r#"{ "valid": "isJSON" }"#).unwrap();
        assert_eq!(json.valid.name(), "json");

        let not_empty = InputConfig::with_overrides(r#"{ "valid": "isNotEmpty" }"#).unwrap();
        assert_eq!(not_empty.valid.name(), "not-empty");
    }

    #[test]
    fn empty_prefill_means_none() {
        let config = InputConfig::with_overrides(r#"{ "apiIn": "", "showUI": false }"#).unwrap();
        assert!(config.prefill.is_none());
        assert!(!config.show_ui);
    }

    #[test]
    fn output_overrides() {
        let config = OutputConfig::with_overrides(
            r#"{ "apiOut": "https://example.com/out", "apiMethod": "put", "downloadFileName": "result.json" }"#,
        )
        .unwrap();

        assert_eq!(
            config,
            OutputConfig {
                upload_target: Some(RemoteUrl::parse("https://example.com/out").unwrap()),
                upload_method: HttpMethod::new("PUT").unwrap(),
                download_filename: "result.json".to_string(),
                ..OutputConfig::default()
            }
        );
        assert!(!config.is_silent());
    }

    #[test]
    fn bad_overrides_are_rejected() {
        assert!(OutputConfig::with_overrides(r#"{ "apiOut": "ftp://x" }"#).is_err());
        assert!(InputConfig::with_overrides(r#"{ "valid": "yaml" }"#).is_err());
    }

    #[test]
    fn cli_flags_resolve_over_defaults() {
        let cli = CommandLineInput::parse_from([
            "dropio",
            "output",
            "--auto-copy",
            "--method",
            "patch",
            "--filename",
            "report.txt",
        ]);

        match SessionPlan::resolve(cli).unwrap() {
            SessionPlan::Output { config, source, .. } => {
                assert!(config.auto_copy);
                assert!(config.is_silent());
                assert_eq!(config.upload_method.as_str(), "PATCH");
                assert_eq!(config.download_filename, "report.txt");
                assert!(source.is_none());
            }
            other => panic!("expected output plan, got {:?}", other),
        }
    }

    #[test]
    fn headless_flag_disables_ui() {
        let cli = CommandLineInput::parse_from([
            "dropio",
            "input",
            "--headless",
            "--validator",
            "json",
        ]);

        match SessionPlan::resolve(cli).unwrap() {
            SessionPlan::Input(config) => {
                assert!(!config.show_ui);
                assert_eq!(config.valid.name(), "json");
            }
            other => panic!("expected input plan, got {:?}", other),
        }
    }
}
