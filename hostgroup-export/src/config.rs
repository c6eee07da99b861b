//! Run configuration.
//!
//! An [`ExportConfig`] is built once at startup, optionally from a TOML file,
//! then overridden by command-line flags and shared read-only for the rest of
//! the run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Substring an input archive name must contain (case-insensitive).
pub const DEFAULT_ARCHIVE_MARKER: &str = "api-";

/// Log filter used when neither `RUST_LOG` nor `-v` is given.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings for one export run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory searched for the input archive. `None` means the working directory.
    pub source_dir: Option<PathBuf>,
    /// Directory receiving `<export-name>.tar`. `None` means the working directory.
    pub output_dir: Option<PathBuf>,
    pub archive_marker: String,
    pub log_filter: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            output_dir: None,
            archive_marker: DEFAULT_ARCHIVE_MARKER.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ExportConfig {
    /// Directory to search for input archives.
    pub fn source_dir(&self) -> &Path {
        self.source_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }

    /// Path of the output archive for a sanitized export name.
    pub fn output_path(&self, export_name: &str) -> PathBuf {
        let file_name = format!("{export_name}.tar");
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// Errors returned when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load a configuration from a TOML file. Missing keys keep their defaults.
pub fn load_config(path: &Path) -> Result<ExportConfig, ConfigLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&raw, path.display().to_string())
}

fn parse_config(raw: &str, path: String) -> Result<ExportConfig, ConfigLoadError> {
    toml::from_str(raw).map_err(|source| ConfigLoadError::Parse { path, source })
}
