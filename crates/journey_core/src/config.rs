//! Store and logging configuration.
//!
//! # Responsibility
//! - Resolve the document path, image directory and log settings.
//!
//! # Invariants
//! - Precedence is built-in default, then environment, then explicit override.
//! - Environment access goes through a lookup function, never `set_var`.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};

pub const DEFAULT_DOCUMENT_PATH: &str = "../src/data/journey-data.json";
pub const DEFAULT_IMAGE_DIR: &str = "../src/assets";
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";

pub const ENV_DOCUMENT_PATH: &str = "JOURNEY_DATA_PATH";
pub const ENV_IMAGE_DIR: &str = "JOURNEY_ASSETS_DIR";
pub const ENV_LOG_LEVEL: &str = "JOURNEY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "JOURNEY_LOG_DIR";

/// Locations the journey store reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub document_path: PathBuf,
    pub image_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from(DEFAULT_DOCUMENT_PATH),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
        }
    }
}

impl StoreConfig {
    /// Applies environment overrides on top of the defaults.
    ///
    /// `lookup` is usually `|key| std::env::var(key).ok()`.
    pub fn from_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = non_blank(lookup(ENV_DOCUMENT_PATH)) {
            config.document_path = PathBuf::from(path);
        }
        if let Some(dir) = non_blank(lookup(ENV_IMAGE_DIR)) {
            config.image_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn with_document_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.document_path = path.into();
        self
    }

    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }
}

/// Settings handed to [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Must be absolute by the time logging starts.
    pub log_dir: PathBuf,
}

impl LogConfig {
    /// Resolves log settings from the environment.
    ///
    /// Without `JOURNEY_LOG_DIR`, logs go to `<base_dir>/logs`. A relative
    /// `JOURNEY_LOG_DIR` is resolved against `base_dir`.
    pub fn from_env<F>(base_dir: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = non_blank(lookup(ENV_LOG_LEVEL))
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = non_blank(lookup(ENV_LOG_DIR))
            .map(|dir| base_dir.join(dir))
            .unwrap_or_else(|| base_dir.join(DEFAULT_LOG_DIR_NAME));
        Self { level, log_dir }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
