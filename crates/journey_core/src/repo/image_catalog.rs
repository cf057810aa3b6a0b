//! Image filename catalog.
//!
//! # Responsibility
//! - List image filenames available for photostacks.
//!
//! # Invariants
//! - Only names are returned, never full paths or file contents.
//! - Results are sorted ascending and never surface an error.
//! - An unreadable entry is skipped; the remaining entries are still listed.

use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::PathBuf;

static IMAGE_EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(webp|jpe?g|png)$").expect("valid image extension regex"));

/// Returns whether `file_name` carries one of the accepted image extensions.
pub fn is_image_file_name(file_name: &str) -> bool {
    IMAGE_EXTENSION_RE.is_match(file_name)
}

/// Read-only view over a directory of image assets.
#[derive(Debug, Clone)]
pub struct ImageCatalog {
    dir: PathBuf,
}

impl ImageCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Lists image filenames in the catalog directory.
    ///
    /// A missing or unreadable directory yields an empty list; the failure is
    /// logged at `warn` instead.
    pub fn list_images(&self) -> Vec<String> {
        match self.scan() {
            Ok(images) => {
                info!(
                    "event=image_list module=repo status=ok count={}",
                    images.len()
                );
                images
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=image_list module=repo status=ok source=missing count=0");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=image_list module=repo status=warn error_code=dir_unreadable error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    fn scan(&self) -> io::Result<Vec<String>> {
        let mut images = Vec::new();
        for entry in readable_entries(fs::read_dir(&self.dir)?) {
            if entry.path().is_dir() {
                continue;
            }
            // Non UTF-8 names cannot be stored in the JSON photostack.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if is_image_file_name(&name) {
                images.push(name);
            }
        }
        images.sort();
        Ok(images)
    }
}

/// Drops entries that failed to read, so one bad entry does not hide the rest.
fn readable_entries<T>(
    entries: impl IntoIterator<Item = io::Result<T>>,
) -> impl Iterator<Item = T> {
    entries.into_iter().filter_map(|entry| match entry {
        Ok(entry) => Some(entry),
        Err(err) => {
            warn!(
                "event=image_list module=repo status=warn error_code=entry_unreadable error={}",
                err
            );
            None
        }
    })
}
