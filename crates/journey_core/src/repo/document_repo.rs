//! Document repository contract and JSON file implementation.
//!
//! # Responsibility
//! - Read the whole journey document from one JSON file.
//! - Write the whole document back, pretty-printed with 2-space indentation.
//!
//! # Invariants
//! - Save writes a uniquely named temp file next to the target and renames it
//!   over the target, so an interrupted write never truncates the previous
//!   document.
//! - A symlinked document is written through the link; its permissions are
//!   kept.
//! - Missing parent directories are created before writing.
//! - Load never substitutes data on malformed input; that choice belongs to
//!   the caller.

use crate::model::journey::Document;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const TEMP_FILE_PREFIX: &str = ".journey-";
const TEMP_FILE_SUFFIX: &str = ".tmp";

pub type RepoResult<T> = Result<T, RepoError>;

/// Filesystem step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    CreateDir,
    Write,
    Rename,
}

impl Display for IoAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Read => "read",
            Self::CreateDir => "create directory for",
            Self::Write => "write",
            Self::Rename => "replace",
        };
        f.write_str(label)
    }
}

/// Error for document persistence.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        action: IoAction,
        source: io::Error,
    },
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                path,
                action,
                source,
            } => write!(f, "failed to {action} `{}`: {source}", path.display()),
            Self::Malformed { path, source } => {
                write!(f, "malformed journey document `{}`: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode journey document: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl RepoError {
    fn io(path: &Path, action: IoAction, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            action,
            source,
        }
    }

    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_failed",
            Self::Malformed { .. } => "malformed_json",
            Self::Encode(_) => "encode_failed",
        }
    }
}

/// Whole-document persistence contract.
pub trait DocumentRepository {
    /// Loads the full document. A missing backing file yields an empty document.
    fn load(&self) -> RepoResult<Document>;
    /// Replaces the persisted document with `document`.
    fn save(&self, document: &Document) -> RepoResult<()>;
}

/// JSON file backed repository.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the save actually replaces.
    ///
    /// A symlinked document resolves to the file it points at, so the link
    /// itself survives the rename.
    fn write_target(&self) -> PathBuf {
        fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }

    fn write_replacing(&self, bytes: &[u8]) -> RepoResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| RepoError::io(&self.path, IoAction::CreateDir, err))?;
        }

        let target = self.write_target();
        let temp_dir = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX).suffix(TEMP_FILE_SUFFIX);
        if let Some(permissions) = temp_permissions(&target) {
            builder.permissions(permissions);
        }

        let mut temp = builder
            .tempfile_in(temp_dir)
            .map_err(|err| RepoError::io(&self.path, IoAction::Write, err))?;
        temp.write_all(bytes)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|err| RepoError::io(&self.path, IoAction::Write, err))?;

        // A failed persist drops the temp file, which removes it.
        temp.persist(&target)
            .map(|_| ())
            .map_err(|err| RepoError::io(&self.path, IoAction::Rename, err.error))
    }
}

/// Permissions for the replacement file: the current file's, or what a plain
/// create would get.
fn temp_permissions(target: &Path) -> Option<fs::Permissions> {
    match fs::metadata(target) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    // The process umask still applies on create.
    Some(fs::Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

impl DocumentRepository for JsonFileRepository {
    fn load(&self) -> RepoResult<Document> {
        let started_at = Instant::now();
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=document_load module=repo status=ok source=missing sections=0");
                return Ok(Document::empty());
            }
            Err(err) => {
                let err = RepoError::io(&self.path, IoAction::Read, err);
                error!(
                    "event=document_load module=repo status=error error_code={}",
                    err.code()
                );
                return Err(err);
            }
        };

        let document: Document = serde_json::from_str(&text).map_err(|source| {
            error!(
                "event=document_load module=repo status=error error_code=malformed_json line={} column={}",
                source.line(),
                source.column()
            );
            RepoError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        info!(
            "event=document_load module=repo status=ok source=file sections={} rows={} duration_ms={}",
            document.sections.len(),
            document.row_count(),
            started_at.elapsed().as_millis()
        );
        Ok(document)
    }

    fn save(&self, document: &Document) -> RepoResult<()> {
        let started_at = Instant::now();
        // serde_json's pretty printer indents with two spaces.
        let encoded = serde_json::to_string_pretty(document).map_err(RepoError::Encode)?;

        match self.write_replacing(encoded.as_bytes()) {
            Ok(()) => {
                info!(
                    "event=document_save module=repo status=ok sections={} rows={} bytes={} duration_ms={}",
                    document.sections.len(),
                    document.row_count(),
                    encoded.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=document_save module=repo status=error error_code={} duration_ms={}",
                    err.code(),
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}
