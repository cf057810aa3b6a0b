//! Journey store: the in-memory document mirrored to its JSON file.
//!
//! # Responsibility
//! - Validate section and row mutations before they touch the document.
//! - Persist the full document after every successful mutation.
//!
//! # Invariants
//! - A mutation either persists and becomes visible, or leaves the in-memory
//!   document exactly as it was.
//! - Duplicate section detection ignores case; lookup by name is exact and
//!   picks the first match.
//! - Photostacks are deduplicated keeping first occurrence before validation.

use crate::input::dedup_preserving_order;
use crate::model::journey::{Document, Row, Section, ValidationError};
use crate::repo::document_repo::{DocumentRepository, RepoError};
use crate::repo::image_catalog::ImageCatalog;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by journey store operations. None is fatal.
#[derive(Debug)]
pub enum StoreError {
    /// Document file exists but could not be read or parsed.
    Load(RepoError),
    /// Writing the document failed; in-memory state was kept.
    Save(RepoError),
    /// A required field was missing.
    Validation(ValidationError),
    /// A section with the same name, ignoring case, already exists.
    DuplicateSection(String),
    SectionNotFound(String),
    RowNotFound { section: String, index: usize },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "error loading data: {err}"),
            Self::Save(err) => write!(f, "error saving data: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateSection(name) => {
                write!(f, "a section named `{name}` already exists")
            }
            Self::SectionNotFound(name) => write!(f, "section not found: `{name}`"),
            Self::RowNotFound { section, index } => {
                write!(f, "row {index} not found in section `{section}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) | Self::Save(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl StoreError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Load(_) => "load_failed",
            Self::Save(_) => "save_failed",
            Self::Validation(_) => "validation_failed",
            Self::DuplicateSection(_) => "duplicate_section",
            Self::SectionNotFound(_) => "section_not_found",
            Self::RowNotFound { .. } => "row_not_found",
        }
    }
}

/// Display projection of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub name: String,
    pub tags: Vec<String>,
    pub row_count: usize,
}

/// Owner of the working document, its repository and the image catalog.
pub struct JourneyStore<R: DocumentRepository> {
    repo: R,
    images: ImageCatalog,
    document: Document,
}

impl<R: DocumentRepository> JourneyStore<R> {
    /// Opens the store, failing when the document cannot be loaded.
    pub fn open(repo: R, images: ImageCatalog) -> StoreResult<Self> {
        let document = repo.load().map_err(StoreError::Load)?;
        Ok(Self {
            repo,
            images,
            document,
        })
    }

    /// Opens the store, substituting an empty document when loading fails.
    ///
    /// The load failure is returned next to the store so the caller can show it.
    pub fn open_or_empty(repo: R, images: ImageCatalog) -> (Self, Option<StoreError>) {
        match repo.load() {
            Ok(document) => (
                Self {
                    repo,
                    images,
                    document,
                },
                None,
            ),
            Err(err) => {
                warn!(
                    "event=document_load module=store status=warn fallback=empty error_code={}",
                    err.code()
                );
                (
                    Self {
                        repo,
                        images,
                        document: Document::empty(),
                    },
                    Some(StoreError::Load(err)),
                )
            }
        }
    }

    /// Current in-memory document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// First section named exactly `name`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.document.section(name)
    }

    /// Per-section overview in document order.
    pub fn summary(&self) -> Vec<SectionSummary> {
        self.document
            .sections
            .iter()
            .map(|section| SectionSummary {
                name: section.name.clone(),
                tags: section.tags.clone(),
                row_count: section.rows.len(),
            })
            .collect()
    }

    /// Reloads the document from the repository, replacing the working copy.
    ///
    /// On failure the working copy is kept.
    pub fn load_document(&mut self) -> StoreResult<&Document> {
        self.document = self.repo.load().map_err(StoreError::Load)?;
        Ok(&self.document)
    }

    /// Persists `document` and adopts it as the working copy on success.
    pub fn save_document(&mut self, document: Document) -> StoreResult<()> {
        self.repo.save(&document).map_err(StoreError::Save)?;
        self.document = document;
        Ok(())
    }

    /// Image filenames available for photostacks.
    pub fn list_images(&self) -> Vec<String> {
        self.images.list_images()
    }

    /// Appends a new section with no rows.
    pub fn add_section(&mut self, name: &str, tags: Vec<String>) -> StoreResult<()> {
        let section = Section::new(name, tags);
        let result = section
            .validate()
            .map_err(StoreError::from)
            .and_then(|()| {
                if self.document.has_section_ignore_case(name) {
                    return Err(StoreError::DuplicateSection(name.to_string()));
                }
                let mut next = self.document.clone();
                next.sections.push(section);
                self.commit(next)
            });
        self.log_outcome("section_add", &result);
        result
    }

    /// Appends a row to the first section named exactly `section_name`.
    pub fn add_row(
        &mut self,
        section_name: &str,
        title: &str,
        description: &str,
        images: Vec<String>,
    ) -> StoreResult<()> {
        let result = self.try_add_row(section_name, title, description, images);
        self.log_outcome("row_add", &result);
        result
    }

    /// Replaces title, description and photostack of one row.
    pub fn update_row(
        &mut self,
        section_name: &str,
        row_index: usize,
        title: &str,
        description: &str,
        images: Vec<String>,
    ) -> StoreResult<()> {
        let result = self.try_update_row(section_name, row_index, title, description, images);
        self.log_outcome("row_update", &result);
        result
    }

    /// Removes one row, shifting the following rows down.
    pub fn delete_row(&mut self, section_name: &str, row_index: usize) -> StoreResult<()> {
        let result = self.try_delete_row(section_name, row_index);
        self.log_outcome("row_delete", &result);
        result
    }

    /// Removes a section together with all its rows.
    pub fn delete_section(&mut self, section_name: &str) -> StoreResult<()> {
        let result = match self.document.section_position(section_name) {
            Some(position) => {
                let mut next = self.document.clone();
                next.sections.remove(position);
                self.commit(next)
            }
            None => Err(StoreError::SectionNotFound(section_name.to_string())),
        };
        self.log_outcome("section_delete", &result);
        result
    }

    fn try_add_row(
        &mut self,
        section_name: &str,
        title: &str,
        description: &str,
        images: Vec<String>,
    ) -> StoreResult<()> {
        let position = self.require_section(section_name)?;
        let row = Row::new(title, description, dedup_preserving_order(images));
        row.validate()?;

        let mut next = self.document.clone();
        next.sections[position].rows.push(row);
        self.commit(next)
    }

    fn try_update_row(
        &mut self,
        section_name: &str,
        row_index: usize,
        title: &str,
        description: &str,
        images: Vec<String>,
    ) -> StoreResult<()> {
        let position = self.require_row(section_name, row_index)?;
        let row = Row::new(title, description, dedup_preserving_order(images));
        row.validate()?;

        let mut next = self.document.clone();
        next.sections[position].rows[row_index] = row;
        self.commit(next)
    }

    fn try_delete_row(&mut self, section_name: &str, row_index: usize) -> StoreResult<()> {
        let position = self.require_row(section_name, row_index)?;

        let mut next = self.document.clone();
        next.sections[position].rows.remove(row_index);
        self.commit(next)
    }

    fn require_section(&self, section_name: &str) -> StoreResult<usize> {
        self.document
            .section_position(section_name)
            .ok_or_else(|| StoreError::SectionNotFound(section_name.to_string()))
    }

    fn require_row(&self, section_name: &str, row_index: usize) -> StoreResult<usize> {
        let position = self.require_section(section_name)?;
        if row_index >= self.document.sections[position].rows.len() {
            return Err(StoreError::RowNotFound {
                section: section_name.to_string(),
                index: row_index,
            });
        }
        Ok(position)
    }

    fn commit(&mut self, next: Document) -> StoreResult<()> {
        self.repo.save(&next).map_err(StoreError::Save)?;
        self.document = next;
        Ok(())
    }

    fn log_outcome(&self, event: &str, result: &StoreResult<()>) {
        match result {
            Ok(()) => info!(
                "event={} module=store status=ok sections={} rows={}",
                event,
                self.document.sections.len(),
                self.document.row_count()
            ),
            Err(err) => warn!(
                "event={} module=store status=error error_code={}",
                event,
                err.code()
            ),
        }
    }
}
