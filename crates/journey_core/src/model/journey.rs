//! Document, section and row records.
//!
//! # Responsibility
//! - Mirror the `{"sections": [...]}` JSON file 1:1.
//! - Provide presence checks used before any mutation is persisted.
//!
//! # Invariants
//! - `sections`, `tags`, `rows` and `photostack` default to empty when a key
//!   is missing from the file.
//! - A row accepted by `Row::validate` has a non-blank title and at least one
//!   image.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Root persisted object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Sections in insertion order.
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Named grouping of rows with free-form tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Serialized as `section` to match the external schema.
    #[serde(rename = "section")]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// One entry within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ordered image filenames rendered as a stacked gallery.
    #[serde(default)]
    pub photostack: Vec<String>,
}

/// Presence-check failures for user-supplied fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptySectionName,
    EmptyTitle,
    EmptyPhotostack,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySectionName => write!(f, "section name is required"),
            Self::EmptyTitle => write!(f, "row title is required"),
            Self::EmptyPhotostack => write!(f, "at least one image is required"),
        }
    }
}

impl Error for ValidationError {}

impl Document {
    /// Creates a document with no sections.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the first section whose name equals `name` exactly.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Position of the first section named exactly `name`.
    pub fn section_position(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.name == name)
    }

    /// Whether any section name matches `name` ignoring case.
    pub fn has_section_ignore_case(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.sections
            .iter()
            .any(|section| section.name.to_lowercase() == wanted)
    }

    /// Total number of rows across all sections.
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|section| section.rows.len()).sum()
    }
}

impl Section {
    /// Creates a section with the given tags and no rows.
    pub fn new(name: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            name: name.into(),
            tags,
            rows: Vec::new(),
        }
    }

    /// Rejects an empty section name. Whitespace is kept as typed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptySectionName);
        }
        Ok(())
    }
}

impl Row {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        photostack: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            photostack,
        }
    }

    /// Checks presence of the title and at least one image.
    ///
    /// Title is checked first so an empty form reports the title problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.photostack.is_empty() {
            return Err(ValidationError::EmptyPhotostack);
        }
        Ok(())
    }
}
