//! Persistence and filesystem lookups.
//!
//! # Responsibility
//! - Define the document load/save contract used by the store.
//! - Keep JSON encoding and file handling out of the store logic.
//! - Provide the read-only image catalog.
//!
//! # Invariants
//! - A missing document file is an empty document, not an error.
//! - Image listing never returns an error to the caller.

pub mod document_repo;
pub mod image_catalog;
