//! Core data operations for the journey data manager.
//! This crate owns the document model and every rule applied before a write.

pub mod config;
pub mod input;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{LogConfig, StoreConfig};
pub use input::{dedup_preserving_order, merge_photostack, parse_lines};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::journey::{Document, Row, Section, ValidationError};
pub use repo::document_repo::{
    DocumentRepository, IoAction, JsonFileRepository, RepoError, RepoResult,
};
pub use repo::image_catalog::{is_image_file_name, ImageCatalog};
pub use service::journey_store::{JourneyStore, SectionSummary, StoreError, StoreResult};

/// Opens a store over the JSON file and image directory named in `config`.
///
/// Load failures are returned as a warning next to a store holding an empty
/// document.
pub fn open_store(
    config: &StoreConfig,
) -> (JourneyStore<JsonFileRepository>, Option<StoreError>) {
    JourneyStore::open_or_empty(
        JsonFileRepository::new(config.document_path.clone()),
        ImageCatalog::new(config.image_dir.clone()),
    )
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
