//! Command execution against the journey store.
//!
//! # Responsibility
//! - Open the store for one invocation and run a single command.
//! - Render results as plain text.
//!
//! # Invariants
//! - Mutating commands never run on a document that failed to load.

use crate::args::Command;
use journey_core::{
    open_store, DocumentRepository, JourneyStore, Row, StoreConfig, StoreError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

#[derive(Debug)]
pub enum CliError {
    Store(StoreError),
    /// The document failed to load and the command would overwrite it.
    RefusedOnLoadError(StoreError),
    Output(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::RefusedOnLoadError(err) => {
                write!(f, "{err}; refusing to modify the document until it loads")
            }
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) | Self::RefusedOnLoadError(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Output(value)
    }
}

/// Opens the store from `config` and runs `command`.
///
/// Load warnings for read-only commands go to `warnings`.
pub fn run(
    command: &Command,
    config: &StoreConfig,
    out: &mut impl Write,
    warnings: &mut impl Write,
) -> Result<(), CliError> {
    let (mut store, load_error) = open_store(config);
    if let Some(err) = load_error {
        if command.mutates() {
            return Err(CliError::RefusedOnLoadError(err));
        }
        writeln!(warnings, "warning: {err}; showing an empty document")?;
    }
    execute(command, &mut store, out)
}

/// Runs `command` against an already opened store.
pub fn execute<R: DocumentRepository>(
    command: &Command,
    store: &mut JourneyStore<R>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Show => render_document(store, out)?,
        Command::Images => {
            let images = store.list_images();
            if images.is_empty() {
                writeln!(out, "No images found.")?;
            }
            for image in images {
                writeln!(out, "{image}")?;
            }
        }
        Command::AddSection { name, tags } => {
            store.add_section(name, tags.clone())?;
            writeln!(out, "Section '{name}' created.")?;
        }
        Command::AddRow {
            section,
            title,
            description,
            images,
        } => {
            store.add_row(section, title, description, images.clone())?;
            writeln!(out, "Row '{title}' added to '{section}'.")?;
        }
        Command::UpdateRow {
            section,
            row_index,
            title,
            description,
            images,
        } => {
            let current = current_row(store, section, *row_index);
            let description = match description {
                Some(value) => value.clone(),
                None => current
                    .as_ref()
                    .map(|row| row.description.clone())
                    .unwrap_or_default(),
            };
            let images = match images {
                Some(images) => images.clone(),
                None => current.map(|row| row.photostack).unwrap_or_default(),
            };
            store.update_row(section, *row_index, title, &description, images)?;
            writeln!(out, "Row {} in '{section}' updated.", row_index + 1)?;
        }
        Command::DeleteRow { section, row_index } => {
            store.delete_row(section, *row_index)?;
            writeln!(out, "Row {} deleted from '{section}'.", row_index + 1)?;
        }
        Command::DeleteSection { section } => {
            store.delete_section(section)?;
            writeln!(out, "Section '{section}' deleted.")?;
        }
        Command::Version => writeln!(out, "journey {}", journey_core::core_version())?,
        Command::Help => writeln!(out, "{}", crate::args::USAGE)?,
    }
    Ok(())
}

// Missing rows fall through to the store, which reports them.
fn current_row<R: DocumentRepository>(
    store: &JourneyStore<R>,
    section: &str,
    row_index: usize,
) -> Option<Row> {
    store
        .section(section)
        .and_then(|section| section.rows.get(row_index))
        .cloned()
}

fn render_document<R: DocumentRepository>(
    store: &JourneyStore<R>,
    out: &mut impl Write,
) -> io::Result<()> {
    let document = store.document();
    if document.sections.is_empty() {
        return writeln!(out, "No sections found. Add your first section!");
    }

    for (summary, section) in store.summary().iter().zip(&document.sections) {
        writeln!(out, "{} ({} rows)", summary.name, summary.row_count)?;
        writeln!(out, "  Tags: {}", summary.tags.join(", "))?;
        for (index, row) in section.rows.iter().enumerate() {
            writeln!(out, "  Row {}: {}", index + 1, row.title)?;
            writeln!(out, "    Description: {}", row.description)?;
            writeln!(out, "    Images: {}", row.photostack.join(", "))?;
        }
    }
    Ok(())
}
