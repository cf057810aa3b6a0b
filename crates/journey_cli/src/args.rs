//! Command-line argument parsing.
//!
//! # Invariants
//! - Row numbers are 1-based on the command line and 0-based once parsed.
//! - `--image` values precede `--images-text` entries in the parsed list.

use journey_core::{merge_photostack, parse_lines};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const USAGE: &str = "\
usage: journey [--data PATH] [--assets DIR] [--log-dir DIR] [--log-level LEVEL] <command>

commands:
  show
  images
  add-section <name> [--tag TAG]... [--tags-text TEXT]
  add-row <section> <title> [--description TEXT] [--image FILE]... [--images-text TEXT]
  update-row <section> <row-number> <title> [--description TEXT] [--image FILE]... [--images-text TEXT]
      (omitted --description or image options keep the row's current values)
  delete-row <section> <row-number>
  delete-section <section>
  version
  help";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Images,
    AddSection {
        name: String,
        tags: Vec<String>,
    },
    AddRow {
        section: String,
        title: String,
        description: String,
        images: Vec<String>,
    },
    UpdateRow {
        section: String,
        row_index: usize,
        title: String,
        /// `None` keeps the current description.
        description: Option<String>,
        /// `None` keeps the current photostack.
        images: Option<Vec<String>>,
    },
    DeleteRow {
        section: String,
        row_index: usize,
    },
    DeleteSection {
        section: String,
    },
    Version,
    Help,
}

impl Command {
    /// Whether running the command writes the document.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::AddSection { .. }
                | Self::AddRow { .. }
                | Self::UpdateRow { .. }
                | Self::DeleteRow { .. }
                | Self::DeleteSection { .. }
        )
    }
}

/// Fully parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub data: Option<PathBuf>,
    pub assets: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(String);

impl Display for UsageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for UsageError {}

fn usage(message: impl Into<String>) -> UsageError {
    UsageError(message.into())
}

#[derive(Default)]
struct RawArgs {
    positionals: Vec<String>,
    data: Option<PathBuf>,
    assets: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    log_level: Option<String>,
    tags: Vec<String>,
    tags_text: Option<String>,
    images: Vec<String>,
    images_text: Option<String>,
    description: Option<String>,
}

impl RawArgs {
    fn has_tag_flags(&self) -> bool {
        !self.tags.is_empty() || self.tags_text.is_some()
    }

    fn has_image_flags(&self) -> bool {
        !self.images.is_empty() || self.images_text.is_some()
    }

    fn has_row_flags(&self) -> bool {
        self.has_image_flags() || self.description.is_some()
    }

    fn photostack(&self) -> Vec<String> {
        let manual = self
            .images_text
            .as_deref()
            .map(parse_lines)
            .unwrap_or_default();
        merge_photostack(&self.images, &manual)
    }

    fn tag_list(&self) -> Vec<String> {
        let mut tags = self.tags.clone();
        if let Some(text) = self.tags_text.as_deref() {
            tags.extend(parse_lines(text));
        }
        tags
    }
}

/// Parses arguments without the program name.
pub fn parse_args<I>(args: I) -> Result<Cli, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let raw = collect(args)?;
    let command = build_command(&raw)?;
    Ok(Cli {
        data: raw.data,
        assets: raw.assets,
        log_dir: raw.log_dir,
        log_level: raw.log_level,
        command,
    })
}

fn collect<I>(args: I) -> Result<RawArgs, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut raw = RawArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "-h" || arg == "--help" {
            raw.positionals.insert(0, "help".to_string());
            continue;
        }
        if !arg.starts_with("--") {
            raw.positionals.push(arg);
            continue;
        }

        let value = args
            .next()
            .ok_or_else(|| usage(format!("missing value for `{arg}`")))?;
        match arg.as_str() {
            "--data" => raw.data = Some(PathBuf::from(value)),
            "--assets" => raw.assets = Some(PathBuf::from(value)),
            "--log-dir" => raw.log_dir = Some(PathBuf::from(value)),
            "--log-level" => raw.log_level = Some(value),
            "--tag" => raw.tags.push(value.trim().to_string()),
            "--tags-text" => raw.tags_text = Some(value),
            "--image" => raw.images.push(value.trim().to_string()),
            "--images-text" => raw.images_text = Some(value),
            "--description" => raw.description = Some(value),
            other => return Err(usage(format!("unknown option `{other}`"))),
        }
    }

    Ok(raw)
}

fn build_command(raw: &RawArgs) -> Result<Command, UsageError> {
    let Some((name, rest)) = raw.positionals.split_first() else {
        return Err(usage("missing command"));
    };

    let command = match name.as_str() {
        "help" => return Ok(Command::Help),
        "show" => {
            expect_arity(name, rest, 0)?;
            Command::Show
        }
        "images" => {
            expect_arity(name, rest, 0)?;
            Command::Images
        }
        "version" => {
            expect_arity(name, rest, 0)?;
            Command::Version
        }
        "add-section" => {
            expect_arity(name, rest, 1)?;
            Command::AddSection {
                name: rest[0].clone(),
                tags: raw.tag_list(),
            }
        }
        "add-row" => {
            expect_arity(name, rest, 2)?;
            Command::AddRow {
                section: rest[0].clone(),
                title: rest[1].clone(),
                description: raw.description.clone().unwrap_or_default(),
                images: raw.photostack(),
            }
        }
        "update-row" => {
            expect_arity(name, rest, 3)?;
            Command::UpdateRow {
                section: rest[0].clone(),
                row_index: parse_row_number(&rest[1])?,
                title: rest[2].clone(),
                description: raw.description.clone(),
                images: raw.has_image_flags().then(|| raw.photostack()),
            }
        }
        "delete-row" => {
            expect_arity(name, rest, 2)?;
            Command::DeleteRow {
                section: rest[0].clone(),
                row_index: parse_row_number(&rest[1])?,
            }
        }
        "delete-section" => {
            expect_arity(name, rest, 1)?;
            Command::DeleteSection {
                section: rest[0].clone(),
            }
        }
        other => return Err(usage(format!("unknown command `{other}`"))),
    };

    let takes_tags = matches!(command, Command::AddSection { .. });
    let takes_row_fields = matches!(command, Command::AddRow { .. } | Command::UpdateRow { .. });
    if raw.has_tag_flags() && !takes_tags {
        return Err(usage(format!("`{name}` does not accept tag options")));
    }
    if raw.has_row_flags() && !takes_row_fields {
        return Err(usage(format!("`{name}` does not accept row options")));
    }

    Ok(command)
}

fn expect_arity(name: &str, rest: &[String], expected: usize) -> Result<(), UsageError> {
    if rest.len() != expected {
        return Err(usage(format!(
            "`{name}` takes {expected} argument(s), got {}",
            rest.len()
        )));
    }
    Ok(())
}

fn parse_row_number(value: &str) -> Result<usize, UsageError> {
    match value.trim().parse::<usize>() {
        Ok(number) if number >= 1 => Ok(number - 1),
        _ => Err(usage(format!(
            "row number must be a positive integer, got `{value}`"
        ))),
    }
}
