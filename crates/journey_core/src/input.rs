//! Form input normalization.
//!
//! # Responsibility
//! - Turn one-entry-per-line text into trimmed values.
//! - Merge chosen and manually typed image names into one photostack.
//!
//! # Invariants
//! - Output never contains blank entries from line parsing.
//! - Photostack merge keeps the first position of every filename.

use std::collections::HashSet;

/// Splits `text` on newlines, trims every entry and drops blank ones.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Removes later duplicates while keeping first-occurrence order.
pub fn dedup_preserving_order<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Builds a photostack from catalog picks followed by manual entries.
pub fn merge_photostack(chosen: &[String], manual: &[String]) -> Vec<String> {
    dedup_preserving_order(chosen.iter().chain(manual.iter()).cloned())
}
