//! Journey document model.
//!
//! # Responsibility
//! - Define the persisted shape of the journey document.
//! - Keep presence validation next to the data it guards.
//!
//! # Invariants
//! - The document exclusively owns its sections, and each section owns its rows.
//! - Field names match the on-disk JSON schema exactly.

pub mod journey;
