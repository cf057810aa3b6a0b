//! Journey use-case services.
//!
//! # Responsibility
//! - Expose the create/read/update/delete operations any front end calls.
//! - Keep front ends decoupled from JSON and filesystem details.

pub mod journey_store;
