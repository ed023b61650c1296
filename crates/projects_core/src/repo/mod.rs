//! Repository layer over the data-access core.
//!
//! # Responsibility
//! - Define use-case oriented persistence contracts for projects.
//! - Keep SQL text and row mapping inside the core persistence boundary.
//!
//! # Invariants
//! - Repository writes validate entities before persistence.
//! - Each repository call is exactly one connection and one transaction.

pub mod mapping;
pub mod project_repo;
