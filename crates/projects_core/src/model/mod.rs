//! Domain model for projects and their children.
//!
//! # Responsibility
//! - Define the Project aggregate and its Material/Step/Category children.
//! - Provide the fixed-point `Decimal` used for hours and costs.
//!
//! # Invariants
//! - Entities carry no storage logic; row mapping lives in the repository layer.

pub mod decimal;
pub mod project;
