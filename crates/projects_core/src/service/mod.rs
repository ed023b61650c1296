//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep shell/CLI layers decoupled from storage details.

pub mod project_service;
