//! Data-access core for the projects store.
//! Projects, their materials, steps and categories live in one SQLite store;
//! every operation here is one connection and one transaction.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use db::{ConnectionError, ConnectionProvider, DbError, InitializeError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::decimal::{Decimal, ParseDecimalError};
pub use model::project::{Category, Material, Project, ProjectId, ProjectValidationError, Step};
pub use repo::project_repo::{ProjectRepository, RepoError, RepoResult, SqliteProjectRepository};
pub use service::project_service::{validate_difficulty, ProjectService, ServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Builds the repository for an already initialized store.
pub fn open_repository(config: StoreConfig) -> SqliteProjectRepository {
    SqliteProjectRepository::new(ConnectionProvider::new(config))
}
