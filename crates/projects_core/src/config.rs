//! Store configuration.
//!
//! # Responsibility
//! - Describe where the projects store lives.
//! - Load that description once from the process environment.
//!
//! # Invariants
//! - `data_dir` is absolute.
//! - `schema` is a plain identifier, so it is safe as a file stem.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_DIR_ENV: &str = "PROJECTS_DB_DIR";
pub const DB_SCHEMA_ENV: &str = "PROJECTS_DB_SCHEMA";
pub const DEFAULT_SCHEMA: &str = "projects";
const DB_FILE_EXTENSION: &str = "sqlite3";

/// Fixed configuration consumed by the connection provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    data_dir: PathBuf,
    schema: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    RelativeDataDir(PathBuf),
    InvalidSchema(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVar(name) => write!(f, "environment variable `{name}` is not set"),
            Self::RelativeDataDir(path) => write!(
                f,
                "store data directory must be absolute, got `{}`",
                path.display()
            ),
            Self::InvalidSchema(schema) => write!(
                f,
                "schema name `{schema}` must be non-empty and contain only [A-Za-z0-9_]"
            ),
        }
    }
}

impl Error for ConfigError {}

impl StoreConfig {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        schema: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = data_dir.into();
        let schema = schema.into();

        if !data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(data_dir));
        }
        if schema.is_empty()
            || !schema
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::InvalidSchema(schema));
        }

        Ok(Self { data_dir, schema })
    }

    /// Reads `PROJECTS_DB_DIR` and `PROJECTS_DB_SCHEMA` (default `projects`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = std::env::var_os(DB_DIR_ENV).ok_or(ConfigError::MissingVar(DB_DIR_ENV))?;
        let schema = std::env::var(DB_SCHEMA_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
        Self::new(PathBuf::from(data_dir), schema.trim())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// File backing this schema: `<data_dir>/<schema>.sqlite3`.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.{DB_FILE_EXTENSION}", self.schema))
    }

    /// Log-friendly description of the store target.
    pub fn target(&self) -> String {
        format!("sqlite://{}", self.database_path().display())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig};
    use std::path::PathBuf;

    fn absolute_dir() -> PathBuf {
        std::env::temp_dir().join("projects-config-test")
    }

    #[test]
    fn database_path_joins_schema_file() {
        let config = StoreConfig::new(absolute_dir(), "projects").unwrap();
        assert_eq!(
            config.database_path(),
            absolute_dir().join("projects.sqlite3")
        );
        assert!(config.target().starts_with("sqlite://"));
    }

    #[test]
    fn rejects_relative_dir() {
        let err = StoreConfig::new("data", "projects").unwrap_err();
        assert!(matches!(err, ConfigError::RelativeDataDir(_)));
    }

    #[test]
    fn rejects_schema_with_path_characters() {
        for schema in ["", "../etc", "a b", "proj.db"] {
            let err = StoreConfig::new(absolute_dir(), schema).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSchema(_)), "{schema}");
        }
    }
}
