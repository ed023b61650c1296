//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured store, creating its schema when missing.
//! - List stored projects as `id : name` lines.
//! - Report configuration and store failures on stderr with exit code 1.

use log::info;
use projects_core::logging::{LOG_DIR_ENV, LOG_LEVEL_ENV};
use projects_core::{
    core_version, default_log_level, init_logging, open_repository, ConnectionProvider,
    ProjectService, StoreConfig,
};
use std::error::Error;

fn main() {
    if let Err(err) = run() {
        eprintln!("projects: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = StoreConfig::from_env()?;

    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        let level =
            std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&level, &log_dir)?;
    }

    let provider = ConnectionProvider::new(config.clone());
    provider.initialize()?;
    info!(
        "event=cli_start module=cli status=ok target={} version={}",
        provider.config().target(),
        core_version()
    );

    let service = ProjectService::new(open_repository(config));
    let projects = service.fetch_all_projects()?;
    if projects.is_empty() {
        println!("no projects stored");
    }
    for project in projects {
        println!("{project}");
    }
    Ok(())
}
