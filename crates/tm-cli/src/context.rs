//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tm_core::Config;
use tm_db::Database;

use crate::cli::GlobalArgs;

/// Resolved configuration plus an open database connection
pub(crate) struct RuntimeContext {
    /// Effective configuration after target, environment, and flag overrides,
    /// with the database path resolved against the project directory
    pub config: Config,

    /// Migrations directory, resolved against the project directory
    pub migrations_dir: PathBuf,

    /// Database connection
    pub db: Box<dyn Database>,
}

impl RuntimeContext {
    /// Resolve configuration from global arguments and connect
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let mut config = resolve_config(args)?;
        let project_dir = Path::new(&args.project_dir);
        let migrations_dir = config.migrations_dir_absolute(project_dir);
        config.database = config.database.resolved_against(project_dir);
        if config.database.is_in_memory() {
            log::warn!("Using an in-memory database; nothing will be persisted");
        }

        let db = tm_db::connect(&config.database).with_context(|| {
            format!(
                "Failed to connect to {} database at {}",
                config.database.db_type, config.database.path
            )
        })?;

        Ok(Self {
            config,
            migrations_dir,
            db,
        })
    }

    pub fn db(&self) -> &dyn Database {
        self.db.as_ref()
    }
}

/// Build the effective configuration.
///
/// Layers, lowest to highest: config file (or defaults), selected target,
/// `TIDEMARK_*` environment variables, command-line flags.
pub(crate) fn resolve_config(args: &GlobalArgs) -> Result<Config> {
    let project_path = Path::new(&args.project_dir);

    let mut config = if let Some(config_path) = &args.config {
        Config::load(Path::new(config_path)).context("Failed to load configuration file")?
    } else {
        Config::load_from_dir_or_default(project_path)
            .context("Failed to load project configuration")?
    };

    let target = Config::resolve_target(args.target.as_deref());
    config
        .apply_target(target.as_deref())
        .context("Failed to apply target")?;
    if let Some(name) = &target {
        log::debug!("Using target '{name}'");
    }

    config
        .apply_env_overrides()
        .context("Invalid environment override")?;

    if let Some(path) = &args.database {
        config.database.path = path.clone();
    }
    if let Some(dir) = &args.migrations_dir {
        config.migrations_dir = dir.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
