//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::{default_history_table, default_lock_timeout_secs, default_migrations_dir};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable selecting a named target
pub const TARGET_ENV: &str = "TIDEMARK_TARGET";

/// Environment variable overriding `database.type`
pub const DATABASE_TYPE_ENV: &str = "TIDEMARK_DATABASE_TYPE";

/// Environment variable overriding `database.path`
pub const DATABASE_PATH_ENV: &str = "TIDEMARK_DATABASE_PATH";

/// Environment variable overriding `migrations_dir`
pub const MIGRATIONS_DIR_ENV: &str = "TIDEMARK_MIGRATIONS_DIR";

const CONFIG_FILE_NAMES: &[&str] = &["tidemark.yml", "tidemark.yaml"];

/// Main configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing the `.sql` migration files
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Name of the relation that stores the migration history
    #[serde(default = "default_history_table")]
    pub history_table: String,

    /// How long to wait for another process to release the migration lock
    #[serde(default = "default_lock_timeout_secs")]
    pub lock_timeout_secs: u64,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Named target configurations (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            history_table: default_history_table(),
            lock_timeout_secs: default_lock_timeout_secs(),
            database: DatabaseConfig::default(),
            targets: HashMap::new(),
        }
    }
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Migrations directory override
    #[serde(default)]
    pub migrations_dir: Option<String>,
}

/// Database backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// SQLite
    Sqlite,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
            DbType::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for DbType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duckdb" => Ok(DbType::DuckDb),
            "sqlite" | "sqlite3" => Ok(DbType::Sqlite),
            other => Err(CoreError::ConfigInvalid {
                message: format!("unsupported database type '{other}' (expected duckdb or sqlite)"),
            }),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type (duckdb or sqlite)
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database file path, or `:memory:`. Relative paths resolve against the
    /// project directory.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

/// Database file used when neither config, environment, nor flags name one
pub const DEFAULT_DB_PATH: &str = "tidemark.duckdb";

/// Path that selects a throwaway in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }

    /// Copy of this config with a relative file path joined onto `root`
    pub fn resolved_against(&self, root: &Path) -> DatabaseConfig {
        let path = Path::new(&self.path);
        if self.is_in_memory() || path.is_absolute() {
            return self.clone();
        }
        DatabaseConfig {
            db_type: self.db_type,
            path: root.join(path).display().to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match Self::find_config_file(dir) {
            Some(path) => Self::load(&path),
            None => Err(CoreError::ConfigNotFound {
                path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
            }),
        }
    }

    /// Like [`load_from_dir`](Self::load_from_dir), but falls back to the
    /// defaults when the directory has no config file.
    pub fn load_from_dir_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::find_config_file(dir) {
            Some(path) => Self::load(&path),
            None => {
                log::warn!(
                    "No {} found in {}, using defaults (database {})",
                    CONFIG_FILE_NAMES[0],
                    dir.display(),
                    dir.join(DEFAULT_DB_PATH).display()
                );
                Ok(Self::default())
            }
        }
    }

    fn find_config_file(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }

        if !is_plain_identifier(&self.history_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "history_table '{}' must be a plain SQL identifier (letters, digits, underscores)",
                    self.history_table
                ),
            });
        }

        if self.lock_timeout_secs == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "lock_timeout_secs must be greater than zero".to_string(),
            });
        }

        validate_database(&self.database, "database")?;
        for (name, target) in &self.targets {
            if let Some(db) = &target.database {
                validate_database(db, &format!("targets.{name}.database"))?;
            }
        }

        Ok(())
    }

    /// Get the list of available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Fold a named target's overrides into the base configuration.
    ///
    /// `None` leaves the configuration untouched.
    pub fn apply_target(&mut self, target: Option<&str>) -> CoreResult<()> {
        let Some(name) = target else {
            return Ok(());
        };

        let target_config = self
            .targets
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::ConfigInvalid {
                message: format!(
                    "Target '{}' not found. Available targets: {}",
                    name,
                    self.available_targets().join(", ")
                ),
            })?;

        if let Some(database) = target_config.database {
            self.database = database;
        }
        if let Some(dir) = target_config.migrations_dir {
            self.migrations_dir = dir;
        }
        Ok(())
    }

    /// Apply `TIDEMARK_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> CoreResult<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(db_type) = non_empty(DATABASE_TYPE_ENV) {
            self.database.db_type = db_type.parse()?;
        }
        if let Some(path) = non_empty(DATABASE_PATH_ENV) {
            self.database.path = path;
        }
        if let Some(dir) = non_empty(MIGRATIONS_DIR_ENV) {
            self.migrations_dir = dir;
        }
        Ok(())
    }

    /// Get the absolute migrations directory relative to a project root
    pub fn migrations_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    /// Name of the lock relation paired with the history relation
    pub fn lock_table(&self) -> String {
        format!("{}_lock", self.history_table)
    }

    /// Resolve target from CLI flag or TIDEMARK_TARGET environment variable
    ///
    /// Priority: CLI flag > TIDEMARK_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV).ok().filter(|v| !v.is_empty()))
    }
}

fn validate_database(db: &DatabaseConfig, field: &str) -> CoreResult<()> {
    if db.path.trim().is_empty() {
        return Err(CoreError::ConfigInvalid {
            message: format!("{field}.path cannot be empty"),
        });
    }
    Ok(())
}

/// Returns true for identifiers that are safe to interpolate into DDL
/// without quoting.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
