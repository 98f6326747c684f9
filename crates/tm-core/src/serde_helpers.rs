//! Shared serde default functions for the config types.

pub(crate) fn default_migrations_dir() -> String {
    "migrations".to_string()
}

pub(crate) fn default_history_table() -> String {
    "tidemark_migration_history".to_string()
}

pub(crate) fn default_lock_timeout_secs() -> u64 {
    60
}
