//! Unlock command implementation

use anyhow::{Context, Result};
use std::time::Duration;
use tm_migrate::MigrationLock;

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the unlock command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let lock = MigrationLock::new(
        ctx.db(),
        ctx.config.lock_table(),
        Duration::from_secs(ctx.config.lock_timeout_secs),
    );

    lock.ensure_schema()
        .await
        .context("Failed to prepare the migration lock table")?;
    if let Some(holder) = lock.holder().await? {
        log::info!(
            "Clearing lock held by {} since {}",
            holder.owner,
            holder.acquired_at
        );
    }

    let released = lock
        .force_release()
        .await
        .context("Failed to clear the migration lock")?;
    if released {
        println!("Migration lock released.");
    } else {
        println!("No migration lock was held.");
    }
    Ok(())
}
