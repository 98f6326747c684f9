//! Restore command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the restore command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let restored = tm_migrate::restore(ctx.db(), &ctx.config.history_table)
        .await
        .context("Failed to restore failed migrations")?;

    if restored == 0 {
        println!("No records to restore.");
    } else {
        println!("{restored} record(s) restored.");
    }
    Ok(())
}
