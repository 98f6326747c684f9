//! Status command implementation

use anyhow::{Context, Result};
use tm_core::HistoryRecord;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{print_json, print_table, DISPLAY_TIME_FORMAT};
use crate::context::RuntimeContext;

const HEADERS: [&str; 5] = [
    "Rank",
    "Filename",
    "Installed On",
    "Execution Time (ms)",
    "Success",
];

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let records = tm_migrate::status(ctx.db(), &ctx.config.history_table)
        .await
        .context("Failed to read migration history")?;

    match args.output {
        StatusOutput::Table => {
            println!("Migration Status:");
            print_table(&HEADERS, &table_rows(&records));
        }
        StatusOutput::Json => print_json(&records)?,
    }
    Ok(())
}

fn table_rows(records: &[HistoryRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.installed_rank.to_string(),
                r.filename.clone(),
                r.installed_on.format(DISPLAY_TIME_FORMAT).to_string(),
                r.execution_time_ms.to_string(),
                r.success_label().to_string(),
            ]
        })
        .collect()
}
