//! Migrate command implementation

use anyhow::{Context, Result};
use tm_migrate::{FileState, MigrationPlan, MigrationReport, Migrator, MigratorOptions};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::print_table;
use crate::context::RuntimeContext;

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrator =
        Migrator::with_options(ctx.db(), MigratorOptions::from_config(&ctx.config))?;

    if args.dry_run {
        let plan = migrator.plan(&ctx.migrations_dir).await.with_context(|| {
            format!("Failed to plan migrations in {}", ctx.migrations_dir.display())
        })?;
        print_plan(&plan);
        return Ok(());
    }

    let report = migrator.run(&ctx.migrations_dir).await.with_context(|| {
        format!("Migration of {} failed", ctx.migrations_dir.display())
    })?;
    print_report(&report);
    Ok(())
}

fn print_plan(plan: &MigrationPlan) {
    if plan.files.is_empty() {
        println!("No migration files found.");
        return;
    }

    let mut rank = plan.start_rank;
    let rows: Vec<Vec<String>> = plan
        .files
        .iter()
        .map(|planned| {
            let next_rank = match planned.state {
                FileState::Pending => {
                    rank += 1;
                    rank.to_string()
                }
                _ => "-".to_string(),
            };
            vec![
                next_rank,
                planned.file.filename.clone(),
                planned.state.label().to_string(),
            ]
        })
        .collect();

    print_table(&["Rank", "Filename", "State"], &rows);
    println!();
    println!("Dry run - {} migration(s) would be applied", plan.pending_count());
}

fn print_report(report: &MigrationReport) {
    for name in &report.skipped_before_resume_point {
        println!("  Skipped (before resume point): {name}");
    }

    if report.applied.is_empty() {
        println!("Database is up to date, no migrations applied.");
        return;
    }

    for record in &report.applied {
        println!(
            "  Applied {} ({} ms)",
            record.filename, record.execution_time_ms
        );
    }
    println!();
    println!(
        "Applied {} migration(s) in {} ms",
        report.applied_count(),
        report.elapsed.as_millis()
    );
}
