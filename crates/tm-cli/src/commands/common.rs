//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;

/// Timestamp rendering for tables
pub(crate) const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Render a `|`-separated table with a dashed rule under the header
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = calculate_column_widths(headers, rows);
    let line = |cells: Vec<String>| cells.join(" | ").trim_end().to_string();

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(
        headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| format!("{:<width$}", h, width = w))
            .collect(),
    ));
    out.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in rows {
        out.push(line(
            row.iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
                .collect(),
        ));
    }
    out.join("\n")
}

pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", format_table(headers, rows));
}

pub(crate) fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
