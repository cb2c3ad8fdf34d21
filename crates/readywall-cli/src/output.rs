//! Terminal rendering

use anyhow::Result;
use readywall_client::{DashboardView, Notice};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Print any value as pretty JSON
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Left-aligned columns separated by two spaces
fn render_table(columns: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(line(columns.to_vec()));
    for row in rows {
        lines.push(line(row.iter().map(String::as_str).collect()));
    }
    lines
}

/// Print a table
pub fn table(columns: &[&str], rows: &[Vec<String>]) {
    for line in render_table(columns, rows) {
        println!("{line}");
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Flatten nested objects into `a.b.c: value` pairs
fn flatten(value: &Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(child, &path, out);
            }
        }
        Value::Array(items) => {
            let joined = items.iter().map(scalar).collect::<Vec<_>>().join(", ");
            out.push((prefix.to_string(), joined));
        }
        other => out.push((prefix.to_string(), scalar(other))),
    }
}

/// Print a record as `field: value` lines
pub fn detail(record: &Value) {
    let mut fields = Vec::new();
    flatten(record, "", &mut fields);
    let width = fields.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in fields {
        println!("{key:<width$}  {value}");
    }
}

/// Print per-value tallies on one line
pub fn counts(counts: &BTreeMap<String, usize>) {
    let line = counts
        .iter()
        .map(|(value, count)| format!("{value}: {count}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{line}");
}

/// Print the dashboard
pub fn dashboard(view: &DashboardView) {
    let counts = view.counts;
    table(
        &["USERS", "PRODUCTS", "BLOGS", "LEADS", "INQUIRIES"],
        &[vec![
            counts.users.to_string(),
            counts.products.to_string(),
            counts.blogs.to_string(),
            counts.leads.to_string(),
            counts.inquiries.to_string(),
        ]],
    );

    println!();
    println!("Recent activity");
    if view.activities.is_empty() {
        println!("  No recent activity");
    }
    for activity in &view.activities {
        match &activity.time {
            Some(time) => println!("  {}  {}  ({time})", activity.action, activity.description),
            None => println!("  {}  {}", activity.action, activity.description),
        }
    }

    if let Some(error) = &view.error {
        eprintln!();
        eprintln!("warning: {error}");
    }
}

/// Print a notice to stderr
pub fn notice(notice: &Notice) {
    eprintln!("[{}] {}", notice.level, notice.message);
}
