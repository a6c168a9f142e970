//! Target listing
//!
//! Rendering is pure: the table is only read, and the same table always
//! renders to the same text.

use crate::definition::{TargetDefinition, TargetTable};
use crate::runner::placeholders;
use colored::Colorize;

/// Documented targets as `(name, docstring)`, sorted by name
pub fn help_entries(table: &TargetTable) -> Vec<(&str, &str)> {
    let mut entries: Vec<(&str, &str)> = table
        .iter()
        .filter_map(|target| target.help().map(|doc| (target.name.as_str(), doc)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

/// Aligned two-column listing of documented targets
pub fn render_help(table: &TargetTable, color: bool) -> String {
    let entries = help_entries(table);
    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (name, doc) in entries {
        let padded = format!("{:<width$}", name, width = width);
        out.push_str(&format!("  {}  {}\n", paint(&padded, color), doc));
    }
    out
}

/// Every target in declaration order, with dependencies, markers and the
/// variables its body references
pub fn render_targets_verbose(table: &TargetTable, color: bool) -> String {
    let width = table.names().map(str::len).max().unwrap_or(0);

    let mut out = String::new();
    for target in table.iter() {
        let padded = format!("{:<width$}", target.name, width = width);
        let line = format!("  {}  {}", paint(&padded, color), target.help().unwrap_or(""));
        out.push_str(line.trim_end());
        out.push('\n');
        for detail in details(target) {
            out.push_str(&format!("  {:<width$}    {}\n", "", detail, width = width));
        }
    }
    out
}

fn details(target: &TargetDefinition) -> Vec<String> {
    let mut details = Vec::new();

    if !target.dependencies.is_empty() {
        details.push(format!("depends on: {}", target.dependencies.join(", ")));
    }

    let mut flags = Vec::new();
    if target.phony {
        flags.push("phony");
    }
    if target.best_effort {
        flags.push("best-effort");
    }
    if target.is_bodyless() {
        flags.push("no commands");
    }
    if !flags.is_empty() {
        details.push(flags.join(", "));
    }

    if let Some(dir) = &target.working_dir {
        details.push(format!("runs in: {}", dir));
    }

    let mut vars: Vec<String> = Vec::new();
    for line in target.body.iter().chain(target.working_dir.iter()) {
        for name in placeholders(line) {
            if !vars.contains(&name) {
                vars.push(name);
            }
        }
    }
    if !vars.is_empty() {
        details.push(format!("uses: {}", vars.join(", ")));
    }

    details
}

fn paint(text: &str, color: bool) -> String {
    if color {
        text.cyan().bold().to_string()
    } else {
        text.to_string()
    }
}
