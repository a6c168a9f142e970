//! Terminal styling
//!
//! Colour is applied through `colored`, which honours `NO_COLOR`;
//! `--no-color` turns it off for the whole process.

use colored::{ColoredString, Colorize};

/// Turn colour output off for the rest of the process
pub fn disable_color() {
    colored::control::set_override(false);
}

pub fn tag_run() -> ColoredString {
    "[RUN]".bold()
}

pub fn tag_info() -> ColoredString {
    "[INFO]".green()
}

pub fn tag_warn() -> ColoredString {
    "[WARN]".yellow()
}

pub fn tag_debug() -> ColoredString {
    "[DEBUG]".dimmed()
}

pub fn target_name(name: &str) -> ColoredString {
    name.cyan().bold()
}

/// Top-level error line printed by the binary
pub fn error_line(message: &str) -> String {
    format!("{} {}", "Error:".red().bold(), message)
}
