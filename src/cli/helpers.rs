//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use console::{style, StyledObject};
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::record::{StatusStyle, Tone};
use crate::core::workspace::Workspace;

/// Resolve the workspace for a command, honoring --workspace
pub fn open_workspace(global: &GlobalOpts) -> Result<Workspace> {
    let workspace = match &global.workspace {
        Some(root) => Workspace::discover_from(root),
        None => Workspace::discover(),
    };
    workspace.map_err(|e| miette::miette!("{}", e))
}

/// Paint a status label with its tone color
pub fn paint_status(status: &StatusStyle) -> StyledObject<&'static str> {
    paint(status.label, status.tone)
}

/// Paint arbitrary text with a tone color
pub fn paint<D>(text: D, tone: Tone) -> StyledObject<D> {
    match tone {
        Tone::Success => style(text).green(),
        Tone::Info => style(text).cyan(),
        Tone::Warning => style(text).yellow(),
        Tone::Danger => style(text).red(),
        Tone::Muted => style(text).dim(),
    }
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Print the dim separator line used by detail views
pub fn print_separator() {
    println!("{}", style("─".repeat(60)).dim());
}

/// Print one labeled field of a detail view
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<22} {}", style(label).bold(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        // char-based cut so a multibyte label never splits a code point
        assert_eq!(truncate_str("MacBook Pro 16\u{2033}", 10), "MacBook...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }
}
