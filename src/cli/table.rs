//! Table rendering for CLI list commands
//!
//! One cell model shared by every list view so ID styling, status colors,
//! and column padding stay consistent across record types. Machine formats
//! (CSV, TSV) reuse the same rows without colors or padding.

use chrono::NaiveDate;
use console::style;

use crate::cli::helpers::{escape_csv, paint, truncate_str};
use crate::core::metrics::Percent;
use crate::core::record::StatusStyle;

/// One formatted cell in a listing row
#[derive(Debug, Clone)]
pub enum Cell {
    /// Record ID, shown cyan
    Id(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Status label painted with its tone
    Status(StatusStyle),
    /// Right-aligned count
    Number(i64),
    /// Right-aligned percentage
    Percent(Percent),
    /// Calendar date as YYYY-MM-DD
    Date(NaiveDate),
    /// Placeholder for absent values
    Empty,
}

impl Cell {
    /// Render the cell padded to the column width, with colors
    pub fn render(&self, width: usize) -> String {
        match self {
            Cell::Id(id) => {
                format!("{:<width$}", style(id).cyan(), width = width)
            }
            Cell::Text(s) => {
                format!(
                    "{:<width$}",
                    truncate_str(s, width.saturating_sub(2)),
                    width = width
                )
            }
            Cell::Status(status) => {
                format!(
                    "{:<width$}",
                    paint(status.label, status.tone),
                    width = width
                )
            }
            Cell::Number(n) => format!("{:>width$}", n, width = width),
            Cell::Percent(p) => format!("{:>width$}", p.to_string(), width = width),
            Cell::Date(d) => format!("{:<width$}", d.format("%Y-%m-%d"), width = width),
            Cell::Empty => format!("{:<width$}", "-", width = width),
        }
    }

    /// Render the cell bare, for CSV/TSV output
    pub fn raw(&self) -> String {
        match self {
            Cell::Id(id) => id.clone(),
            Cell::Text(s) => s.clone(),
            Cell::Status(status) => status.label.to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Percent(p) => p.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Empty => String::new(),
        }
    }
}

/// Column layout plus the noun used in the summary footer
pub struct Listing {
    noun: &'static str,
    columns: Vec<(&'static str, usize)>,
}

impl Listing {
    pub fn new(noun: &'static str, columns: Vec<(&'static str, usize)>) -> Self {
        Self { noun, columns }
    }

    /// Print the human table: bold headings, a dashed rule, colored cells,
    /// and a cyan count footer
    pub fn print_table(&self, rows: &[Vec<Cell>]) {
        let header: Vec<String> = self
            .columns
            .iter()
            .map(|(heading, width)| {
                format!("{:<width$}", style(heading).bold(), width = width)
            })
            .collect();
        println!("{}", header.join(" "));

        let total_width: usize =
            self.columns.iter().map(|(_, w)| w).sum::<usize>() + self.columns.len() - 1;
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let line: Vec<String> = row
                .iter()
                .zip(&self.columns)
                .map(|(cell, (_, width))| cell.render(*width))
                .collect();
            println!("{}", line.join(" "));
        }

        println!();
        println!(
            "{} {}(s) found",
            style(rows.len()).cyan(),
            self.noun
        );
    }

    /// Print CSV with lowercase snake_case headings
    pub fn print_csv(&self, rows: &[Vec<Cell>]) {
        let header: Vec<String> = self
            .columns
            .iter()
            .map(|(heading, _)| heading.to_lowercase().replace(' ', "_"))
            .collect();
        println!("{}", header.join(","));

        for row in rows {
            let line: Vec<String> = row.iter().map(|c| escape_csv(&c.raw())).collect();
            println!("{}", line.join(","));
        }
    }

    /// Print TSV: literal tabs, no padding, cut/awk friendly
    pub fn print_tsv(&self, rows: &[Vec<Cell>]) {
        let header: Vec<String> = self
            .columns
            .iter()
            .map(|(heading, _)| heading.to_lowercase().replace(' ', "_"))
            .collect();
        println!("{}", header.join("\t"));

        for row in rows {
            let line: Vec<String> = row.iter().map(|c| c.raw()).collect();
            println!("{}", line.join("\t"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Tone;

    #[test]
    fn test_text_cell_truncates_to_width() {
        let cell = Cell::Text("a very long device name".to_string());
        let rendered = cell.render(12);
        assert!(rendered.starts_with("a very ..."));
    }

    #[test]
    fn test_raw_has_no_padding() {
        assert_eq!(Cell::Number(42).raw(), "42");
        assert_eq!(Cell::Empty.raw(), "");
        assert_eq!(
            Cell::Status(StatusStyle::new("In Transit", Tone::Info)).raw(),
            "In Transit"
        );
    }

    #[test]
    fn test_date_cell_renders_iso() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(Cell::Date(d).raw(), "2024-03-10");
    }

    #[test]
    fn test_percent_cell_right_aligns() {
        let cell = Cell::Percent(Percent::new(65));
        assert_eq!(cell.render(5), "  65%");
    }
}
