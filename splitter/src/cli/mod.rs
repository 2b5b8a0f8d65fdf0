//! Command implementations behind the `csvsplit` binary.
//!
//! - [`split`] - split a column and write a new file
//! - [`inspect`] - print a column report
//! - [`interactive`] - prompt for the split parameters
//! - [`prompt`] - terminal prompts
//!
//! Commands return [`crate::error::CliResult`]; `main` maps errors to exit
//! codes.

pub mod inspect;
pub mod interactive;
pub mod prompt;
pub mod split;

use std::path::{Path, PathBuf};

use crate::models::{Cell, Table};

/// Output path next to `input`: `<stem><suffix><extension>`.
///
/// `data/people.csv` with `_modified` gives `data/people_modified.csv`.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    input.with_file_name(name)
}

/// Render the first `rows` rows as right-aligned text columns.
pub fn render_rows(table: &Table, rows: usize) -> String {
    if table.column_count() == 0 {
        return String::new();
    }

    let head = table.head(rows);
    let header = head.column_names().iter().map(|s| s.to_string()).collect();
    let mut grid: Vec<Vec<String>> = vec![header];
    for row in head.rows() {
        grid.push(row.into_iter().map(display_cell).collect());
    }

    let widths: Vec<usize> = (0..head.column_count())
        .map(|i| grid.iter().map(|line| line[i].chars().count()).max().unwrap_or(0))
        .collect();

    grid.iter()
        .map(|line| {
            line.iter()
                .zip(&widths)
                .map(|(value, width)| format!("{:>width$}", value, width = width))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_cell(cell: &Cell) -> String {
    match cell {
        Cell::Null => "NaN".to_string(),
        other => other.render().into_owned(),
    }
}

/// Format a count with thousands separators.
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
