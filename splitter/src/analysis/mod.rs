//! Column statistics and split-candidate detection.
//!
//! Everything in this module is read-only over a [`Table`].
//!
//! # Example
//!
//! ```rust,ignore
//! use csv_splitter::{csv_to_table, find_split_candidates, DEFAULT_DELIMITERS};
//!
//! let table = csv_to_table("id,nombre_completo\n1,Ana Gomez\n2,Luis Diaz")?;
//! for candidate in find_split_candidates(&table, DEFAULT_DELIMITERS) {
//!     println!("{} on '{}': {}/{}", candidate.column, candidate.delimiter,
//!         candidate.matches, candidate.total_rows);
//! }
//! ```

use serde::Serialize;

use crate::models::{Cell, ColumnType, Table};

/// Delimiters tried when looking for split candidates, in report order.
pub const DEFAULT_DELIMITERS: &[&str] = &[" ", ",", ";", "-", "_", "|", ":"];

/// Statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStat {
    pub name: String,
    pub column_type: ColumnType,
    pub non_null: usize,
    pub nulls: usize,
    /// Distinct non-null values
    pub distinct: usize,
}

/// A (column, delimiter) pair where at least one cell contains the delimiter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateReport {
    pub column: String,
    pub delimiter: String,
    /// Rows whose cell contains the delimiter
    pub matches: usize,
    /// Rows with a value in this column
    pub non_null: usize,
    pub total_rows: usize,
}

impl CandidateReport {
    /// Matching rows as a percentage of all rows.
    pub fn percentage(&self) -> f64 {
        percentage(self.matches, self.total_rows)
    }
}

/// Per-column statistics, in column order.
pub fn describe(table: &Table) -> Vec<ColumnStat> {
    table
        .columns()
        .iter()
        .map(|column| ColumnStat {
            name: column.name.clone(),
            column_type: column.inferred_type(),
            non_null: column.non_null_count(),
            nulls: column.null_count(),
            distinct: column.distinct_count(),
        })
        .collect()
}

/// Find text columns containing any of `delimiters`.
///
/// Reports come in column order, then in the order of `delimiters`. Pairs
/// without a single matching cell are left out.
pub fn find_split_candidates<S: AsRef<str>>(
    table: &Table,
    delimiters: &[S],
) -> Vec<CandidateReport> {
    let mut candidates = Vec::new();

    for column in table.columns() {
        if column.inferred_type() != ColumnType::Text {
            continue;
        }

        let values: Vec<_> = column.cells.iter().filter_map(Cell::as_text).collect();

        for delimiter in delimiters {
            let delimiter = delimiter.as_ref();
            if delimiter.is_empty() {
                continue;
            }

            let matches = values.iter().filter(|v| v.contains(delimiter)).count();
            if matches == 0 {
                continue;
            }

            candidates.push(CandidateReport {
                column: column.name.clone(),
                delimiter: delimiter.to_string(),
                matches,
                non_null: values.len(),
                total_rows: table.row_count(),
            });
        }
    }

    tracing::debug!(count = candidates.len(), "split candidates found");
    candidates
}

/// Human name for a delimiter.
pub fn delimiter_label(delimiter: &str) -> String {
    match delimiter {
        " " => "space".to_string(),
        "," => "comma".to_string(),
        ";" => "semicolon".to_string(),
        "-" => "hyphen".to_string(),
        "_" => "underscore".to_string(),
        "|" => "pipe".to_string(),
        ":" => "colon".to_string(),
        "\t" => "tab".to_string(),
        other => other.to_string(),
    }
}

// =============================================================================
// Inspection report
// =============================================================================

/// Complete inspection of a table.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub rows: usize,
    pub columns: usize,
    pub estimated_bytes: usize,
    pub stats: Vec<ColumnStat>,
    pub sample: Sample,
    pub candidates: Vec<CandidateReport>,
    pub duplicate_columns: Vec<String>,
}

/// First rows of a table.
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sample {
    pub fn from_table(table: &Table, rows: usize) -> Self {
        let head = table.head(rows);
        Self {
            headers: head.column_names().iter().map(|s| s.to_string()).collect(),
            rows: head
                .rows()
                .map(|row| row.into_iter().cloned().collect())
                .collect(),
        }
    }
}

impl Inspection {
    /// Distinct values of a column as a percentage of all rows.
    pub fn distinct_percentage(&self, stat: &ColumnStat) -> f64 {
        percentage(stat.distinct, self.rows)
    }

    /// Arguments for a split command built from the first candidate.
    ///
    /// Falls back to placeholders when there is no candidate.
    pub fn suggested_split(&self) -> (String, String) {
        match self.candidates.first() {
            Some(candidate) => (candidate.column.clone(), candidate.delimiter.clone()),
            None => ("column_to_split".to_string(), " ".to_string()),
        }
    }
}

/// Inspect a table with the default delimiter set.
pub fn inspect(table: &Table, sample_rows: usize) -> Inspection {
    Inspection {
        rows: table.row_count(),
        columns: table.column_count(),
        estimated_bytes: table.estimated_size_bytes(),
        stats: describe(table),
        sample: Sample::from_table(table, sample_rows),
        candidates: find_split_candidates(table, DEFAULT_DELIMITERS),
        duplicate_columns: table.duplicate_names(),
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
