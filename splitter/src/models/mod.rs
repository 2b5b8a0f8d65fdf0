//! In-memory table model.
//!
//! - [`Cell`] - a single value: null, text or number
//! - [`Column`] - a named sequence of cells
//! - [`Table`] - ordered columns sharing one row count
//! - [`ColumnType`] - type tag reported for a column

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::error::{TableError, TableResult};

// =============================================================================
// Cells
// =============================================================================

/// A single table value.
///
/// Numbers keep the field text they were read from, so writing a table back
/// reproduces untouched fields exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value.
    Null,
    /// Numeric value and its source text.
    Number { value: f64, raw: String },
    /// Any other value.
    Text(String),
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Build a number cell rendered with [`format_number`].
    pub fn number(value: f64) -> Self {
        Cell::Number {
            value,
            raw: format_number(value),
        }
    }

    /// Number cell from a field, or `None` when it does not parse.
    pub fn from_field(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        parse_number(&raw).map(|value| Cell::Number { value, raw })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Textual form of a non-null cell.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Null => None,
            Cell::Text(s) | Cell::Number { raw: s, .. } => Some(Cow::Borrowed(s)),
        }
    }

    /// Value as written to a CSV field. Nulls become empty fields.
    pub fn render(&self) -> Cow<'_, str> {
        self.as_text().unwrap_or(Cow::Borrowed(""))
    }

    /// Whether this cell holds a number or text parsing as one.
    pub fn is_numeric(&self) -> bool {
        match self {
            Cell::Null => false,
            Cell::Number { .. } => true,
            Cell::Text(s) => parse_number(s).is_some(),
        }
    }

    fn heap_size(&self) -> usize {
        match self {
            Cell::Text(s) | Cell::Number { raw: s, .. } => s.capacity(),
            Cell::Null => 0,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Number { value, .. } => serializer.serialize_f64(*value),
            Cell::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::number(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// Parse a field as a number, accepting surrounding whitespace.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Format a number the way it reads in a CSV: integral values have no
/// fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// =============================================================================
// Columns
// =============================================================================

/// Type tag for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Every non-null cell is a number.
    Numeric,
    /// At least one non-null cell is not a number.
    Text,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn non_null_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_null()).count()
    }

    pub fn null_count(&self) -> usize {
        self.len() - self.non_null_count()
    }

    /// Number of distinct non-null values.
    pub fn distinct_count(&self) -> usize {
        self.cells
            .iter()
            .filter_map(Cell::as_text)
            .collect::<HashSet<_>>()
            .len()
    }

    /// A column with no non-null value counts as numeric.
    pub fn inferred_type(&self) -> ColumnType {
        if self.cells.iter().filter(|c| !c.is_null()).all(Cell::is_numeric) {
            ColumnType::Numeric
        } else {
            ColumnType::Text
        }
    }
}

// =============================================================================
// Tables
// =============================================================================

/// Ordered columns sharing one row count.
///
/// Every column always holds exactly [`Table::row_count`] cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Create an empty table with the given row count and no columns.
    pub fn with_rows(row_count: usize) -> Self {
        Self {
            columns: Vec::new(),
            row_count,
        }
    }

    /// Build a table from columns, checking they share a row count.
    pub fn from_columns(columns: Vec<Column>) -> TableResult<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut table = Self::with_rows(row_count);
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Build a table from a header and rows. Short rows are padded with nulls,
    /// long rows truncated.
    pub fn from_rows<H, R>(headers: &[H], rows: Vec<R>) -> Self
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Cell>,
    {
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column::new(h.as_ref(), Vec::with_capacity(rows.len())))
            .collect();
        let row_count = rows.len();

        for row in rows {
            let mut values = row.into_iter();
            for column in columns.iter_mut() {
                column.cells.push(values.next().unwrap_or(Cell::Null));
            }
        }

        Self {
            columns,
            row_count,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of the first column with this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one row, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Cell>> + '_ {
        (0..self.row_count).filter_map(move |i| self.row(i))
    }

    /// Append a column at the end.
    pub fn push_column(&mut self, column: Column) -> TableResult<()> {
        self.check_len(&column.name, column.len())?;
        self.columns.push(column);
        Ok(())
    }

    /// Remove and return the column at `index`.
    pub fn remove_column(&mut self, index: usize) -> Option<Column> {
        (index < self.columns.len()).then(|| self.columns.remove(index))
    }

    /// Replace the cells of the column at `index`, keeping its position.
    pub fn replace_cells(&mut self, index: usize, cells: Vec<Cell>) -> TableResult<()> {
        let name = match self.columns.get(index) {
            Some(column) => column.name.clone(),
            None => return Ok(()),
        };
        self.check_len(&name, cells.len())?;
        self.columns[index].cells = cells;
        Ok(())
    }

    /// First `n` rows as a new table.
    pub fn head(&self, n: usize) -> Table {
        let rows = n.min(self.row_count);
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.cells[..rows].to_vec()))
                .collect(),
            row_count: rows,
        }
    }

    /// Header names that appear more than once, in first-seen order.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) && !duplicates.contains(&column.name) {
                duplicates.push(column.name.clone());
            }
        }
        duplicates
    }

    /// Rough in-memory footprint in bytes.
    pub fn estimated_size_bytes(&self) -> usize {
        self.columns
            .iter()
            .map(|c| {
                c.name.capacity()
                    + c.cells.len() * std::mem::size_of::<Cell>()
                    + c.cells.iter().map(Cell::heap_size).sum::<usize>()
            })
            .sum()
    }

    fn check_len(&self, name: &str, found: usize) -> TableResult<()> {
        if found != self.row_count {
            return Err(TableError::ShapeMismatch {
                column: name.to_string(),
                expected: self.row_count,
                found,
            });
        }
        Ok(())
    }
}
