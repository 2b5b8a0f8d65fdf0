//! Column split transformation.
//!
//! Replaces one column by two columns built from splitting each cell at the
//! first occurrence of a delimiter.
//!
//! ```text
//! id | nombre_completo        id | primer_nombre | apellido
//! ---+----------------   →    ---+---------------+---------
//!  1 | Ana Gomez               1 | Ana           | Gomez
//!  2 | Luis Diaz               2 | Luis          | Diaz
//! ```

use crate::error::{SplitError, SplitResult};
use crate::models::{Cell, Column, Table};

/// Parameters of one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSpec {
    source: String,
    delimiter: String,
    new_columns: [String; 2],
}

impl SplitSpec {
    /// Validate and build a split.
    ///
    /// The delimiter must be non-empty and the two destination names must
    /// differ. A destination may reuse the source name.
    pub fn new(
        source: impl Into<String>,
        delimiter: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> SplitResult<Self> {
        let spec = Self {
            source: source.into(),
            delimiter: delimiter.into(),
            new_columns: [first.into(), second.into()],
        };

        if spec.delimiter.is_empty() {
            return Err(SplitError::InvalidSpec("delimiter must not be empty".into()));
        }
        if spec.new_columns[0] == spec.new_columns[1] {
            return Err(SplitError::InvalidSpec(format!(
                "new column names must differ, got '{}' twice",
                spec.new_columns[0]
            )));
        }
        if spec.new_columns.iter().any(|n| n.is_empty()) {
            return Err(SplitError::InvalidSpec("new column names must not be empty".into()));
        }

        Ok(spec)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn new_columns(&self) -> &[String; 2] {
        &self.new_columns
    }
}

/// What to do when a new column name is already taken by another column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Replace the existing column's values, keeping its position.
    #[default]
    Overwrite,
    /// Fail with [`SplitError::ColumnNameConflict`].
    Reject,
}

/// Options for the splitter
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitOptions {
    pub collision: CollisionPolicy,
}

/// Split one value at the first occurrence of `delimiter`.
///
/// Nulls give two nulls; a value without the delimiter gives the whole value
/// and an empty string.
pub fn split_cell(cell: &Cell, delimiter: &str) -> (Cell, Cell) {
    match cell.as_text() {
        None => (Cell::Null, Cell::Null),
        Some(text) => match text.split_once(delimiter) {
            Some((head, tail)) => (Cell::text(head), Cell::text(tail)),
            None => (Cell::text(&*text), Cell::text("")),
        },
    }
}

/// Split a column into a new table, leaving `table` untouched.
pub fn split(table: &Table, spec: &SplitSpec) -> SplitResult<Table> {
    split_with(table, spec, &SplitOptions::default())
}

/// [`split`] with explicit options.
pub fn split_with(table: &Table, spec: &SplitSpec, options: &SplitOptions) -> SplitResult<Table> {
    let mut result = table.clone();
    split_in_place(&mut result, spec, options)?;
    Ok(result)
}

/// Split a column of `table` in place.
///
/// All checks run before the first change, so on error the table is
/// unchanged.
pub fn split_in_place(
    table: &mut Table,
    spec: &SplitSpec,
    options: &SplitOptions,
) -> SplitResult<()> {
    let index = table
        .column_index(spec.source())
        .ok_or_else(|| SplitError::ColumnNotFound {
            column: spec.source().to_string(),
            available: table.column_names().iter().map(|s| s.to_string()).collect(),
        })?;

    if options.collision == CollisionPolicy::Reject {
        if let Some(taken) = spec
            .new_columns()
            .iter()
            .find(|name| name.as_str() != spec.source() && table.contains_column(name))
        {
            return Err(SplitError::ColumnNameConflict(taken.clone()));
        }
    }

    let source = &table.columns()[index];
    let (first, second): (Vec<Cell>, Vec<Cell>) = source
        .cells
        .iter()
        .map(|cell| split_cell(cell, spec.delimiter()))
        .unzip();

    tracing::debug!(
        column = spec.source(),
        delimiter = spec.delimiter(),
        rows = first.len(),
        "splitting column"
    );

    table.remove_column(index);

    for (name, cells) in spec.new_columns().iter().zip([first, second]) {
        match table.column_index(name) {
            Some(existing) => {
                tracing::warn!(column = %name, "overwriting existing column");
                table.replace_cells(existing, cells)?;
            }
            None => table.push_column(Column::new(name.clone(), cells))?,
        }
    }

    Ok(())
}
