//! `interactive` command: ask for the split parameters at a prompt.
//!
//! Blank answers fall back to a single space for the delimiter and to
//! `column1` / `column2` for the new column names.

use std::io::Write;
use std::path::PathBuf;

use crate::config::Settings;
use crate::error::{CliResult, TableError};
use crate::parser::{self, LoadOptions, ReadPolicy};
use crate::transform::{SplitOptions, SplitSpec};

use super::prompt::{ask_or_default, ask_trimmed, Prompter};
use super::split::{split_table, SplitOutcome};
use super::{default_output_path, render_rows};

/// Delimiter used for a blank answer.
pub const DEFAULT_DELIMITER: &str = " ";

/// New column names used for blank answers.
pub const DEFAULT_NEW_COLUMNS: [&str; 2] = ["column1", "column2"];

/// Rows of the result shown at the end.
const PREVIEW_ROWS: usize = 5;

/// Run the interactive flow, printing to `out`.
pub fn run_interactive<P, W>(
    prompter: &mut P,
    settings: &Settings,
    out: &mut W,
) -> CliResult<SplitOutcome>
where
    P: Prompter + ?Sized,
    W: Write,
{
    writeln!(out, "🔧 CSV Column Splitter - interactive")?;
    writeln!(out, "{}", "=".repeat(40))?;

    let input = PathBuf::from(ask_trimmed(prompter, "📁 CSV file:")?);
    if !input.is_file() {
        return Err(TableError::FileNotFound(input).into());
    }

    let load = LoadOptions {
        policy: if settings.strict {
            ReadPolicy::Strict
        } else {
            ReadPolicy::Lenient
        },
        ..LoadOptions::default()
    };
    let loaded = parser::load(&input, &load)?;

    writeln!(out, "\n💡 Available columns:")?;
    for (i, name) in loaded.table.column_names().iter().enumerate() {
        writeln!(out, "   {}. {}", i + 1, name)?;
    }
    writeln!(
        out,
        "📊 Rows: {}, Columns: {}",
        loaded.table.row_count(),
        loaded.table.column_count()
    )?;

    let column = ask_trimmed(prompter, "📋 Column to split:")?;
    let delimiter = ask_or_default(prompter, "✂️  Delimiter [space]:", DEFAULT_DELIMITER)?;
    let [first_default, second_default] = DEFAULT_NEW_COLUMNS;
    let first = ask_or_default(prompter, "📝 First column name [column1]:", first_default)?;
    let second = ask_or_default(prompter, "📝 Second column name [column2]:", second_default)?;

    let spec = SplitSpec::new(column, delimiter, first, second)?;
    let output = default_output_path(&input, &settings.interactive_suffix);

    writeln!(out, "\n🚀 Processing...")?;
    let outcome = split_table(loaded.table, &spec, &SplitOptions::default(), output)?;

    writeln!(out, "\n📊 First rows of the result:")?;
    writeln!(out, "{}", render_rows(&outcome.table, PREVIEW_ROWS))?;

    Ok(outcome)
}
