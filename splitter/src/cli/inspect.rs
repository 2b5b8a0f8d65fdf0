//! `inspect` command: print dimensions, column statistics, sample rows and
//! split candidates. Never writes files.

use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::analysis::{delimiter_label, inspect, Inspection};
use crate::error::CliResult;
use crate::models::Table;
use crate::parser::{self, LoadOptions};

use super::{group_thousands, render_rows};

/// Parameters of the inspect command
#[derive(Debug, Clone)]
pub struct InspectCommand {
    pub input: PathBuf,
    pub load: LoadOptions,
    pub sample_rows: usize,
    /// Print the report as JSON instead of text
    pub json: bool,
}

/// Run the inspect command, writing the report to `out`.
pub fn run_inspect<W: Write>(command: &InspectCommand, out: &mut W) -> CliResult<Inspection> {
    let loaded = parser::load(&command.input, &command.load)?;
    let inspection = inspect(&loaded.table, command.sample_rows);

    if command.json {
        serde_json::to_writer_pretty(&mut *out, &inspection)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_report(&command.input, &inspection))?;
    }

    Ok(inspection)
}

/// Human-readable inspection report.
pub fn render_report(path: &Path, inspection: &Inspection) -> String {
    let mut report = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut report, path, inspection);
    report
}

fn write_report(out: &mut String, path: &Path, inspection: &Inspection) -> std::fmt::Result {
    writeln!(out, "📊 === File: {} ===", path.display())?;
    writeln!(
        out,
        "📏 Dimensions: {} rows x {} columns",
        inspection.rows, inspection.columns
    )?;
    writeln!(
        out,
        "💾 Estimated memory: {} bytes",
        group_thousands(inspection.estimated_bytes)
    )?;

    writeln!(out, "\n📋 Columns:")?;
    for (i, stat) in inspection.stats.iter().enumerate() {
        writeln!(
            out,
            "  {:2}. {:<20} | Type: {:<8} | Non-null: {}/{} | Nulls: {}",
            i + 1,
            stat.name,
            stat.column_type.to_string(),
            stat.non_null,
            inspection.rows,
            stat.nulls
        )?;
    }

    if !inspection.duplicate_columns.is_empty() {
        writeln!(
            out,
            "\n⚠️  Duplicate column names: {}",
            inspection.duplicate_columns.join(", ")
        )?;
    }

    writeln!(out, "\n📝 First {} rows:", inspection.sample.rows.len())?;
    let sample = Table::from_rows(
        inspection.sample.headers.as_slice(),
        inspection.sample.rows.clone(),
    );
    writeln!(out, "{}", render_rows(&sample, sample.row_count()))?;

    writeln!(out, "\n🔢 Distinct values per column:")?;
    for stat in &inspection.stats {
        writeln!(
            out,
            "  {}: {} distinct of {} total ({:.1}%)",
            stat.name,
            stat.distinct,
            inspection.rows,
            inspection.distinct_percentage(stat)
        )?;
    }

    writeln!(out, "\n✂️  Split candidates (columns containing spaces, commas, etc.):")?;
    if inspection.candidates.is_empty() {
        writeln!(out, "  No obvious candidates found.")?;
    }
    for candidate in &inspection.candidates {
        writeln!(
            out,
            "  '{}' with '{}' ({}): {}/{} rows ({:.1}%)",
            candidate.column,
            candidate.delimiter,
            delimiter_label(&candidate.delimiter),
            candidate.matches,
            candidate.total_rows,
            candidate.percentage()
        )?;
    }

    let (column, delimiter) = inspection.suggested_split();
    writeln!(out, "\n💡 Example:")?;
    writeln!(
        out,
        "  csvsplit split {} -c \"{}\" -d \"{}\" -n \"part1\" \"part2\"",
        path.display(),
        column,
        delimiter
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CliError, TableError};
    use std::fs;

    fn command(input: PathBuf, json: bool) -> InspectCommand {
        InspectCommand {
            input,
            load: LoadOptions::default(),
            sample_rows: 3,
            json,
        }
    }

    fn write_sample(dir: &Path) -> PathBuf {
        let input = dir.join("ejemplo.csv");
        fs::write(
            &input,
            "id,nombre_completo,ciudad\n1,Ana Gomez,Lima\n2,Luis Diaz,\n\
             3,Marta,Quito\n4,Jose Perez,Lima\n",
        )
        .unwrap();
        input
    }

    #[test]
    fn test_text_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let mut out = Vec::new();

        let inspection = run_inspect(&command(input.clone(), false), &mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert_eq!(inspection.rows, 4);
        assert!(report.contains("Dimensions: 4 rows x 3 columns"));
        assert!(report.contains("nombre_completo"));
        assert!(report.contains("Non-null: 3/4 | Nulls: 1"));
        assert!(report.contains("ciudad: 2 distinct of 4 total (50.0%)"));
        assert!(report.contains("'nombre_completo' with ' ' (space): 3/4 rows (75.0%)"));
        assert!(report.contains("-c \"nombre_completo\" -d \" \""));
        assert!(report.contains("First 3 rows"));
        assert!(!report.contains("Jose Perez"));
    }

    #[test]
    fn test_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let mut out = Vec::new();

        run_inspect(&command(input, true), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["rows"], 4);
        assert_eq!(json["candidates"][0]["column"], "nombre_completo");
        assert_eq!(json["stats"][2]["nulls"], 1);
    }

    #[test]
    fn test_no_candidates_message() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plain.csv");
        fs::write(&input, "id,code\n1,abc\n2,def\n").unwrap();
        let mut out = Vec::new();

        run_inspect(&command(input, false), &mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("No obvious candidates found."));
        assert!(report.contains("-c \"column_to_split\""));
    }

    #[test]
    fn test_missing_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        let err = run_inspect(&command(dir.path().join("nope.csv"), false), &mut out).unwrap_err();

        assert!(matches!(err, CliError::Table(TableError::FileNotFound(_))));
        assert!(err.is_file_not_found());
        assert!(out.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
