//! `split` command: load, split one column, write a new file.

use std::path::PathBuf;

use crate::analysis::delimiter_label;
use crate::config::Settings;
use crate::error::CliResult;
use crate::logs::{log_info, log_info_indent, log_success};
use crate::models::Table;
use crate::parser::{self, LoadOptions};
use crate::transform::{split_in_place, SplitOptions, SplitSpec};

use super::default_output_path;

/// Parameters of the split command
#[derive(Debug, Clone)]
pub struct SplitCommand {
    pub input: PathBuf,
    pub spec: SplitSpec,
    /// Defaults to `<input-stem><output_suffix><input-ext>`
    pub output: Option<PathBuf>,
    pub load: LoadOptions,
    pub split: SplitOptions,
}

/// What a successful split produced
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub output: PathBuf,
    pub table: Table,
}

impl SplitCommand {
    /// Output path after applying the default.
    pub fn output_path(&self, settings: &Settings) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input, &settings.output_suffix))
    }
}

/// Run the split command.
pub fn run_split(command: &SplitCommand, settings: &Settings) -> CliResult<SplitOutcome> {
    let output = command.output_path(settings);

    log_info("=== CSV Column Splitting Tool ===");
    log_info(format!("Input file: {}", command.input.display()));
    log_info(format!("Output file: {}", output.display()));
    log_info(format!("Column to split: {}", command.spec.source()));
    log_info(format!("Delimiter: '{}'", command.spec.delimiter()));
    log_info(format!(
        "New columns: {}, {}",
        command.spec.new_columns()[0],
        command.spec.new_columns()[1]
    ));
    log_info("-".repeat(40));

    let loaded = parser::load(&command.input, &command.load)?;
    log_success(format!("File read: {}", command.input.display()));
    log_info_indent(format!("Encoding: {}", loaded.encoding), 1);
    log_info_indent(
        format!(
            "Dimensions: {} rows x {} columns",
            loaded.table.row_count(),
            loaded.table.column_count()
        ),
        1,
    );
    if loaded.truncated_rows > 0 {
        log_info_indent(
            format!("{} rows had extra fields dropped", loaded.truncated_rows),
            1,
        );
    }

    split_table(loaded.table, &command.spec, &command.split, output)
}

/// Split an already loaded table and write it to `output`.
pub fn split_table(
    mut table: Table,
    spec: &SplitSpec,
    options: &SplitOptions,
    output: PathBuf,
) -> CliResult<SplitOutcome> {
    split_in_place(&mut table, spec, options)?;
    parser::write(&table, &output)?;

    log_success(format!("File saved: {}", output.display()));
    log_success(format!(
        "Column '{}' split on {} into '{}' and '{}'",
        spec.source(),
        describe_delimiter(spec.delimiter()),
        spec.new_columns()[0],
        spec.new_columns()[1]
    ));

    Ok(SplitOutcome { output, table })
}

fn describe_delimiter(delimiter: &str) -> String {
    let label = delimiter_label(delimiter);
    if label == delimiter {
        format!("'{}'", delimiter)
    } else {
        format!("'{}' ({})", delimiter, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CliError, SplitError, TableError};
    use std::fs;

    fn command(input: PathBuf, output: Option<PathBuf>, source: &str) -> SplitCommand {
        SplitCommand {
            input,
            spec: SplitSpec::new(source, " ", "primer_nombre", "apellido").unwrap(),
            output,
            load: LoadOptions::default(),
            split: SplitOptions::default(),
        }
    }

    #[test]
    fn test_split_writes_default_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ejemplo.csv");
        fs::write(&input, "id,nombre_completo\n1,Ana Gomez\n2,Luis Diaz\n").unwrap();

        let cmd = command(input, None, "nombre_completo");
        let outcome = run_split(&cmd, &Settings::default()).unwrap();

        assert_eq!(outcome.output, dir.path().join("ejemplo_modified.csv"));
        assert_eq!(
            fs::read_to_string(&outcome.output).unwrap(),
            "id,primer_nombre,apellido\n1,Ana,Gomez\n2,Luis,Diaz\n"
        );
    }

    #[test]
    fn test_split_explicit_output_and_suffix_setting() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.csv");
        fs::write(&input, "nombre_completo\nAna Gomez\n").unwrap();

        let settings = Settings {
            output_suffix: "_out".into(),
            ..Settings::default()
        };
        let cmd = command(input.clone(), None, "nombre_completo");
        assert_eq!(cmd.output_path(&settings), dir.path().join("people_out.csv"));

        let explicit = dir.path().join("result.csv");
        let cmd = command(input, Some(explicit.clone()), "nombre_completo");
        let outcome = run_split(&cmd, &settings).unwrap();
        assert_eq!(outcome.output, explicit);
        assert!(explicit.exists());
    }

    #[test]
    fn test_missing_column_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "id,name\n1,Ana Gomez\n").unwrap();
        fs::write(&output, "previous\n").unwrap();

        let cmd = command(input, Some(output.clone()), "nombre");
        let err = run_split(&cmd, &Settings::default()).unwrap_err();

        assert!(matches!(err, CliError::Split(SplitError::ColumnNotFound { .. })));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.csv");

        let err = run_split(&command(input, None, "name"), &Settings::default()).unwrap_err();

        assert!(matches!(err, CliError::Table(TableError::FileNotFound(_))));
        assert!(!dir.path().join("missing_modified.csv").exists());
    }

    #[test]
    fn test_describe_delimiter() {
        assert_eq!(describe_delimiter(" "), "' ' (space)");
        assert_eq!(describe_delimiter("::"), "'::'");
    }
}
