//! CSV loading and writing with encoding and delimiter detection.
//!
//! Reads delimited text into a [`Table`] and writes tables back out.
//! Nothing here knows about splitting.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tempfile::NamedTempFile;

use crate::error::{TableError, TableResult};
use crate::models::{parse_number, Cell, Column, Table};

/// Field values read as missing.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How rows longer than the header are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Extra fields are dropped.
    #[default]
    Lenient,
    /// Extra fields are a parse error.
    Strict,
}

/// Options for loading a table
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field separator; `None` detects it from the first line
    pub delimiter: Option<char>,

    /// Long row handling
    pub policy: ReadPolicy,

    /// Force an encoding instead of detecting it
    pub encoding: Option<String>,

    /// Store all-numeric columns as numbers
    pub coerce_numbers: bool,

    /// Field values read as null
    pub na_values: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: Some(','),
            policy: ReadPolicy::Lenient,
            encoding: None,
            coerce_numbers: true,
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LoadOptions {
    fn is_na(&self, field: &str) -> bool {
        self.na_values.iter().any(|na| na == field)
    }
}

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Loaded table
    pub table: Table,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Rows whose extra fields were dropped
    pub truncated_rows: usize,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> TableResult<String> {
    let content = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(e) => {
                tracing::warn!("input is not valid UTF-8 ({}), decoding lossily", e);
                String::from_utf8_lossy(bytes).to_string()
            }
        },
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.to_string(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        other => {
            let codec = encoding_rs::Encoding::for_label(other.as_bytes())
                .ok_or_else(|| TableError::Encoding(format!("unsupported encoding '{}'", other)))?;
            codec.decode(bytes).0.to_string()
        }
    };

    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Load a CSV file into a table.
///
/// # Example
/// ```ignore
/// let result = load("people.csv", &LoadOptions::default())?;
/// println!("Encoding: {}, rows: {}", result.encoding, result.table.row_count());
/// ```
pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> TableResult<ParseResult> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TableError::FileNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TableError::FileNotFound(path.to_path_buf()),
        _ => TableError::Io(e),
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read input file");
    parse_bytes(&bytes, options)
}

/// Parse CSV bytes, detecting encoding and delimiter unless forced.
pub fn parse_bytes(bytes: &[u8], options: &LoadOptions) -> TableResult<ParseResult> {
    let encoding = options
        .encoding
        .clone()
        .unwrap_or_else(|| detect_encoding(bytes));

    let content = decode_content(bytes, &encoding)?;
    parse_string_with_metadata(&content, options, encoding)
}

/// Parse CSV text with the default options.
///
/// # Example
/// ```ignore
/// let table = csv_to_table("name,age\nAlice,30\nBob,25")?;
/// assert_eq!(table.row_count(), 2);
/// ```
pub fn csv_to_table(csv: &str) -> TableResult<Table> {
    parse_string_with_metadata(csv, &LoadOptions::default(), "utf-8".to_string()).map(|r| r.table)
}

/// Parse CSV text and return the table with metadata.
pub fn parse_string_with_metadata(
    content: &str,
    options: &LoadOptions,
    encoding: String,
) -> TableResult<ParseResult> {
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(content));
    let delimiter_byte = u8::try_from(delimiter).map_err(|_| {
        TableError::parse(1, format!("delimiter '{}' is not a single byte", delimiter))
    })?;

    if let Some(line) = unterminated_quote(content, delimiter_byte) {
        return Err(TableError::parse(line, "unterminated quoted field"));
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter_byte)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    // Get headers from first record
    let header = match records.next() {
        Some(record) => record.map_err(csv_error)?,
        None => return Err(TableError::EmptyFile),
    };

    if header.is_empty() || (header.len() == 1 && header[0].trim().is_empty()) {
        return Err(TableError::NoHeaders);
    }

    let headers: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.to_string()
            }
        })
        .collect();

    let width = headers.len();
    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let mut truncated_rows = 0;

    for result in records {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() == 1
            && record[0].is_empty()
            && is_blank_line(content, record.position())
        {
            continue;
        }

        if record.len() > width {
            match options.policy {
                ReadPolicy::Strict => {
                    return Err(TableError::parse(
                        line,
                        format!("expected {} fields, found {}", width, record.len()),
                    ));
                }
                ReadPolicy::Lenient => {
                    tracing::warn!(
                        line,
                        fields = record.len(),
                        expected = width,
                        "dropping extra fields"
                    );
                    truncated_rows += 1;
                }
            }
        }

        for (i, column) in raw.iter_mut().enumerate() {
            let value = record
                .get(i)
                .filter(|field| !options.is_na(field))
                .map(str::to_string);
            column.push(value);
        }
    }

    let row_count = raw.first().map(Vec::len).unwrap_or(0);
    let mut table = Table::with_rows(row_count);
    for (name, values) in headers.into_iter().zip(raw) {
        table.push_column(build_column(name, values, options.coerce_numbers))?;
    }

    let duplicates = table.duplicate_names();
    if !duplicates.is_empty() {
        tracing::warn!(?duplicates, "duplicate column names in header");
    }

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
        truncated_rows,
    })
}

fn build_column(name: String, values: Vec<Option<String>>, coerce_numbers: bool) -> Column {
    let numeric = coerce_numbers
        && values.iter().flatten().all(|v| parse_number(v).is_some())
        && values.iter().any(Option::is_some);

    let cells = values
        .into_iter()
        .map(|value| match value {
            None => Cell::Null,
            Some(v) if numeric => match parse_number(&v) {
                Some(value) => Cell::Number { value, raw: v },
                None => Cell::Text(v),
            },
            Some(v) => Cell::Text(v),
        })
        .collect();

    Column::new(name, cells)
}

/// Line of a quoted field that is still open at end of input.
fn unterminated_quote(content: &str, delimiter: u8) -> Option<u64> {
    let mut line = 1;
    let mut field_start = true;
    let mut open = None;
    let mut bytes = content.bytes().peekable();

    while let Some(b) = bytes.next() {
        if open.is_some() {
            match b {
                b'"' if bytes.peek() == Some(&b'"') => {
                    bytes.next();
                }
                b'"' => open = None,
                b'\n' => line += 1,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' if field_start => {
                open = Some(line);
                field_start = false;
            }
            b'\n' => {
                line += 1;
                field_start = true;
            }
            b'\r' => field_start = true,
            _ => field_start = b == delimiter,
        }
    }

    open
}

/// Whether a record comes from an empty line rather than an empty field.
fn is_blank_line(content: &str, position: Option<&csv::Position>) -> bool {
    let start = position.map(|p| p.byte() as usize).unwrap_or(0);
    matches!(content.as_bytes().get(start), None | Some(b'\n') | Some(b'\r'))
}

fn csv_error(err: csv::Error) -> TableError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    TableError::parse(line, err.to_string())
}

/// Serialize a table as comma-separated text, header first.
pub fn write_to<W: Write>(table: &Table, writer: W) -> TableResult<()> {
    if table.column_count() == 0 {
        return Ok(());
    }

    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(table.column_names())
        .map_err(io::Error::from)?;

    for row in table.rows() {
        csv.write_record(row.iter().map(|cell| cell.render().into_owned()))
            .map_err(io::Error::from)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write a table to `path`, replacing any existing file.
///
/// The table goes to a temporary file next to `path` first and is renamed
/// into place, so a failed write leaves the destination untouched.
pub fn write<P: AsRef<Path>>(table: &Table, path: P) -> TableResult<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = NamedTempFile::new_in(&dir)?;
    write_to(table, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| TableError::Io(e.error))?;

    tracing::debug!(path = %path.display(), rows = table.row_count(), "wrote table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str, options: &LoadOptions) -> TableResult<ParseResult> {
        parse_string_with_metadata(csv, options, "utf-8".to_string())
    }

    #[test]
    fn test_simple_csv() {
        let table = csv_to_table("name,age\nAlice,30\nBob,25").unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names(), vec!["name", "age"]);
        assert_eq!(table.column("name").unwrap().cells[0], Cell::text("Alice"));
        assert_eq!(table.column("age").unwrap().cells[1], Cell::number(25.0));
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name,value\n\"Gomez, Ana\",\"line1\nline2\"";
        let table = csv_to_table(csv).unwrap();

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column("name").unwrap().cells[0], Cell::text("Gomez, Ana"));
        assert_eq!(table.column("value").unwrap().cells[0], Cell::text("line1\nline2"));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = csv_to_table("a,b\nx,2\n\ny,4\n").unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_missing_values_are_null() {
        let table = csv_to_table("a,b,c\n1,,NA\n2,x,y").unwrap();

        assert_eq!(table.column("b").unwrap().cells[0], Cell::Null);
        assert_eq!(table.column("c").unwrap().cells[0], Cell::Null);
        assert_eq!(table.column("c").unwrap().cells[1], Cell::text("y"));
    }

    #[test]
    fn test_short_rows_padded() {
        let table = csv_to_table("a,b,c\nx").unwrap();
        assert_eq!(table.column("b").unwrap().cells[0], Cell::Null);
        assert_eq!(table.column("c").unwrap().cells[0], Cell::Null);
    }

    #[test]
    fn test_long_rows_lenient() {
        let result = parse("a,b\nx,y,z,w", &LoadOptions::default()).unwrap();

        assert_eq!(result.truncated_rows, 1);
        assert_eq!(result.table.column_count(), 2);
        assert_eq!(result.table.column("b").unwrap().cells[0], Cell::text("y"));
    }

    #[test]
    fn test_long_rows_strict() {
        let options = LoadOptions {
            policy: ReadPolicy::Strict,
            ..LoadOptions::default()
        };
        let err = parse("a,b\nx,y\nx,y,z", &options).unwrap_err();

        match err {
            TableError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 2 fields"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unterminated_quote_is_parse_error() {
        let err = csv_to_table("a,b\n1,\"unterminated\n2,x\n3,y\n").unwrap_err();

        match err {
            TableError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("unterminated"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_escaped_and_literal_quotes_are_fine() {
        let table = csv_to_table("a,b\n\"say \"\"hi\"\"\",5\"\n").unwrap();

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column("a").unwrap().cells[0], Cell::text("say \"hi\""));
        assert_eq!(table.column("b").unwrap().cells[0], Cell::text("5\""));
    }

    #[test]
    fn test_empty_field_rows_kept() {
        let table = csv_to_table("a\n\"\"\n   \nx\n\n").unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("a").unwrap().cells[0], Cell::Null);
        assert_eq!(table.column("a").unwrap().cells[1], Cell::text("   "));
    }

    #[test]
    fn test_large_integers_written_unchanged() {
        let csv = "id,name\n9007199254740993,Ana Gomez\n1234567890123456789,Luis Diaz\n";
        let table = csv_to_table(csv).unwrap();
        let id = table.column("id").unwrap();
        assert_eq!(id.inferred_type(), crate::models::ColumnType::Numeric);

        let mut out = Vec::new();
        write_to(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), csv);
    }

    #[test]
    fn test_numeric_coercion_needs_whole_column() {
        let table = csv_to_table("id,code\n1,007\n2,A12").unwrap();

        assert_eq!(table.column("id").unwrap().cells[0], Cell::number(1.0));
        assert_eq!(table.column("code").unwrap().cells[0], Cell::text("007"));
    }

    #[test]
    fn test_raw_mode_keeps_text() {
        let options = LoadOptions {
            coerce_numbers: false,
            ..LoadOptions::default()
        };
        let table = parse("id\n007", &options).unwrap().table;
        assert_eq!(table.column("id").unwrap().cells[0], Cell::text("007"));
    }

    #[test]
    fn test_unnamed_and_duplicate_headers() {
        let table = csv_to_table("a,,a\n1,2,3").unwrap();
        assert_eq!(table.column_names(), vec!["a", "Unnamed: 1", "a"]);
        assert_eq!(table.duplicate_names(), vec!["a".to_string()]);
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(csv_to_table(""), Err(TableError::EmptyFile)));
    }

    #[test]
    fn test_header_only() {
        let table = csv_to_table("a,b\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_delimiter() {
        let options = LoadOptions {
            delimiter: None,
            ..LoadOptions::default()
        };
        let result = parse_bytes(b"name;age\nAlice;30", &options).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.column_names(), vec!["name", "age"]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_bom_stripped() {
        let decoded = decode_content(b"\xEF\xBB\xBFid,name", "utf-8").unwrap();
        assert_eq!(decoded, "id,name");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::FileNotFound(p) if p == path));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = csv_to_table("id,name,note\n1,\"Gomez, Ana\",\n2,Luis,ok").unwrap();

        write(&table, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "id,name,note\n1,\"Gomez, Ana\",\n2,Luis,ok\n");

        let reloaded = load(&path, &LoadOptions::default()).unwrap().table;
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old content that is longer than the new one\n").unwrap();

        write(&csv_to_table("a\n1").unwrap(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n1\n");
    }

    #[test]
    fn test_write_missing_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.csv");

        let err = write(&csv_to_table("a\n1").unwrap(), &path).unwrap_err();
        assert!(matches!(err, TableError::Io(_)));
        assert!(!path.exists());
    }
}
