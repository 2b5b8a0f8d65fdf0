//! Error types for the CSV splitting tools.
//!
//! Errors are layered the same way the crate is:
//!
//! - [`TableError`] - loading and writing tables
//! - [`SplitError`] - the column split transformation
//! - [`PromptError`] - interactive prompts
//! - [`CliError`] - top-level command errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Table Errors
// =============================================================================

/// Errors while reading or writing a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Input path does not reference an existing file.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Content could not be parsed as delimited rows with a header.
    #[error("Invalid CSV at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Read or write failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be decoded.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// A column does not have the table's row count.
    #[error("Column '{column}' has {found} cells, expected {expected}")]
    ShapeMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

impl TableError {
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

// =============================================================================
// Split Errors
// =============================================================================

/// Errors from the column split transformation.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Requested source column is absent.
    #[error("Column '{column}' not found. Available columns: {}", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// Split parameters are unusable.
    #[error("Invalid split: {0}")]
    InvalidSpec(String),

    /// A destination column already exists and overwriting was refused.
    #[error("Column '{0}' already exists")]
    ColumnNameConflict(String),

    /// Building the result table failed.
    #[error(transparent)]
    Table(#[from] TableError),
}

// =============================================================================
// Prompt Errors
// =============================================================================

/// Errors while asking the user for input.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The user aborted the prompt.
    #[error("Prompt cancelled")]
    Cancelled,

    /// The terminal could not be used.
    #[error("Prompt failed: {0}")]
    Failed(String),
}

// =============================================================================
// CLI Errors (top-level)
// =============================================================================

/// Top-level command errors.
///
/// Every command returns this type; `main` prints it once and exits with 1.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or writing a table failed.
    #[error(transparent)]
    Table(#[from] TableError),

    /// The split could not be applied.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Interactive input failed.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to the console failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Whether the error comes from a missing input file.
    pub fn is_file_not_found(&self) -> bool {
        matches!(
            self,
            CliError::Table(TableError::FileNotFound(_))
                | CliError::Split(SplitError::Table(TableError::FileNotFound(_)))
        )
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for split operations.
pub type SplitResult<T> = Result<T, SplitError>;

/// Result type for prompts.
pub type PromptResult<T> = Result<T, PromptError>;

/// Result type for commands.
pub type CliResult<T> = Result<T, CliError>;
