//! # csv-splitter - inspect CSV columns and split one column into two
//!
//! Loads a CSV file into memory, reports per-column statistics and columns
//! that look splittable, and splits a text column into two columns at the
//! first occurrence of a delimiter.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Analysis / │────▶│   CSV File  │
//! │  (UTF8/ISO) │     │  (auto-enc) │     │  Transform  │     │   (UTF-8)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csv_splitter::{load, split, write, LoadOptions, SplitSpec};
//!
//! let loaded = load("people.csv", &LoadOptions::default())?;
//! let spec = SplitSpec::new("nombre_completo", " ", "primer_nombre", "apellido")?;
//! let table = split(&loaded.table, &spec)?;
//! write(&table, "people_modified.csv")?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Layered error types
//! - [`models`] - Table, columns and cells
//! - [`parser`] - CSV loading and writing
//! - [`analysis`] - Column statistics and split candidates
//! - [`transform`] - Column split
//! - [`config`] - Environment settings
//! - [`logs`] - Console progress messages
//! - [`cli`] - Command implementations

// Core modules
pub mod error;
pub mod models;

// Loading and writing
pub mod parser;

// Inspection
pub mod analysis;

// Transformation
pub mod transform;

// Ambient
pub mod config;
pub mod logs;

// Commands
pub mod cli;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CliError, CliResult, PromptError, SplitError, SplitResult, TableError, TableResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, Column, ColumnType, Table};

// =============================================================================
// Re-exports - Loading and writing
// =============================================================================

pub use parser::{
    csv_to_table, decode_content, detect_delimiter, detect_encoding, load, parse_bytes, write,
    write_to, LoadOptions, ParseResult, ReadPolicy,
};

// =============================================================================
// Re-exports - Analysis
// =============================================================================

pub use analysis::{
    delimiter_label, describe, find_split_candidates, inspect, CandidateReport, ColumnStat,
    Inspection, DEFAULT_DELIMITERS,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    split, split_cell, split_in_place, split_with, CollisionPolicy, SplitOptions, SplitSpec,
};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::Settings;
