//! Error types for grid construction, parsing and configuration.
//!
//! Stepping never fails once an engine exists; every variant here is raised
//! at construction, load/save, or by a public mutator whose precondition
//! was violated.

use thiserror::Error;

/// Everything that can go wrong in this crate.
#[derive(Debug, Error)]
pub enum LifeError {
    /// The serialized grid text is malformed.
    #[error("invalid grid format: {0}")]
    Format(#[from] FormatError),

    /// A grid needs at least one row and one column.
    #[error("grid dimensions must be positive, got {rows} rows x {columns} columns")]
    InvalidDimensions { rows: usize, columns: usize },

    /// A public mutator was called with a violated precondition.
    #[error("invalid operation at ({row}, {column}): {reason}")]
    InvalidOperation {
        row: usize,
        column: usize,
        reason: &'static str,
    },

    /// The requested worker count cannot drive the parallel stepper.
    #[error("invalid thread count {requested}: {reason}")]
    ThreadCount { requested: usize, reason: String },

    /// The two cell buffers could not be reserved.
    #[error("unable to allocate a {rows} x {columns} grid")]
    Allocation { rows: usize, columns: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Malformed serialized grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing `<columns>,<rows>` header line")]
    MissingHeader,

    #[error("header {line:?} is not `<columns>,<rows>`")]
    InvalidHeader { line: String },

    #[error("header dimensions must be positive, got {columns},{rows}")]
    InvalidDimensions { columns: usize, rows: usize },

    #[error("[row {row}] missing row line")]
    MissingRow { row: usize },

    #[error("[row {row}] size of row ({found}) does not match expected columns ({expected})")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("[row {row}] invalid character {found:?} at column {column}")]
    InvalidCharacter {
        row: usize,
        column: usize,
        found: char,
    },

    #[error("[row {row}] non-ASCII byte {found:#04x} at column {column}")]
    InvalidByte { row: usize, column: usize, found: u8 },
}

pub type Result<T> = std::result::Result<T, LifeError>;
