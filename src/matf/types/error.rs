//! Custom error types for the matf-reader crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum MatError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The path given to `open` does not exist.
    #[error("{}: no such file or directory", path.display())]
    PathNotFound { path: PathBuf },

    /// The path exists but is a directory or another non-regular entry.
    #[error("{} is not a file", path.display())]
    NotAFile { path: PathBuf },

    /// The stream ended before a tag, payload, or header was complete.
    #[error("Could not read enough bytes: requested {requested}, available {available}")]
    InsufficientData { requested: usize, available: usize },

    /// The header is present but its endianness marker is not `IM` or `MI`.
    #[error("Not a MAT5 file: unrecognised endianness marker {marker:02x?}")]
    NotMatFile { marker: [u8; 2] },

    /// An element tag carries a type code this reader does not know.
    #[error("Unsupported data element type: {0}")]
    UnsupportedType(u32),

    /// The array-flags sub-element must be exactly 8 bytes long.
    #[error("Array flags sub-element must be 8 bytes, will not read {0} bytes")]
    ArrayFlagsSize(u32),

    /// A matrix sub-element has a different type than its position requires.
    #[error("Unexpected element for {context}: expected {expected}, found {found}")]
    UnexpectedElement {
        context: &'static str,
        expected: &'static str,
        found: String,
    },

    /// A dimension descriptor declares a different count than it carries.
    #[error("Dimension count mismatch: declared {declared}, found {found} values")]
    DimensionCountMismatch { declared: usize, found: usize },

    /// More dimensions than the fixed-slot shape accessor supports.
    #[error("More dimensions than expected: {count} axes, at most {max} supported")]
    DimensionOverflow { count: usize, max: usize },

    /// A matrix declares zero axes.
    #[error("Matrix declares no dimensions")]
    NoDimensions,

    /// A payload does not hold the number of values its shape requires.
    #[error("Size mismatch for {context}: expected {expected} values, but found {found}")]
    SizeMismatch {
        context: &'static str,
        expected: u64,
        found: u64,
    },

    /// An error occurred during decompression, often due to corrupted or truncated data.
    #[error("Decompression failed: {0}")]
    DecompressionError(String),

    /// Element nesting exceeded the configured recursion cap.
    #[error("Element nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    /// The file is structurally invalid or does not conform to the MAT5 layout.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The handle was closed before this read.
    #[error("Read on a closed MAT file handle")]
    HandleClosed,
}

/// A convenience `Result` type alias using the crate's `MatError` type.
pub type Result<T> = std::result::Result<T, MatError>;
