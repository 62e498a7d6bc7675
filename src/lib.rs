//! # matf-reader
//!
//! A reader for MAT5 (Level 5 MAT-file) containers, the binary format used to
//! exchange matrices, cells and structs between numerical-computing tools.
//!
//! Opens a file, validates its 128-byte header, and yields the top-level data
//! elements one at a time, inflating compressed elements transparently.
//!
//! **Note:** Writing MAT files is not supported. Sparse, object and function
//! handle arrays are returned as undecoded bytes.
pub mod matf;

// Re-export the main types for convenience
pub use matf::{
    MatError, MatFile, Result,
    iter::ElementIterator,
    options::MatReaderOptions,
    types::{
        models::{
            ArrayClass, ArrayFlags, DataElement, DataType, Endianness, MatHeader, NumericData,
        },
        shape::{ArrayData, Dim, DimensionList, Matrix},
    },
};
