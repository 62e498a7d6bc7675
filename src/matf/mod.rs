//! Core MAT5 reader module.
//!
//! # Layers
//!
//! - [`types`]: error taxonomy and the decoded data model
//! - [`utils`]: byte-order-aware cursor and alignment arithmetic
//! - [`codec`]: zlib decompression of compressed elements
//! - [`format`]: header, element and matrix decoding
//! - [`reader`] / [`iter`]: the file handle and its element iterator

pub mod codec;
pub mod format;
pub mod iter;
pub mod options;
pub mod reader;
pub mod types;
pub mod utils;

pub use reader::MatFile;
pub use types::error::{MatError, Result};
