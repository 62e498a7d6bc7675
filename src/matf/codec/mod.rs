//! Codec layer for compressed data elements.
//!
//! # Submodules
//!
//! - [`compression`][]: Zlib decompression of `miCOMPRESSED` payloads

pub mod compression;
