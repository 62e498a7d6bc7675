//! File format parsing layer for MAT5 files.
//!
//! This module provides the mid-level parsing layer that bridges between
//! raw byte reading and the high-level [`MatFile`](crate::matf::reader::MatFile).
//!
//! # Module Organization
//!
//! - [`header`]: Validates the fixed header and detects byte order
//! - [`element`]: Decodes the tag/length/payload element protocol
//! - [`matrix`]: Assembles matrix sub-elements into a [`Matrix`](crate::Matrix)
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Header (128)   │ ← header::parse()
//! ├─────────────────┤
//! │  Data element   │ ← element::ElementDecoder::read_element()
//! │  (tag, payload, │     ├─ miCOMPRESSED → inflate → one element
//! │   padding)      │     └─ miMATRIX → matrix::read_matrix()
//! ├─────────────────┤
//! │  Data element   │
//! │  ...            │
//! └─────────────────┘
//! ```

pub mod element;
pub mod header;
mod matrix;
