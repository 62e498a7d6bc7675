//! MAT5 file header parsing.
//!
//! # Header Structure
//! ```text
//! [116 bytes] Descriptive text (free-form, space padded)
//! [  8 bytes] Subsystem data offset
//! [  2 bytes] Version
//! [  2 bytes] Endianness marker ("IM" little-endian, "MI" big-endian)
//! ```

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::{debug, info};

use crate::matf::types::error::Result;
use crate::matf::types::models::{Endianness, MatHeader};
use crate::matf::utils::ByteCursor;

/// Size of the fixed file header.
pub const HEADER_LEN: usize = 128;

const DESCRIPTOR_LEN: usize = 116;
const SUBSYSTEM_OFFSET_END: usize = 124;
const VERSION_END: usize = 126;

/// Reads and validates the 128-byte header from the start of `reader`.
///
/// Fails with `InsufficientData` when fewer than 128 bytes are available and
/// with `NotMatFile` when the endianness marker is not recognised.
pub fn parse<R: Read>(reader: &mut R) -> Result<MatHeader> {
    // Byte order is unknown until the marker is read; the raw read ignores it.
    let mut cursor = ByteCursor::new(reader, Endianness::Little);
    let bytes = cursor.read_array::<HEADER_LEN>()?;
    parse_bytes(&bytes)
}

/// Interprets an in-memory header.
pub fn parse_bytes(bytes: &[u8; HEADER_LEN]) -> Result<MatHeader> {
    let marker = [bytes[VERSION_END], bytes[VERSION_END + 1]];
    let endianness = Endianness::from_marker(marker)?;
    debug!("Endianness marker {:?} -> {:?}", marker, endianness);

    let offset_bytes = &bytes[DESCRIPTOR_LEN..SUBSYSTEM_OFFSET_END];
    let version_bytes = &bytes[SUBSYSTEM_OFFSET_END..VERSION_END];
    let (subsystem_offset, version) = match endianness {
        Endianness::Little => (
            LittleEndian::read_u64(offset_bytes),
            LittleEndian::read_u16(version_bytes),
        ),
        Endianness::Big => (
            BigEndian::read_u64(offset_bytes),
            BigEndian::read_u16(version_bytes),
        ),
    };

    let descriptor = String::from_utf8_lossy(&bytes[..DESCRIPTOR_LEN])
        .trim_end_matches([' ', '\0'])
        .to_string();

    info!(
        "Header parsed: version={:#06x}, endianness={:?}, descriptor='{}'",
        version, endianness, descriptor
    );

    Ok(MatHeader {
        descriptor,
        subsystem_offset,
        version,
        endianness,
    })
}
