//! Decompression of compressed data elements.
//!
//! A compressed element's payload is a zlib stream (deflate with the 2-byte
//! header and Adler-32 trailer) whose content is exactly one complete
//! tag+payload element.

use std::io::Cursor;

use flate2::{Decompress, FlushDecompress, Status};
use log::trace;

use crate::matf::types::error::{MatError, Result};
use crate::matf::types::models::Endianness;
use crate::matf::utils::ByteCursor;

/// Output is grown in steps of this size while inflating.
const INFLATE_CHUNK: usize = 32 * 1024;

/// Inflates a complete zlib stream.
///
/// The stream must reach its end marker; bytes after it are ignored, since
/// the element length only bounds the compressed data. Malformed headers,
/// corrupt blocks, checksum mismatches and truncated input are all reported
/// as [`MatError::DecompressionError`].
pub fn decompress_data(payload: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut output = Vec::with_capacity(payload.len().saturating_mul(4).min(INFLATE_CHUNK));

    loop {
        output.reserve(INFLATE_CHUNK);
        let in_before = inflater.total_in();
        let out_before = inflater.total_out();

        let status = inflater
            .decompress_vec(&payload[in_before as usize..], &mut output, FlushDecompress::None)
            .map_err(|e| MatError::DecompressionError(format!("Zlib decompression failed: {}", e)))?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                // Output space was available, so no progress means the input ran out.
                if inflater.total_in() == in_before && inflater.total_out() == out_before {
                    return Err(MatError::DecompressionError(format!(
                        "Zlib stream truncated after {} compressed bytes",
                        in_before
                    )));
                }
            }
        }
    }

    trace!(
        "Decompressed {} of {} bytes -> {} bytes",
        inflater.total_in(),
        payload.len(),
        output.len()
    );
    Ok(output)
}

/// Inflates `payload` and exposes the result as a fresh cursor in the file's byte order.
pub fn decompressed_cursor(
    payload: &[u8],
    endianness: Endianness,
) -> Result<ByteCursor<Cursor<Vec<u8>>>> {
    let inflated = decompress_data(payload)?;
    Ok(ByteCursor::new(Cursor::new(inflated), endianness))
}
