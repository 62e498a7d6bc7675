//! # Data Element Decoding
//!
//! Every element in a MAT5 stream is a tag followed by a payload:
//!
//! ```text
//! Full form:                         Compact form (payload <= 4 bytes):
//! [4 bytes] type code                [2 bytes] byte count | [2 bytes] type code
//! [4 bytes] payload length           [4 bytes] payload (zero padded)
//! [N bytes] payload
//! [0-7 bytes] padding to 8 bytes
//! ```
//!
//! The compact form is recognised by a non-zero upper half in the first tag
//! word. `miCOMPRESSED` payloads are a zlib stream holding exactly one
//! element and are not followed by padding. `miMATRIX` payloads are a
//! sequence of sub-elements handled by [`super::matrix`].

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use encoding_rs::{UTF_16BE, UTF_16LE};
use log::{debug, trace};

use crate::matf::codec::compression;
use crate::matf::options::MatReaderOptions;
use crate::matf::types::error::{MatError, Result};
use crate::matf::types::models::{DataElement, DataType, Endianness, NumericData};
use crate::matf::types::shape::Matrix;
use crate::matf::utils::{self, ByteCursor};

use super::matrix;

/// Size of a tag in either form.
pub const TAG_LEN: usize = 8;

/// A decoded element tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub type_code: u32,
    pub length: u32,
    /// Payload carried inside the tag slot when the compact form is used.
    pub inline: Option<[u8; 4]>,
}

/// Recursive-descent decoder over a stream of data elements.
///
/// Each call to [`read_element`](ElementDecoder::read_element) consumes one
/// complete element including its padding, so the stream is always left at a
/// tag boundary.
#[derive(Debug)]
pub struct ElementDecoder<R> {
    cursor: ByteCursor<R>,
    options: MatReaderOptions,
    depth: usize,
    in_compressed: bool,
}

impl<R: Read> ElementDecoder<R> {
    pub fn new(cursor: ByteCursor<R>, options: MatReaderOptions) -> Self {
        Self {
            cursor,
            options,
            depth: 0,
            in_compressed: false,
        }
    }

    /// Bytes consumed from the underlying stream so far.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn endianness(&self) -> Endianness {
        self.cursor.endianness()
    }

    pub fn options(&self) -> &MatReaderOptions {
        &self.options
    }

    /// Decodes the next element.
    ///
    /// Returns `Ok(None)` when the stream ends exactly at a tag boundary. A
    /// stream that ends anywhere inside an element is an error.
    pub fn read_element(&mut self) -> Result<Option<DataElement>> {
        match self.read_tag()? {
            Some(tag) => self.read_payload(tag).map(Some),
            None => Ok(None),
        }
    }

    /// Reads the next tag, or `None` at a clean end of stream.
    pub fn read_tag(&mut self) -> Result<Option<Tag>> {
        let mut buf = [0u8; TAG_LEN];
        let read = self.cursor.fill(&mut buf)?;
        if read == 0 {
            return Ok(None);
        }
        if read < TAG_LEN {
            return Err(MatError::InsufficientData {
                requested: TAG_LEN,
                available: read,
            });
        }

        let first = self.cursor.u32_from(&[buf[0], buf[1], buf[2], buf[3]]);
        let second = [buf[4], buf[5], buf[6], buf[7]];

        let tag = if first >> 16 != 0 {
            let length = first >> 16;
            if length > 4 {
                return Err(MatError::InvalidFormat(format!(
                    "Compact tag declares {} bytes, at most 4 fit",
                    length
                )));
            }
            Tag {
                type_code: first & 0xFFFF,
                length,
                inline: Some(second),
            }
        } else {
            Tag {
                type_code: first,
                length: self.cursor.u32_from(&second),
                inline: None,
            }
        };

        trace!(
            "Tag at {}: type={}, length={}, compact={}",
            self.cursor.position() - TAG_LEN as u64,
            tag.type_code,
            tag.length,
            tag.inline.is_some()
        );
        Ok(Some(tag))
    }

    /// Decodes the payload that follows `tag`.
    pub fn read_payload(&mut self, tag: Tag) -> Result<DataElement> {
        let data_type = DataType::try_from(tag.type_code)?;

        if let Some(inline) = tag.inline {
            if data_type.width().is_none() {
                return Err(MatError::InvalidFormat(format!(
                    "{} cannot use the compact tag form",
                    data_type
                )));
            }
            return decode_flat(data_type, &inline[..tag.length as usize], self.endianness());
        }

        match data_type {
            DataType::Compressed => self.read_compressed(tag.length),
            DataType::Matrix => self.read_matrix(tag.length),
            _ => {
                let bytes = self.read_padded(tag.length)?;
                decode_flat(data_type, &bytes, self.endianness())
            }
        }
    }

    /// Like [`read_element`](Self::read_element), but a missing element is truncation.
    pub(crate) fn read_required(&mut self) -> Result<DataElement> {
        match self.read_tag()? {
            Some(tag) => self.read_payload(tag),
            None => Err(MatError::InsufficientData {
                requested: TAG_LEN,
                available: 0,
            }),
        }
    }

    /// Reads a payload of `length` bytes and skips the padding after it.
    pub(crate) fn read_padded(&mut self, length: u32) -> Result<Vec<u8>> {
        let bytes = self.cursor.read_bytes(length as usize)?;
        let padding = utils::padding_after(length as u64);
        if padding > 0 {
            trace!("Skipping {} padding bytes", padding);
            self.cursor.skip(padding)?;
        }
        Ok(bytes)
    }

    /// Everything left in this decoder's stream.
    pub(crate) fn read_remaining(&mut self) -> Result<Vec<u8>> {
        self.cursor.read_to_end()
    }

    fn read_compressed(&mut self, length: u32) -> Result<DataElement> {
        if self.in_compressed {
            return Err(MatError::InvalidFormat(
                "Compressed element nested inside a compressed element".to_string(),
            ));
        }
        let payload = self.cursor.read_bytes(length as usize)?;
        debug!("Decompressing {} byte compressed element", length);

        let cursor = compression::decompressed_cursor(&payload, self.endianness())?;
        let mut inner = self.nested(cursor, true)?;
        inner.read_element()?.ok_or_else(|| {
            MatError::InvalidFormat("Compressed element holds no data element".to_string())
        })
    }

    fn read_matrix(&mut self, length: u32) -> Result<DataElement> {
        let bytes = self.read_padded(length)?;
        if bytes.is_empty() {
            trace!("Zero-length matrix element, decoding as empty matrix");
            return Ok(DataElement::Matrix(Box::new(Matrix::empty())));
        }

        let cursor = ByteCursor::new(bytes.as_slice(), self.endianness());
        let mut inner = self.nested(cursor, self.in_compressed)?;
        let matrix = matrix::read_matrix(&mut inner)?;
        debug!(
            "Decoded matrix '{}': class={:?}, shape={:?}",
            matrix.name().unwrap_or(""),
            matrix.class(),
            matrix.shape()
        );
        Ok(DataElement::Matrix(Box::new(matrix)))
    }

    fn nested<S: Read>(&self, cursor: ByteCursor<S>, in_compressed: bool) -> Result<ElementDecoder<S>> {
        let depth = self.depth + 1;
        if depth > self.options.max_depth {
            return Err(MatError::NestingTooDeep(self.options.max_depth));
        }
        Ok(ElementDecoder {
            cursor,
            options: self.options,
            depth,
            in_compressed,
        })
    }
}

/// Decodes a numeric or character payload.
pub fn decode_flat(data_type: DataType, bytes: &[u8], endianness: Endianness) -> Result<DataElement> {
    let width = data_type.width().ok_or_else(|| {
        MatError::InvalidFormat(format!("{} is not a flat data type", data_type))
    })?;
    if bytes.len() % width != 0 {
        return Err(MatError::InvalidFormat(format!(
            "{} payload of {} bytes is not a multiple of {}",
            data_type,
            bytes.len(),
            width
        )));
    }

    if data_type.is_text() {
        return Ok(DataElement::Text(decode_text(data_type, bytes, endianness)));
    }
    let data = match endianness {
        Endianness::Little => decode_numeric::<LittleEndian>(data_type, bytes)?,
        Endianness::Big => decode_numeric::<BigEndian>(data_type, bytes)?,
    };
    Ok(DataElement::Numeric(data))
}

fn decode_numeric<B: ByteOrder>(data_type: DataType, bytes: &[u8]) -> Result<NumericData> {
    let count = data_type.width().map_or(0, |w| bytes.len() / w);
    let data = match data_type {
        DataType::Int8 => NumericData::Int8(bytes.iter().map(|&b| b as i8).collect()),
        DataType::UInt8 => NumericData::UInt8(bytes.to_vec()),
        DataType::Int16 => {
            let mut values = vec![0i16; count];
            B::read_i16_into(bytes, &mut values);
            NumericData::Int16(values)
        }
        DataType::UInt16 => {
            let mut values = vec![0u16; count];
            B::read_u16_into(bytes, &mut values);
            NumericData::UInt16(values)
        }
        DataType::Int32 => {
            let mut values = vec![0i32; count];
            B::read_i32_into(bytes, &mut values);
            NumericData::Int32(values)
        }
        DataType::UInt32 => {
            let mut values = vec![0u32; count];
            B::read_u32_into(bytes, &mut values);
            NumericData::UInt32(values)
        }
        DataType::Int64 => {
            let mut values = vec![0i64; count];
            B::read_i64_into(bytes, &mut values);
            NumericData::Int64(values)
        }
        DataType::UInt64 => {
            let mut values = vec![0u64; count];
            B::read_u64_into(bytes, &mut values);
            NumericData::UInt64(values)
        }
        DataType::Single => {
            let mut values = vec![0f32; count];
            B::read_f32_into(bytes, &mut values);
            NumericData::Single(values)
        }
        DataType::Double => {
            let mut values = vec![0f64; count];
            B::read_f64_into(bytes, &mut values);
            NumericData::Double(values)
        }
        other => {
            return Err(MatError::InvalidFormat(format!("{} is not numeric", other)));
        }
    };
    Ok(data)
}

fn decode_text(data_type: DataType, bytes: &[u8], endianness: Endianness) -> String {
    match (data_type, endianness) {
        (DataType::Utf16, Endianness::Little) => {
            UTF_16LE.decode_without_bom_handling(bytes).0.into_owned()
        }
        (DataType::Utf16, Endianness::Big) => {
            UTF_16BE.decode_without_bom_handling(bytes).0.into_owned()
        }
        (DataType::Utf32, _) => bytes
            .chunks_exact(4)
            .map(|unit| {
                let code = match endianness {
                    Endianness::Little => LittleEndian::read_u32(unit),
                    Endianness::Big => BigEndian::read_u32(unit),
                };
                char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
            })
            .collect(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}
