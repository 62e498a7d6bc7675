//! Core data structures for MAT5 file components.
//!
//! This module defines the fundamental types used throughout the library:
//! - File header and byte order
//! - Element type codes and array classes
//! - Decoded numeric payloads and data elements

use std::fmt;

use super::error::{MatError, Result};
use super::shape::Matrix;

/// Byte order of every multi-byte field after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Maps the 2-byte header marker to a byte order.
    ///
    /// The writer stores the characters `M` and `I` as one 16-bit value, so a
    /// little-endian writer leaves `IM` on disk and a big-endian writer `MI`.
    pub fn from_marker(marker: [u8; 2]) -> Result<Self> {
        match &marker {
            b"IM" => Ok(Self::Little),
            b"MI" => Ok(Self::Big),
            _ => Err(MatError::NotMatFile { marker }),
        }
    }
}

/// The fixed 128-byte header at the start of every MAT5 file.
#[derive(Debug, Clone)]
pub struct MatHeader {
    /// Free-text descriptor with trailing padding removed.
    pub descriptor: String,
    /// Offset of subsystem-specific data; zero or all-spaces when unused.
    pub subsystem_offset: u64,
    pub version: u16,
    pub endianness: Endianness,
}

/// Element type codes (the `mi*` constants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int8 = 1,
    UInt8 = 2,
    Int16 = 3,
    UInt16 = 4,
    Int32 = 5,
    UInt32 = 6,
    Single = 7,
    Double = 9,
    Int64 = 12,
    UInt64 = 13,
    Matrix = 14,
    Compressed = 15,
    Utf8 = 16,
    Utf16 = 17,
    Utf32 = 18,
}

impl DataType {
    /// Width in bytes of one value, `None` for the wrapper types.
    pub fn width(&self) -> Option<usize> {
        match self {
            DataType::Int8 | DataType::UInt8 | DataType::Utf8 => Some(1),
            DataType::Int16 | DataType::UInt16 | DataType::Utf16 => Some(2),
            DataType::Int32 | DataType::UInt32 | DataType::Single | DataType::Utf32 => Some(4),
            DataType::Double | DataType::Int64 | DataType::UInt64 => Some(8),
            DataType::Matrix | DataType::Compressed => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DataType::Utf8 | DataType::Utf16 | DataType::Utf32)
    }
}

impl TryFrom<u32> for DataType {
    type Error = MatError;
    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(Self::Int8),
            2 => Ok(Self::UInt8),
            3 => Ok(Self::Int16),
            4 => Ok(Self::UInt16),
            5 => Ok(Self::Int32),
            6 => Ok(Self::UInt32),
            7 => Ok(Self::Single),
            9 => Ok(Self::Double),
            12 => Ok(Self::Int64),
            13 => Ok(Self::UInt64),
            14 => Ok(Self::Matrix),
            15 => Ok(Self::Compressed),
            16 => Ok(Self::Utf8),
            17 => Ok(Self::Utf16),
            18 => Ok(Self::Utf32),
            _ => Err(MatError::UnsupportedType(value)),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DataType::Int8 => "miINT8",
            DataType::UInt8 => "miUINT8",
            DataType::Int16 => "miINT16",
            DataType::UInt16 => "miUINT16",
            DataType::Int32 => "miINT32",
            DataType::UInt32 => "miUINT32",
            DataType::Single => "miSINGLE",
            DataType::Double => "miDOUBLE",
            DataType::Int64 => "miINT64",
            DataType::UInt64 => "miUINT64",
            DataType::Matrix => "miMATRIX",
            DataType::Compressed => "miCOMPRESSED",
            DataType::Utf8 => "miUTF8",
            DataType::Utf16 => "miUTF16",
            DataType::Utf32 => "miUTF32",
        };
        write!(f, "{}", name)
    }
}

/// Array classes (the `mx*` constants) carried in the array-flags sub-element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayClass {
    Cell = 1,
    Struct = 2,
    Object = 3,
    Char = 4,
    Sparse = 5,
    Double = 6,
    Single = 7,
    Int8 = 8,
    UInt8 = 9,
    Int16 = 10,
    UInt16 = 11,
    Int32 = 12,
    UInt32 = 13,
    Int64 = 14,
    UInt64 = 15,
    Function = 16,
    Opaque = 17,
}

impl ArrayClass {
    /// True for classes whose payload is a real (and optional imaginary) numeric part.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ArrayClass::Double
                | ArrayClass::Single
                | ArrayClass::Int8
                | ArrayClass::UInt8
                | ArrayClass::Int16
                | ArrayClass::UInt16
                | ArrayClass::Int32
                | ArrayClass::UInt32
                | ArrayClass::Int64
                | ArrayClass::UInt64
        )
    }
}

impl TryFrom<u8> for ArrayClass {
    type Error = MatError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Cell),
            2 => Ok(Self::Struct),
            3 => Ok(Self::Object),
            4 => Ok(Self::Char),
            5 => Ok(Self::Sparse),
            6 => Ok(Self::Double),
            7 => Ok(Self::Single),
            8 => Ok(Self::Int8),
            9 => Ok(Self::UInt8),
            10 => Ok(Self::Int16),
            11 => Ok(Self::UInt16),
            12 => Ok(Self::Int32),
            13 => Ok(Self::UInt32),
            14 => Ok(Self::Int64),
            15 => Ok(Self::UInt64),
            16 => Ok(Self::Function),
            17 => Ok(Self::Opaque),
            _ => Err(MatError::InvalidFormat(format!("Unknown array class: {}", value))),
        }
    }
}

/// Decoded array-flags sub-element.
///
/// The first word holds the class in its low byte and the flag bits in the
/// next byte:
/// - Bit 0x08: complex
/// - Bit 0x04: global
/// - Bit 0x02: logical
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayFlags {
    pub class: ArrayClass,
    pub complex: bool,
    pub global: bool,
    pub logical: bool,
    /// Maximum non-zero count, only meaningful for sparse arrays.
    pub nzmax: u32,
}

impl ArrayFlags {
    pub fn new(class: ArrayClass) -> Self {
        Self {
            class,
            complex: false,
            global: false,
            logical: false,
            nzmax: 0,
        }
    }

    /// Unpacks the two words of the array-flags payload.
    pub fn from_words(flags_word: u32, nzmax: u32) -> Result<Self> {
        let class = ArrayClass::try_from((flags_word & 0xFF) as u8)?;
        let bits = (flags_word >> 8) & 0xFF;
        Ok(Self {
            class,
            complex: bits & 0x08 != 0,
            global: bits & 0x04 != 0,
            logical: bits & 0x02 != 0,
            nzmax,
        })
    }
}

/// Typed numeric payload of a data element, in file storage order.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericData {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Single(Vec<f32>),
    Double(Vec<f64>),
}

impl NumericData {
    pub fn len(&self) -> usize {
        match self {
            NumericData::Int8(v) => v.len(),
            NumericData::UInt8(v) => v.len(),
            NumericData::Int16(v) => v.len(),
            NumericData::UInt16(v) => v.len(),
            NumericData::Int32(v) => v.len(),
            NumericData::UInt32(v) => v.len(),
            NumericData::Int64(v) => v.len(),
            NumericData::UInt64(v) => v.len(),
            NumericData::Single(v) => v.len(),
            NumericData::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type this payload was stored as.
    pub fn data_type(&self) -> DataType {
        match self {
            NumericData::Int8(_) => DataType::Int8,
            NumericData::UInt8(_) => DataType::UInt8,
            NumericData::Int16(_) => DataType::Int16,
            NumericData::UInt16(_) => DataType::UInt16,
            NumericData::Int32(_) => DataType::Int32,
            NumericData::UInt32(_) => DataType::UInt32,
            NumericData::Int64(_) => DataType::Int64,
            NumericData::UInt64(_) => DataType::UInt64,
            NumericData::Single(_) => DataType::Single,
            NumericData::Double(_) => DataType::Double,
        }
    }

    /// Widens every value to `f64`.
    ///
    /// Writers commonly store doubles in the smallest integer type that holds
    /// them, so this is the usual way to read a numeric matrix.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            NumericData::Int8(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::UInt8(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::Int16(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::UInt16(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::Int32(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::UInt32(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::Int64(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::UInt64(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::Single(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::Double(v) => v.clone(),
        }
    }

    /// Interprets the values as non-negative integers, as used by dimension
    /// and field-name-length sub-elements.
    pub fn to_usize(&self) -> Result<Vec<usize>> {
        let signed: Vec<i64> = match self {
            NumericData::Int8(v) => v.iter().map(|&x| x as i64).collect(),
            NumericData::UInt8(v) => v.iter().map(|&x| x as i64).collect(),
            NumericData::Int16(v) => v.iter().map(|&x| x as i64).collect(),
            NumericData::UInt16(v) => v.iter().map(|&x| x as i64).collect(),
            NumericData::Int32(v) => v.iter().map(|&x| x as i64).collect(),
            NumericData::UInt32(v) => v.iter().map(|&x| x as i64).collect(),
            NumericData::Int64(v) => v.clone(),
            NumericData::UInt64(v) => v
                .iter()
                .map(|&x| i64::try_from(x).unwrap_or(i64::MAX))
                .collect(),
            NumericData::Single(_) | NumericData::Double(_) => {
                return Err(MatError::InvalidFormat(format!(
                    "Expected integer values, found {}",
                    self.data_type()
                )));
            }
        };
        signed
            .into_iter()
            .map(|x| {
                usize::try_from(x)
                    .map_err(|_| MatError::InvalidFormat(format!("Negative size value: {}", x)))
            })
            .collect()
    }
}

/// One decoded tag+payload unit.
#[derive(Debug, Clone, PartialEq)]
pub enum DataElement {
    /// A flat numeric payload.
    Numeric(NumericData),
    /// A character payload stored as UTF-8, UTF-16 or UTF-32.
    Text(String),
    /// A matrix, whether stored plainly or inside a compressed wrapper.
    Matrix(Box<Matrix>),
}

impl DataElement {
    /// A short name used in error messages and logs.
    pub fn kind_name(&self) -> String {
        match self {
            DataElement::Numeric(data) => data.data_type().to_string(),
            DataElement::Text(_) => "text".to_string(),
            DataElement::Matrix(_) => DataType::Matrix.to_string(),
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            DataElement::Matrix(matrix) => Some(matrix),
            _ => None,
        }
    }

    pub fn into_matrix(self) -> Option<Matrix> {
        match self {
            DataElement::Matrix(matrix) => Some(*matrix),
            _ => None,
        }
    }
}
