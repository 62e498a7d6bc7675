//! Assembly of `miMATRIX` payloads.
//!
//! A matrix payload is a fixed sequence of sub-elements, each following the
//! ordinary tag/payload/padding protocol:
//!
//! ```text
//! array flags   miUINT32, exactly 8 bytes (class, flag bits, nzmax)
//! dimensions    miINT32 vector, at least 2 entries
//! array name    miINT8 characters, may be empty
//! then, by class:
//!   numeric/char/logical  real part [, imaginary part if complex]
//!   cell                  one miMATRIX per element
//!   struct                field name length, packed field names,
//!                         one miMATRIX per field per element
//!   anything else         kept as undecoded bytes
//! ```

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::{debug, trace};

use crate::matf::types::error::{MatError, Result};
use crate::matf::types::models::{ArrayClass, ArrayFlags, DataElement, DataType, Endianness, NumericData};
use crate::matf::types::shape::{ArrayData, Dim, DimensionList, Matrix};

use super::element::{ElementDecoder, TAG_LEN};

const ARRAY_FLAGS_LEN: u32 = 8;

/// Decodes the sub-elements of one matrix from `decoder`.
pub(crate) fn read_matrix<R: Read>(decoder: &mut ElementDecoder<R>) -> Result<Matrix> {
    let flags = read_array_flags(decoder)?;
    let dim = read_dimensions(decoder)?;
    let name = read_name(decoder)?;
    trace!("Matrix header: flags={:?}, dims={:?}, name={:?}", flags, dim.to_vec(), name);

    let data = match flags.class {
        ArrayClass::Cell => read_cells(decoder, &dim)?,
        ArrayClass::Struct => read_struct(decoder, &dim)?,
        class if class.is_numeric() || class == ArrayClass::Char => read_parts(decoder, &flags)?,
        class => {
            debug!("Keeping {:?} array payload undecoded", class);
            ArrayData::Opaque(decoder.read_remaining()?)
        }
    };

    let matrix = Matrix::new(flags, dim, name, data);
    if decoder.options().check_sizes {
        check_sizes(&matrix)?;
    }
    Ok(matrix)
}

fn read_array_flags<R: Read>(decoder: &mut ElementDecoder<R>) -> Result<ArrayFlags> {
    let tag = decoder.read_tag()?.ok_or(MatError::InsufficientData {
        requested: TAG_LEN,
        available: 0,
    })?;
    if tag.length != ARRAY_FLAGS_LEN || tag.inline.is_some() {
        return Err(MatError::ArrayFlagsSize(tag.length));
    }
    match DataType::try_from(tag.type_code)? {
        DataType::UInt32 | DataType::Int32 => {}
        other => {
            return Err(MatError::UnexpectedElement {
                context: "array flags",
                expected: "miUINT32",
                found: other.to_string(),
            });
        }
    }

    let bytes = decoder.read_padded(ARRAY_FLAGS_LEN)?;
    let (flags_word, nzmax) = match decoder.endianness() {
        Endianness::Little => (
            LittleEndian::read_u32(&bytes[..4]),
            LittleEndian::read_u32(&bytes[4..]),
        ),
        Endianness::Big => (BigEndian::read_u32(&bytes[..4]), BigEndian::read_u32(&bytes[4..])),
    };
    ArrayFlags::from_words(flags_word, nzmax)
}

fn read_dimensions<R: Read>(decoder: &mut ElementDecoder<R>) -> Result<Dim> {
    let values = expect_numeric(decoder.read_required()?, "dimensions")?.to_usize()?;
    let list = DimensionList::new(values.len(), values)?;
    match list.declared_count() {
        0 => Err(MatError::NoDimensions),
        1 => Err(MatError::InvalidFormat(
            "Matrix must declare at least 2 dimensions, found 1".to_string(),
        )),
        _ => Ok(Dim::new(list.values())),
    }
}

fn read_name<R: Read>(decoder: &mut ElementDecoder<R>) -> Result<Option<String>> {
    let bytes = match decoder.read_required()? {
        DataElement::Text(text) => text.into_bytes(),
        other => character_bytes(expect_numeric(other, "array name")?, "array name")?,
    };
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

fn read_parts<R: Read>(decoder: &mut ElementDecoder<R>, flags: &ArrayFlags) -> Result<ArrayData> {
    let real = match decoder.read_required()? {
        DataElement::Numeric(real) => real,
        DataElement::Text(text) if flags.class == ArrayClass::Char && !flags.complex => {
            return Ok(ArrayData::Text(text));
        }
        other => {
            return Err(MatError::UnexpectedElement {
                context: "real part",
                expected: "numeric data",
                found: other.kind_name(),
            });
        }
    };
    let imag = if flags.complex {
        Some(expect_numeric(decoder.read_required()?, "imaginary part")?)
    } else {
        None
    };
    Ok(ArrayData::Numeric { real, imag })
}

fn read_cells<R: Read>(decoder: &mut ElementDecoder<R>, dim: &Dim) -> Result<ArrayData> {
    let count = dim.element_count()?;
    let mut cells = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        cells.push(expect_matrix(decoder.read_required()?, "cell")?);
    }
    Ok(ArrayData::Cell(cells))
}

fn read_struct<R: Read>(decoder: &mut ElementDecoder<R>, dim: &Dim) -> Result<ArrayData> {
    let name_len = expect_numeric(decoder.read_required()?, "field name length")?
        .to_usize()?
        .first()
        .copied()
        .ok_or_else(|| MatError::InvalidFormat("Empty field name length".to_string()))?;
    let names = character_bytes(
        expect_numeric(decoder.read_required()?, "field names")?,
        "field names",
    )?;

    let field_names: Vec<String> = if name_len == 0 {
        Vec::new()
    } else {
        if names.len() % name_len != 0 {
            return Err(MatError::InvalidFormat(format!(
                "Field names of {} bytes do not split into {} byte names",
                names.len(),
                name_len
            )));
        }
        names
            .chunks(name_len)
            .map(|chunk| {
                let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
                String::from_utf8_lossy(&chunk[..end]).into_owned()
            })
            .collect()
    };
    trace!("Struct fields: {:?}", field_names);

    let count = dim
        .element_count()?
        .checked_mul(field_names.len() as u64)
        .ok_or_else(|| {
            MatError::InvalidFormat(format!(
                "Struct of {} fields over dimensions {:?} is too large",
                field_names.len(),
                dim.to_vec()
            ))
        })?;
    let mut values = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        values.push(expect_matrix(decoder.read_required()?, "struct field")?);
    }
    Ok(ArrayData::Struct {
        field_names,
        values,
    })
}

fn check_sizes(matrix: &Matrix) -> Result<()> {
    let ArrayData::Numeric { real, imag } = &matrix.data else {
        return Ok(());
    };
    let expected = matrix.dim.element_count()?;
    if real.len() as u64 != expected {
        return Err(MatError::SizeMismatch {
            context: "real part",
            expected,
            found: real.len() as u64,
        });
    }
    if let Some(imag) = imag
        && imag.len() as u64 != expected
    {
        return Err(MatError::SizeMismatch {
            context: "imaginary part",
            expected,
            found: imag.len() as u64,
        });
    }
    Ok(())
}

fn expect_numeric(element: DataElement, context: &'static str) -> Result<NumericData> {
    match element {
        DataElement::Numeric(data) => Ok(data),
        other => Err(MatError::UnexpectedElement {
            context,
            expected: "numeric data",
            found: other.kind_name(),
        }),
    }
}

fn expect_matrix(element: DataElement, context: &'static str) -> Result<Matrix> {
    match element {
        DataElement::Matrix(matrix) => Ok(*matrix),
        other => Err(MatError::UnexpectedElement {
            context,
            expected: "miMATRIX",
            found: other.kind_name(),
        }),
    }
}

fn character_bytes(data: NumericData, context: &'static str) -> Result<Vec<u8>> {
    match data {
        NumericData::Int8(values) => Ok(values.into_iter().map(|b| b as u8).collect()),
        NumericData::UInt8(values) => Ok(values),
        other => Err(MatError::UnexpectedElement {
            context,
            expected: "miINT8",
            found: other.data_type().to_string(),
        }),
    }
}
