//! Matrix shape and metadata model.
//!
//! A decoded matrix keeps its full dimension vector as a [`Dim`]: the first
//! three axes in fixed slots for 1-3 dimensional consumers, plus an overflow
//! list for anything beyond.

use super::error::{MatError, Result};
use super::models::{ArrayClass, ArrayFlags, NumericData};

/// Number of fixed axis slots in [`Dim`].
pub const FIXED_AXES: usize = 3;

/// Most axes a [`DimensionList`] may declare when mapped with [`DimensionList::to_dim`].
pub const MAX_DECLARED_AXES: usize = 2;

/// A dimension descriptor: a declared axis count and the axis lengths.
///
/// Validated once at construction, so `declared_count() == values().len()`
/// always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionList {
    declared_count: usize,
    values: Vec<usize>,
}

impl DimensionList {
    pub fn new(declared_count: usize, values: Vec<usize>) -> Result<Self> {
        if declared_count != values.len() {
            return Err(MatError::DimensionCountMismatch {
                declared: declared_count,
                found: values.len(),
            });
        }
        Ok(Self {
            declared_count,
            values,
        })
    }

    /// Builds a descriptor from a sequence whose first entry is the axis count.
    pub fn from_sequence(sequence: &[i64]) -> Result<Self> {
        let (&count, rest) = sequence.split_first().ok_or(MatError::NoDimensions)?;
        let declared = usize::try_from(count)
            .map_err(|_| MatError::InvalidFormat(format!("Negative dimension count: {}", count)))?;
        let values = rest
            .iter()
            .map(|&v| {
                usize::try_from(v)
                    .map_err(|_| MatError::InvalidFormat(format!("Negative dimension: {}", v)))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(declared, values)
    }

    pub fn declared_count(&self) -> usize {
        self.declared_count
    }

    pub fn values(&self) -> &[usize] {
        &self.values
    }

    /// Maps a row/column descriptor onto the fixed-slot shape.
    ///
    /// Unlike [`Dim::new`], this rejects descriptors declaring more than
    /// [`MAX_DECLARED_AXES`] axes instead of spilling them into the overflow list.
    pub fn to_dim(&self) -> Result<Dim> {
        if self.declared_count == 0 {
            return Err(MatError::NoDimensions);
        }
        if self.declared_count > MAX_DECLARED_AXES {
            return Err(MatError::DimensionOverflow {
                count: self.declared_count,
                max: MAX_DECLARED_AXES,
            });
        }
        Ok(Dim::new(&self.values))
    }
}

/// Fixed 3-slot shape with an overflow list for axes past the third.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dim {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub extra: Vec<usize>,
    rank: usize,
}

impl Dim {
    pub fn new(dims: &[usize]) -> Self {
        let axis = |i: usize| dims.get(i).copied().unwrap_or(0);
        Self {
            x: axis(0),
            y: axis(1),
            z: axis(2),
            extra: dims.iter().skip(FIXED_AXES).copied().collect(),
            rank: dims.len(),
        }
    }

    /// Number of axes the shape was built from.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The full dimension vector.
    pub fn to_vec(&self) -> Vec<usize> {
        [self.x, self.y, self.z]
            .into_iter()
            .chain(self.extra.iter().copied())
            .take(self.rank)
            .collect()
    }

    /// Product of all axes; zero for a rank-0 shape.
    ///
    /// Fails with `InvalidFormat` when the product does not fit in a `u64`.
    pub fn element_count(&self) -> Result<u64> {
        if self.rank == 0 {
            return Ok(0);
        }
        self.to_vec()
            .iter()
            .try_fold(1u64, |acc, &d| acc.checked_mul(d as u64))
            .ok_or_else(|| {
                MatError::InvalidFormat(format!(
                    "Element count of dimensions {:?} overflows",
                    self.to_vec()
                ))
            })
    }
}

/// Payload of a decoded matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    /// Numeric, logical, or character data stored as numbers.
    Numeric {
        real: NumericData,
        imag: Option<NumericData>,
    },
    /// Character data stored as a UTF-8/16/32 element.
    Text(String),
    Cell(Vec<Matrix>),
    /// Field values in element-major order: all fields of element 0, then element 1, ...
    Struct {
        field_names: Vec<String>,
        values: Vec<Matrix>,
    },
    /// Undecoded sub-element bytes of sparse, object, function and opaque arrays.
    Opaque(Vec<u8>),
}

/// A decoded numeric, character, cell or struct array.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub flags: ArrayFlags,
    pub dim: Dim,
    pub name: Option<String>,
    pub data: ArrayData,
}

impl Matrix {
    pub fn new(flags: ArrayFlags, dim: Dim, name: Option<String>, data: ArrayData) -> Self {
        Self {
            flags,
            dim,
            name,
            data,
        }
    }

    /// The 0x0 double matrix a zero-length matrix element stands for.
    pub fn empty() -> Self {
        Self::new(
            ArrayFlags::new(ArrayClass::Double),
            Dim::new(&[0, 0]),
            None,
            ArrayData::Numeric {
                real: NumericData::Double(Vec::new()),
                imag: None,
            },
        )
    }

    pub fn class(&self) -> ArrayClass {
        self.flags.class
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_complex(&self) -> bool {
        self.flags.complex
    }

    pub fn shape(&self) -> Vec<usize> {
        self.dim.to_vec()
    }

    /// Returns the first, second and third axis (0 when absent) and any
    /// further axes.
    pub fn dimensions(&self) -> Result<(usize, usize, usize, Vec<usize>)> {
        if self.dim.rank() == 0 {
            return Err(MatError::NoDimensions);
        }
        Ok((self.dim.x, self.dim.y, self.dim.z, self.dim.extra.clone()))
    }

    pub fn real(&self) -> Option<&NumericData> {
        match &self.data {
            ArrayData::Numeric { real, .. } => Some(real),
            _ => None,
        }
    }

    pub fn imag(&self) -> Option<&NumericData> {
        match &self.data {
            ArrayData::Numeric { imag, .. } => imag.as_ref(),
            _ => None,
        }
    }

    /// Character content of a char matrix, in storage (column-major) order.
    pub fn text(&self) -> Option<String> {
        if self.flags.class != ArrayClass::Char {
            return None;
        }
        match &self.data {
            ArrayData::Text(text) => Some(text.clone()),
            ArrayData::Numeric { real, .. } => match real {
                NumericData::UInt16(units) => Some(String::from_utf16_lossy(units)),
                NumericData::UInt8(bytes) => Some(bytes.iter().map(|&b| b as char).collect()),
                other => Some(
                    other
                        .to_f64()
                        .into_iter()
                        .map(|v| char::from_u32(v as u32).unwrap_or(char::REPLACEMENT_CHARACTER))
                        .collect(),
                ),
            },
            _ => None,
        }
    }

    pub fn cells(&self) -> Option<&[Matrix]> {
        match &self.data {
            ArrayData::Cell(cells) => Some(cells),
            _ => None,
        }
    }

    /// Looks up a struct field of the element at `index`.
    pub fn field(&self, index: usize, name: &str) -> Option<&Matrix> {
        match &self.data {
            ArrayData::Struct {
                field_names,
                values,
            } => {
                let position = field_names.iter().position(|f| f == name)?;
                values.get(index * field_names.len() + position)
            }
            _ => None,
        }
    }
}
