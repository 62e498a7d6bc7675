//! Byte-level builders for MAT5 test fixtures.
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::{Compression, write::ZlibEncoder};
use matf_reader::Endianness;

pub const MX_CELL: u8 = 1;
pub const MX_STRUCT: u8 = 2;
pub const MX_CHAR: u8 = 4;
pub const MX_SPARSE: u8 = 5;
pub const MX_DOUBLE: u8 = 6;
pub const MX_INT16: u8 = 10;

pub const FLAG_COMPLEX: u8 = 0x08;
pub const FLAG_GLOBAL: u8 = 0x04;

/// Header text of the compressed Octave fixture.
pub const OCTAVE_DESCRIPTOR: &str =
    "MATLAB 5.0 MAT-file, written by Octave 4.2.2, 2018-05-25 09:16:38 UTC";

/// zlib stream of a 1x1 double matrix named `Phil_Katz` holding 1989.
pub const PHIL_KATZ_ZLIB: [u8; 49] = [
    0x78, 0x9c, 0xe3, 0x63, 0x60, 0x60, 0xf0, 0x00, 0x62, 0x36, 0x20, 0xe6,
    0x80, 0xd2, 0x8c, 0x40, 0xcc, 0x0a, 0xe5, 0x33, 0x22, 0x61, 0x4e, 0x20,
    0x0e, 0xc8, 0xc8, 0xcc, 0x89, 0xf7, 0x4e, 0x2c, 0xa9, 0x62, 0x80, 0x00,
    0x4e, 0xa8, 0x3a, 0x30, 0x10, 0x99, 0xef, 0x00, 0x00, 0x88, 0xd3, 0x05,
    0x0f,
];

pub fn u16_bytes(order: Endianness, value: u16) -> [u8; 2] {
    match order {
        Endianness::Little => value.to_le_bytes(),
        Endianness::Big => value.to_be_bytes(),
    }
}

pub fn u32_bytes(order: Endianness, value: u32) -> [u8; 4] {
    match order {
        Endianness::Little => value.to_le_bytes(),
        Endianness::Big => value.to_be_bytes(),
    }
}

/// A 128-byte header: space-padded text, blank subsystem offset, version 0x0100, marker.
pub fn header(descriptor: &str, order: Endianness) -> Vec<u8> {
    let mut bytes = descriptor.as_bytes().to_vec();
    bytes.resize(124, b' ');
    bytes.extend_from_slice(&u16_bytes(order, 0x0100));
    bytes.extend_from_slice(match order {
        Endianness::Little => b"IM",
        Endianness::Big => b"MI",
    });
    bytes
}

/// The complete Octave file: header plus one compressed matrix, 185 bytes.
pub fn octave_fixture() -> Vec<u8> {
    let mut bytes = header(OCTAVE_DESCRIPTOR, Endianness::Little);
    bytes.extend_from_slice(&u32_bytes(Endianness::Little, 15));
    bytes.extend_from_slice(&u32_bytes(Endianness::Little, PHIL_KATZ_ZLIB.len() as u32));
    bytes.extend_from_slice(&PHIL_KATZ_ZLIB);
    bytes
}

/// Full-form element with padding to 8 bytes.
pub fn element(order: Endianness, type_code: u32, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&u32_bytes(order, type_code));
    bytes.extend_from_slice(&u32_bytes(order, payload.len() as u32));
    bytes.extend_from_slice(payload);
    bytes.resize(bytes.len().next_multiple_of(8), 0);
    bytes
}

/// Compact-form element; `payload` holds at most 4 bytes.
pub fn compact(order: Endianness, type_code: u32, payload: &[u8]) -> Vec<u8> {
    assert!(payload.len() <= 4);
    let word = ((payload.len() as u32) << 16) | type_code;
    let mut bytes = u32_bytes(order, word).to_vec();
    bytes.extend_from_slice(payload);
    bytes.resize(8, 0);
    bytes
}

/// miCOMPRESSED element wrapping `inner`; no padding follows.
pub fn compressed(order: Endianness, inner: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(inner).expect("compress fixture");
    let zlib = encoder.finish().expect("finish fixture");

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&u32_bytes(order, 15));
    bytes.extend_from_slice(&u32_bytes(order, zlib.len() as u32));
    bytes.extend_from_slice(&zlib);
    bytes
}

pub fn doubles(order: Endianness, values: &[f64]) -> Vec<u8> {
    let payload: Vec<u8> = values
        .iter()
        .flat_map(|v| match order {
            Endianness::Little => v.to_le_bytes(),
            Endianness::Big => v.to_be_bytes(),
        })
        .collect();
    element(order, 9, &payload)
}

pub fn uint16s(order: Endianness, values: &[u16]) -> Vec<u8> {
    let payload: Vec<u8> = values.iter().flat_map(|&v| u16_bytes(order, v)).collect();
    element(order, 4, &payload)
}

pub fn int32s(order: Endianness, values: &[i32]) -> Vec<u8> {
    let payload: Vec<u8> = values
        .iter()
        .flat_map(|&v| u32_bytes(order, v as u32))
        .collect();
    element(order, 5, &payload)
}

/// miMATRIX element from its header fields and trailing parts.
pub fn matrix(
    order: Endianness,
    class: u8,
    flag_bits: u8,
    dims: &[i32],
    name: &str,
    parts: &[Vec<u8>],
) -> Vec<u8> {
    let mut flags = u32_bytes(order, class as u32 | ((flag_bits as u32) << 8)).to_vec();
    flags.extend_from_slice(&u32_bytes(order, 0));

    let mut payload = element(order, 6, &flags);
    payload.extend(int32s(order, dims));
    payload.extend(element(order, 1, name.as_bytes()));
    for part in parts {
        payload.extend_from_slice(part);
    }
    element(order, 14, &payload)
}

pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes)
        .unwrap_or_else(|e| panic!("failed to write {}: {}", path.display(), e));
    path
}
