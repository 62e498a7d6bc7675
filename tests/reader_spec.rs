mod common;

use common::*;
use matf_reader::{
    ArrayClass, DataElement, Endianness, MatError, MatFile, MatReaderOptions, NumericData,
};
use tempfile::TempDir;

fn tempdir() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

#[test]
fn open_missing_path_fails_with_path_not_found() {
    let dir = tempdir();
    for path in [dir.path().join("missing.mat"), "".into()] {
        match MatFile::open(&path) {
            Err(MatError::PathNotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("expected PathNotFound for {:?}, got {:?}", path, other),
        }
    }
}

#[test]
fn open_directory_fails_with_not_a_file() {
    let dir = tempdir();
    let err = MatFile::open(dir.path()).expect_err("directory must be rejected");
    assert!(matches!(err, MatError::NotAFile { .. }), "got {:?}", err);
    assert!(err.to_string().contains("is not a file"));
}

#[test]
fn open_short_file_fails_with_insufficient_data() {
    let dir = tempdir();
    let path = write_fixture(dir.path(), "noMatf.mat", b"noMatf");
    let err = MatFile::open(&path).expect_err("6-byte file must be rejected");
    assert!(
        matches!(
            err,
            MatError::InsufficientData {
                requested: 128,
                available: 6
            }
        ),
        "got {:?}",
        err
    );
    assert!(err.to_string().contains("Could not read enough bytes"));
}

#[test]
fn header_only_files_open_for_both_markers() {
    let dir = tempdir();
    for (name, order) in [
        ("headerOnly.mat", Endianness::Big),
        ("headerOnlyMI.mat", Endianness::Little),
    ] {
        let path = write_fixture(dir.path(), name, &header("MATLAB 5.0 MAT-file", order));
        let mut file = MatFile::open(&path).unwrap_or_else(|e| panic!("open {}: {}", name, e));
        assert_eq!(file.header.endianness, order, "byte order of {}", name);
        assert_eq!(file.header.version, 0x0100, "version of {}", name);
        assert_eq!(file.header.descriptor, "MATLAB 5.0 MAT-file");

        assert_eq!(file.read_element().expect("clean end"), None);
        assert_eq!(file.read_element().expect("end is idempotent"), None);
    }
}

#[test]
fn unknown_marker_is_not_a_mat_file() {
    let dir = tempdir();
    let mut bytes = header("not a mat file", Endianness::Little);
    bytes[126] = b'X';
    bytes[127] = b'Y';
    let path = write_fixture(dir.path(), "bad-marker.mat", &bytes);
    match MatFile::open(&path) {
        Err(MatError::NotMatFile { marker }) => assert_eq!(&marker, b"XY"),
        other => panic!("expected NotMatFile, got {:?}", other),
    }
}

#[test]
fn compressed_octave_fixture_yields_one_matrix() {
    let dir = tempdir();
    let bytes = octave_fixture();
    assert_eq!(bytes.len(), 185);
    let path = write_fixture(dir.path(), "simple.mat", &bytes);

    let mut file = MatFile::open(&path).expect("open simple.mat");
    assert_eq!(file.header.endianness, Endianness::Little);
    assert_eq!(file.header.descriptor, OCTAVE_DESCRIPTOR);

    let element = file
        .read_element()
        .expect("decode compressed element")
        .expect("one element");
    let matrix = element.into_matrix().expect("matrix element");
    assert_eq!(matrix.name(), Some("Phil_Katz"));
    assert_eq!(matrix.class(), ArrayClass::Double);
    assert_eq!(matrix.shape(), vec![1, 1]);
    assert_eq!(matrix.real(), Some(&NumericData::Double(vec![1989.0])));
    assert_eq!(matrix.imag(), None);

    assert_eq!(file.read_element().expect("clean end"), None);
}

#[test]
fn partial_tag_after_header_is_truncation_not_eof() {
    let dir = tempdir();
    let mut bytes = header("truncated", Endianness::Little);
    bytes.extend_from_slice(&[0x0E, 0x00, 0x00]);
    let path = write_fixture(dir.path(), "truncated.mat", &bytes);

    let mut file = MatFile::open(&path).expect("header is intact");
    assert!(matches!(
        file.read_element(),
        Err(MatError::InsufficientData {
            requested: 8,
            available: 3
        })
    ));
}

#[test]
fn truncated_compressed_payload_is_reported() {
    let dir = tempdir();
    let mut bytes = octave_fixture();
    bytes.truncate(bytes.len() - 10);
    let path = write_fixture(dir.path(), "short-zlib.mat", &bytes);

    let mut file = MatFile::open(&path).expect("header is intact");
    assert!(matches!(
        file.read_element(),
        Err(MatError::InsufficientData {
            requested: 49,
            available: 39
        })
    ));
}

#[test]
fn reads_after_close_fail() {
    let dir = tempdir();
    let path = write_fixture(dir.path(), "simple.mat", &octave_fixture());
    let mut file = MatFile::open(&path).expect("open");
    assert!(!file.is_closed());

    file.close();
    assert!(file.is_closed());
    assert!(matches!(file.read_element(), Err(MatError::HandleClosed)));
    file.close();
}

#[test]
fn big_endian_file_with_mixed_elements_iterates_in_order() {
    let order = Endianness::Big;
    let plain = matrix(order, MX_DOUBLE, 0, &[2, 1], "x", &[doubles(order, &[1.5, -2.0])]);
    let packed = compressed(
        order,
        &matrix(order, MX_CHAR, 0, &[1, 2], "s", &[uint16s(order, &[0x4F, 0x4B])]),
    );

    let mut bytes = header("MATLAB 5.0 MAT-file, big endian", order);
    bytes.extend(plain);
    bytes.extend(packed);
    bytes.extend(int32s(order, &[7]));

    let dir = tempdir();
    let path = write_fixture(dir.path(), "mixed.mat", &bytes);
    let mut file = MatFile::open(&path).expect("open mixed.mat");
    let elements = file.read_all().expect("read all elements");
    assert_eq!(elements.len(), 3);

    let x = elements[0].as_matrix().expect("x is a matrix");
    assert_eq!(x.name(), Some("x"));
    assert_eq!(x.real(), Some(&NumericData::Double(vec![1.5, -2.0])));

    let s = elements[1].as_matrix().expect("s is a matrix");
    assert_eq!(s.class(), ArrayClass::Char);
    assert_eq!(s.text().as_deref(), Some("OK"));

    assert_eq!(elements[2], DataElement::Numeric(NumericData::Int32(vec![7])));
    assert_eq!(file.read_element().expect("clean end"), None);
}

#[test]
fn iterator_stops_after_first_error() {
    let order = Endianness::Little;
    let mut bytes = header("bad type", order);
    bytes.extend(int32s(order, &[1, 2]));
    bytes.extend(element(order, 10, &[0; 8]));
    bytes.extend(int32s(order, &[3]));

    let dir = tempdir();
    let path = write_fixture(dir.path(), "bad-type.mat", &bytes);
    let mut file = MatFile::open(&path).expect("open");
    let results: Vec<_> = file.elements().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(MatError::UnsupportedType(10))));
}

#[test]
fn options_control_depth_and_size_checks() {
    let order = Endianness::Little;
    let cell = matrix(
        order,
        MX_CELL,
        0,
        &[1, 1],
        "c",
        &[matrix(order, MX_DOUBLE, 0, &[1, 1], "", &[doubles(order, &[1.0])])],
    );
    let mismatched = matrix(order, MX_DOUBLE, 0, &[2, 2], "m", &[doubles(order, &[1.0])]);

    let mut bytes = header("options", order);
    bytes.extend(compressed(order, &cell));
    let dir = tempdir();
    let nested = write_fixture(dir.path(), "nested.mat", &bytes);

    let mut shallow = MatFile::open_with(&nested, MatReaderOptions::new().max_depth(2))
        .expect("open nested.mat");
    assert!(matches!(
        shallow.read_element(),
        Err(MatError::NestingTooDeep(2))
    ));
    let mut deep = MatFile::open(&nested).expect("open nested.mat");
    let cells = deep.read_element().expect("default depth").expect("element");
    assert_eq!(cells.as_matrix().and_then(|m| m.cells()).map(|c| c.len()), Some(1));

    let mut bytes = header("options", order);
    bytes.extend(mismatched);
    let sized = write_fixture(dir.path(), "mismatch.mat", &bytes);

    let mut strict = MatFile::open(&sized).expect("open mismatch.mat");
    assert!(matches!(
        strict.read_element(),
        Err(MatError::SizeMismatch {
            expected: 4,
            found: 1,
            ..
        })
    ));
    let mut lenient =
        MatFile::open_with(&sized, MatReaderOptions::new().check_sizes(false)).expect("open");
    let element = lenient.read_element().expect("size check disabled");
    assert!(element.is_some());
}
