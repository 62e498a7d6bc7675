//! Iterator for sequential access to the elements of a MAT file.
//!
//! # Example
//! ```no_run
//! # use matf_reader::MatFile;
//! # let mut file = MatFile::open("data.mat").unwrap();
//! for element in file.elements() {
//!     let element = element.unwrap();
//!     println!("{}", element.kind_name());
//! }
//! ```

use super::reader::MatFile;
use super::types::error::Result;
use super::types::models::DataElement;

/// Iterator over top-level data elements.
///
/// Yields `Result<DataElement>` and stops after the clean end of the file or
/// after the first error, since a failed read leaves the stream at an unknown
/// position.
///
/// Created by [`MatFile::elements()`](crate::MatFile::elements).
pub struct ElementIterator<'a> {
    file: &'a mut MatFile,
    done: bool,
}

impl<'a> ElementIterator<'a> {
    pub(super) fn new(file: &'a mut MatFile) -> Self {
        Self { file, done: false }
    }
}

impl Iterator for ElementIterator<'_> {
    type Item = Result<DataElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.file.read_element() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
