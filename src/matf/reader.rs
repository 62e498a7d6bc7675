use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::format::element::ElementDecoder;
use super::format::header::{self, HEADER_LEN};
use super::iter::ElementIterator;
use super::options::MatReaderOptions;
use super::types::error::{MatError, Result};
use super::types::models::{DataElement, MatHeader};
use super::utils::ByteCursor;

/// An open MAT5 file.
///
/// Owns the file stream and the parsed header. Elements are read strictly in
/// sequence; each read takes `&mut self`, so only one can be in flight.
///
/// # Example
/// ```no_run
/// # use matf_reader::MatFile;
/// let mut file = MatFile::open("data.mat")?;
/// while let Some(element) = file.read_element()? {
///     if let Some(matrix) = element.as_matrix() {
///         println!("{:?} {:?}", matrix.name(), matrix.shape());
///     }
/// }
/// file.close();
/// # Ok::<(), matf_reader::MatError>(())
/// ```
#[derive(Debug)]
pub struct MatFile {
    path: PathBuf,
    pub header: MatHeader,
    decoder: Option<ElementDecoder<BufReader<File>>>,
    finished: bool,
}

impl MatFile {
    /// Opens a MAT file with default options.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The path does not exist (`PathNotFound`)
    /// - The path is a directory or other non-regular file (`NotAFile`)
    /// - Fewer than 128 header bytes are available (`InsufficientData`)
    /// - The endianness marker is not recognised (`NotMatFile`)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, MatReaderOptions::default())
    }

    /// Opens a MAT file with explicit decoding options.
    pub fn open_with(path: impl AsRef<Path>, options: MatReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening MAT file: {}", path.display());

        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MatError::PathNotFound {
                path: path.to_path_buf(),
            },
            _ => MatError::Io(e),
        })?;
        if !metadata.is_file() {
            return Err(MatError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let mut file = BufReader::new(File::open(path)?);
        let header = header::parse(&mut file)?;

        let cursor = ByteCursor::with_position(file, header.endianness, HEADER_LEN as u64);
        Ok(Self {
            path: path.to_path_buf(),
            header,
            decoder: Some(ElementDecoder::new(cursor, options)),
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.decoder.is_none()
    }

    /// Reads the next top-level element.
    ///
    /// Returns `Ok(None)` once the file ends at an element boundary; further
    /// calls keep returning `Ok(None)`. Fails with `HandleClosed` after
    /// [`close`](Self::close).
    pub fn read_element(&mut self) -> Result<Option<DataElement>> {
        let decoder = self.decoder.as_mut().ok_or(MatError::HandleClosed)?;
        if self.finished {
            return Ok(None);
        }
        let element = decoder.read_element()?;
        if element.is_none() {
            debug!(
                "End of MAT file {} after {} bytes",
                self.path.display(),
                decoder.position()
            );
            self.finished = true;
        }
        Ok(element)
    }

    /// Returns an iterator over the remaining top-level elements.
    pub fn elements(&mut self) -> ElementIterator<'_> {
        ElementIterator::new(self)
    }

    /// Convenience method: read every remaining element.
    pub fn read_all(&mut self) -> Result<Vec<DataElement>> {
        self.elements().collect()
    }

    /// Releases the underlying file. Later reads fail with `HandleClosed`.
    pub fn close(&mut self) {
        if self.decoder.take().is_some() {
            info!("Closed MAT file: {}", self.path.display());
        }
    }
}
