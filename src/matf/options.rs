//! Reader configuration.

/// Default cap on nested element recursion.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Options controlling how a MAT file is decoded.
///
/// ```
/// # use matf_reader::MatReaderOptions;
/// let options = MatReaderOptions::new().max_depth(8).check_sizes(false);
/// assert_eq!(options.max_depth, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatReaderOptions {
    /// Deepest allowed nesting of compressed, matrix, cell and struct elements.
    pub max_depth: usize,
    /// Reject matrices whose payload value count differs from the product of their dimensions.
    pub check_sizes: bool,
}

impl MatReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn check_sizes(mut self, enabled: bool) -> Self {
        self.check_sizes = enabled;
        self
    }
}

impl Default for MatReaderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            check_sizes: true,
        }
    }
}
