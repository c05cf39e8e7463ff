/// Storage order of a matrix buffer.
///
/// Both orders describe the same logical `rows x cols` grid and differ only
/// in how `(row, col)` linearizes into a flat offset. Every offset
/// computation in the workspace goes through [`Layout::index`]; no component
/// hand-computes offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Element `(row, col)` lives at offset `col * rows + row`.
    ColMajor,
    /// Element `(row, col)` lives at offset `row * cols + col`.
    RowMajor,
}

impl Layout {
    /// Leading dimension of a contiguous `rows x cols` matrix in this order:
    /// the stride between consecutive columns (column-major) or rows
    /// (row-major).
    #[inline(always)]
    pub fn leading_dim(self, rows: usize, cols: usize) -> usize {
        match self {
            Layout::ColMajor => rows,
            Layout::RowMajor => cols,
        }
    }

    /// Flat offset of logical element `(row, col)` given the leading
    /// dimension returned by [`Layout::leading_dim`].
    #[inline(always)]
    pub fn index(self, row: usize, col: usize, ld: usize) -> usize {
        match self {
            Layout::ColMajor => col * ld + row,
            Layout::RowMajor => row * ld + col,
        }
    }

    /// The opposite storage order.
    #[inline(always)]
    pub fn flipped(self) -> Layout {
        match self {
            Layout::ColMajor => Layout::RowMajor,
            Layout::RowMajor => Layout::ColMajor,
        }
    }
}
