use crate::error::{MatmulError, Result};
use crate::layout::Layout;

/// A batch of independent same-shape f32 matrices in one contiguous buffer.
///
/// Matrix `i` occupies elements `i * rows * cols .. (i + 1) * rows * cols`,
/// and every matrix in the batch uses the same storage order. Buffers are
/// populated once and then consumed read-only; nothing mutates a batch
/// concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBatch {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
    num_matrices: usize,
    layout: Layout,
}

impl MatrixBatch {
    /// Create a zero-filled batch of `num_matrices` matrices of shape
    /// `rows x cols`.
    pub fn zeros(rows: usize, cols: usize, num_matrices: usize, layout: Layout) -> Self {
        MatrixBatch {
            data: vec![0.0; rows * cols * num_matrices],
            rows,
            cols,
            num_matrices,
            layout,
        }
    }

    /// Wrap an existing buffer as a batch.
    ///
    /// # Errors
    /// Returns `SizeMismatch` if `data.len()` differs from
    /// `rows * cols * num_matrices`.
    pub fn from_vec(
        data: Vec<f32>,
        rows: usize,
        cols: usize,
        num_matrices: usize,
        layout: Layout,
    ) -> Result<Self> {
        let expected = rows * cols * num_matrices;
        if data.len() != expected {
            return Err(MatmulError::SizeMismatch {
                operand: "batch",
                expected,
                got: data.len(),
            });
        }
        Ok(MatrixBatch {
            data,
            rows,
            cols,
            num_matrices,
            layout,
        })
    }

    /// Rows per matrix.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns per matrix.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of matrices in the batch.
    pub fn num_matrices(&self) -> usize {
        self.num_matrices
    }

    /// Storage order shared by all matrices in the batch.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Elements per matrix (`rows * cols`).
    pub fn matrix_len(&self) -> usize {
        self.rows * self.cols
    }

    /// Total elements in the batch buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the batch holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole batch buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the whole batch buffer.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the batch, returning the underlying buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Read-only view of matrix `i`.
    ///
    /// # Panics
    /// Panics if `i >= num_matrices()`.
    pub fn matrix(&self, i: usize) -> &[f32] {
        assert!(
            i < self.num_matrices,
            "matrix index {} out of range for batch of {}",
            i,
            self.num_matrices
        );
        let len = self.matrix_len();
        &self.data[i * len..(i + 1) * len]
    }

    /// Mutable view of matrix `i`.
    ///
    /// # Panics
    /// Panics if `i >= num_matrices()`.
    pub fn matrix_mut(&mut self, i: usize) -> &mut [f32] {
        assert!(
            i < self.num_matrices,
            "matrix index {} out of range for batch of {}",
            i,
            self.num_matrices
        );
        let len = self.matrix_len();
        &mut self.data[i * len..(i + 1) * len]
    }

    /// Logical element `(row, col)` of matrix `m`, resolved through the
    /// batch's storage order.
    ///
    /// # Panics
    /// Panics if any coordinate is out of range.
    pub fn get(&self, m: usize, row: usize, col: usize) -> f32 {
        assert!(row < self.rows && col < self.cols, "element ({}, {}) out of range", row, col);
        let ld = self.layout.leading_dim(self.rows, self.cols);
        self.matrix(m)[self.layout.index(row, col, ld)]
    }

    /// Store `value` at logical element `(row, col)` of matrix `m`.
    ///
    /// # Panics
    /// Panics if any coordinate is out of range.
    pub fn set(&mut self, m: usize, row: usize, col: usize, value: f32) {
        assert!(row < self.rows && col < self.cols, "element ({}, {}) out of range", row, col);
        let ld = self.layout.leading_dim(self.rows, self.cols);
        let off = self.layout.index(row, col, ld);
        self.matrix_mut(m)[off] = value;
    }
}
