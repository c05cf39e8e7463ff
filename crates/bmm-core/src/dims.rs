use crate::batch::MatrixBatch;
use crate::error::{MatmulError, Result};
use crate::layout::Layout;

/// Dimensions of one batched multiply: each of `num_matrices` independent
/// products is `[rows_a x common] @ [common x cols_b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatmulDims {
    /// Rows of each A matrix and of each output matrix.
    pub rows_a: usize,
    /// Shared inner dimension (columns of A, rows of B).
    pub common: usize,
    /// Columns of each B matrix and of each output matrix.
    pub cols_b: usize,
    /// Number of independent matrix pairs in the batch.
    pub num_matrices: usize,
}

impl MatmulDims {
    pub fn new(rows_a: usize, common: usize, cols_b: usize, num_matrices: usize) -> Self {
        MatmulDims {
            rows_a,
            common,
            cols_b,
            num_matrices,
        }
    }

    /// Elements per A matrix.
    pub fn a_matrix_len(&self) -> usize {
        self.rows_a * self.common
    }

    /// Elements per B matrix.
    pub fn b_matrix_len(&self) -> usize {
        self.common * self.cols_b
    }

    /// Elements per output matrix.
    pub fn c_matrix_len(&self) -> usize {
        self.rows_a * self.cols_b
    }

    /// Total A elements across the batch.
    pub fn a_len(&self) -> usize {
        self.a_matrix_len() * self.num_matrices
    }

    /// Total B elements across the batch.
    pub fn b_len(&self) -> usize {
        self.b_matrix_len() * self.num_matrices
    }

    /// Total output elements across the batch.
    pub fn c_len(&self) -> usize {
        self.c_matrix_len() * self.num_matrices
    }

    /// Check the operand batches against these dimensions and the operand
    /// convention: A column-major `rows_a x common`, B the transposed
    /// operand (logical `common x cols_b` stored column-major). Runs before
    /// any compute; a failure here is a contract violation, not a state to
    /// recover from.
    pub fn validate(&self, a: &MatrixBatch, b: &MatrixBatch) -> Result<()> {
        let a_shape = [a.rows(), a.cols(), a.num_matrices()];
        if a_shape != [self.rows_a, self.common, self.num_matrices] {
            return Err(MatmulError::ShapeMismatch {
                operand: "a",
                expected: vec![self.rows_a, self.common, self.num_matrices],
                got: a_shape.to_vec(),
            });
        }
        let b_shape = [b.rows(), b.cols(), b.num_matrices()];
        if b_shape != [self.common, self.cols_b, self.num_matrices] {
            return Err(MatmulError::ShapeMismatch {
                operand: "b",
                expected: vec![self.common, self.cols_b, self.num_matrices],
                got: b_shape.to_vec(),
            });
        }
        if a.layout() != Layout::ColMajor {
            return Err(MatmulError::LayoutMismatch {
                operand: "a",
                expected: Layout::ColMajor,
                got: a.layout(),
            });
        }
        if b.layout() != Layout::ColMajor {
            return Err(MatmulError::LayoutMismatch {
                operand: "b",
                expected: Layout::ColMajor,
                got: b.layout(),
            });
        }
        Ok(())
    }
}
