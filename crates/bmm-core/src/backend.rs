use std::fmt::Debug;

use crate::batch::MatrixBatch;
use crate::dims::MatmulDims;
use crate::error::Result;

/// Trait for pluggable batched-matmul backends (host reference, offload
/// engine, etc.).
///
/// A single call multiplies every matrix pair in the operand batches.
/// Implementations must produce, for every matrix `m`, row `r` and column
/// `c`, the value `C[m][r,c] = sum_k A[m][r,k] * B[m][k,c]` accumulated in a
/// single f32 scalar per output element. Iteration order within a matrix is
/// an implementation freedom; reduction-order float discrepancies between
/// backends are expected and bounded.
pub trait MatmulBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "host", "offload").
    fn name(&self) -> &str;

    /// Batched multiply: `C[m] = A[m] @ B[m]` for every matrix in the batch.
    ///
    /// - `a`: column-major batch, `rows_a x common` per matrix
    /// - `b_transposed`: the transposed operand, logical `common x cols_b`
    ///   stored column-major
    /// - Returns: column-major batch, `rows_a x cols_b` per matrix
    ///
    /// Fails only on an operand contract violation or a device resource
    /// failure, both before any result is produced; the caller never sees a
    /// partially-written output.
    fn multiply(
        &self,
        a: &MatrixBatch,
        b_transposed: &MatrixBatch,
        dims: &MatmulDims,
    ) -> Result<MatrixBatch>;
}
