use crate::backend::MatmulBackend;
use crate::batch::MatrixBatch;
use crate::dims::MatmulDims;
use crate::error::Result;
use crate::layout::Layout;

/// Plain host-side batched matmul.
///
/// Runs synchronously on host-resident buffers with straightforward loops
/// optimized for correctness rather than peak performance. Serves both as
/// the throughput baseline and as the correctness oracle for the offload
/// engine.
#[derive(Debug, Clone)]
pub struct HostBackend;

impl HostBackend {
    pub fn new() -> Self {
        HostBackend
    }
}

impl Default for HostBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MatmulBackend for HostBackend {
    fn name(&self) -> &str {
        "host"
    }

    fn multiply(
        &self,
        a: &MatrixBatch,
        b_transposed: &MatrixBatch,
        dims: &MatmulDims,
    ) -> Result<MatrixBatch> {
        dims.validate(a, b_transposed)?;

        let a_ld = Layout::ColMajor.leading_dim(dims.rows_a, dims.common);
        let b_ld = Layout::ColMajor.leading_dim(dims.common, dims.cols_b);
        let c_ld = Layout::ColMajor.leading_dim(dims.rows_a, dims.cols_b);

        let mut out = MatrixBatch::zeros(
            dims.rows_a,
            dims.cols_b,
            dims.num_matrices,
            Layout::ColMajor,
        );
        let a_data = a.data();
        let b_data = b_transposed.data();
        let c_data = out.data_mut();

        // Reference sweep: columns outer, rows inner, k innermost, one
        // scalar accumulator per output element.
        for m in 0..dims.num_matrices {
            let a_base = m * dims.a_matrix_len();
            let b_base = m * dims.b_matrix_len();
            let c_base = m * dims.c_matrix_len();
            for col in 0..dims.cols_b {
                for row in 0..dims.rows_a {
                    let mut sum = 0.0f32;
                    for k in 0..dims.common {
                        sum += a_data[a_base + Layout::ColMajor.index(row, k, a_ld)]
                            * b_data[b_base + Layout::ColMajor.index(k, col, b_ld)];
                    }
                    c_data[c_base + Layout::ColMajor.index(row, col, c_ld)] = sum;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatmulError;
    use crate::transpose::transpose_batch;
    use approx::assert_relative_eq;

    fn backend() -> HostBackend {
        HostBackend::new()
    }

    #[test]
    fn test_multiply_2x2() {
        // [[1,2],[3,4]] @ [[5,6],[7,8]] = [[19,22],[43,50]].
        // A column-major, B already in the transposed-operand order.
        let a = MatrixBatch::from_vec(vec![1.0, 3.0, 2.0, 4.0], 2, 2, 1, Layout::ColMajor)
            .unwrap();
        let b = MatrixBatch::from_vec(vec![5.0, 7.0, 6.0, 8.0], 2, 2, 1, Layout::ColMajor)
            .unwrap();
        let dims = MatmulDims::new(2, 2, 2, 1);
        let c = backend().multiply(&a, &b, &dims).unwrap();
        assert_eq!(c.data(), &[19.0, 43.0, 22.0, 50.0]);
        assert_eq!(c.layout(), Layout::ColMajor);
    }

    #[test]
    fn test_multiply_after_transposer() {
        // Same product, but B starts in natural row-major storage and runs
        // through the transposer first.
        let a = MatrixBatch::from_vec(vec![1.0, 3.0, 2.0, 4.0], 2, 2, 1, Layout::ColMajor)
            .unwrap();
        let b_raw = MatrixBatch::from_vec(vec![5.0, 6.0, 7.0, 8.0], 2, 2, 1, Layout::RowMajor)
            .unwrap();
        let b = transpose_batch(&b_raw);
        let dims = MatmulDims::new(2, 2, 2, 1);
        let c = backend().multiply(&a, &b, &dims).unwrap();
        assert_eq!(c.data(), &[19.0, 43.0, 22.0, 50.0]);
    }

    #[test]
    fn test_multiply_identity() {
        // A @ I = A. The identity buffer is the same in either storage
        // order, so it is already a valid transposed operand.
        let a = MatrixBatch::from_vec(
            vec![1.5, -2.0, 0.25, 8.0, 3.0, -0.5],
            2,
            3,
            1,
            Layout::ColMajor,
        )
        .unwrap();
        let mut eye = MatrixBatch::zeros(3, 3, 1, Layout::ColMajor);
        for i in 0..3 {
            eye.set(0, i, i, 1.0);
        }
        let dims = MatmulDims::new(2, 3, 3, 1);
        let c = backend().multiply(&a, &eye, &dims).unwrap();
        assert_eq!(c.data(), a.data());
    }

    #[test]
    fn test_matches_logical_indexing() {
        // The flat-offset arithmetic in multiply must agree with the
        // logical accessors reading the same buffers.
        let dims = MatmulDims::new(3, 5, 4, 2);
        let mut a = MatrixBatch::zeros(3, 5, 2, Layout::ColMajor);
        let mut b = MatrixBatch::zeros(5, 4, 2, Layout::ColMajor);
        for (i, v) in a.data_mut().iter_mut().enumerate() {
            *v = (i as f32 * 0.37).sin();
        }
        for (i, v) in b.data_mut().iter_mut().enumerate() {
            *v = (i as f32 * 0.91).cos();
        }

        let c = backend().multiply(&a, &b, &dims).unwrap();
        for m in 0..dims.num_matrices {
            for col in 0..dims.cols_b {
                for row in 0..dims.rows_a {
                    let mut want = 0.0f32;
                    for k in 0..dims.common {
                        want += a.get(m, row, k) * b.get(m, k, col);
                    }
                    assert_relative_eq!(c.get(m, row, col), want, max_relative = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_shape_invariant() {
        let dims = MatmulDims::new(3, 4, 2, 5);
        let a = MatrixBatch::zeros(3, 4, 5, Layout::ColMajor);
        let b = MatrixBatch::zeros(4, 2, 5, Layout::ColMajor);
        let c = backend().multiply(&a, &b, &dims).unwrap();
        assert_eq!(c.len(), 3 * 2 * 5);
        assert_eq!(c.rows(), 3);
        assert_eq!(c.cols(), 2);
        assert_eq!(c.num_matrices(), 5);
    }

    #[test]
    fn test_zero_common_dimension() {
        // Empty reduction: every output element is 0.0.
        let dims = MatmulDims::new(2, 0, 3, 2);
        let a = MatrixBatch::zeros(2, 0, 2, Layout::ColMajor);
        let b = MatrixBatch::zeros(0, 3, 2, Layout::ColMajor);
        let c = backend().multiply(&a, &b, &dims).unwrap();
        assert_eq!(c.len(), 12);
        assert!(c.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_batch_independence() {
        let m0_a = vec![1.0, 3.0, 2.0, 4.0];
        let m1_a = vec![-2.0, 0.5, 7.0, 1.25];
        let m0_b = vec![5.0, 7.0, 6.0, 8.0];
        let m1_b = vec![0.5, -1.0, 2.0, 3.5];
        let dims = MatmulDims::new(2, 2, 2, 2);

        let a = MatrixBatch::from_vec(
            [m0_a.clone(), m1_a.clone()].concat(),
            2,
            2,
            2,
            Layout::ColMajor,
        )
        .unwrap();
        let b = MatrixBatch::from_vec(
            [m0_b.clone(), m1_b.clone()].concat(),
            2,
            2,
            2,
            Layout::ColMajor,
        )
        .unwrap();
        let c = backend().multiply(&a, &b, &dims).unwrap();

        // Same pairs in the opposite batch order: per-matrix outputs must be
        // bit-identical, just permuted.
        let a_swapped =
            MatrixBatch::from_vec([m1_a, m0_a].concat(), 2, 2, 2, Layout::ColMajor).unwrap();
        let b_swapped =
            MatrixBatch::from_vec([m1_b, m0_b].concat(), 2, 2, 2, Layout::ColMajor).unwrap();
        let c_swapped = backend().multiply(&a_swapped, &b_swapped, &dims).unwrap();

        assert_eq!(c.matrix(0), c_swapped.matrix(1));
        assert_eq!(c.matrix(1), c_swapped.matrix(0));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let dims = MatmulDims::new(2, 2, 2, 1);
        let a = MatrixBatch::zeros(2, 3, 1, Layout::ColMajor);
        let b = MatrixBatch::zeros(2, 2, 1, Layout::ColMajor);
        assert!(matches!(
            backend().multiply(&a, &b, &dims),
            Err(MatmulError::ShapeMismatch { .. })
        ));
    }
}
