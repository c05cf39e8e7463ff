use bmm_core::{Layout, MatmulDims};

/// Device-side batched matmul kernel.
///
/// Addressing follows the engine convention: A column-major
/// `rows_a x common`, B the transposed operand (logical `common x cols_b`
/// stored column-major), C column-major `rows_a x cols_b`, with matrix `m`
/// of each batch at offset `m * rows * cols`. The sweep runs rows outer,
/// columns inner, `k` innermost, one scalar f32 accumulator per output
/// element.
///
/// Buffer lengths are validated at enqueue; here they are a debug contract.
pub(crate) fn matmul_batch(a: &[f32], b: &[f32], c: &mut [f32], dims: &MatmulDims) {
    debug_assert_eq!(a.len(), dims.a_len());
    debug_assert_eq!(b.len(), dims.b_len());
    debug_assert_eq!(c.len(), dims.c_len());

    let a_ld = Layout::ColMajor.leading_dim(dims.rows_a, dims.common);
    let b_ld = Layout::ColMajor.leading_dim(dims.common, dims.cols_b);
    let c_ld = Layout::ColMajor.leading_dim(dims.rows_a, dims.cols_b);

    for m in 0..dims.num_matrices {
        let a_base = m * dims.a_matrix_len();
        let b_base = m * dims.b_matrix_len();
        let c_base = m * dims.c_matrix_len();
        for row in 0..dims.rows_a {
            for col in 0..dims.cols_b {
                let mut acc = 0.0f32;
                for k in 0..dims.common {
                    acc += a[a_base + Layout::ColMajor.index(row, k, a_ld)]
                        * b[b_base + Layout::ColMajor.index(k, col, b_ld)];
                }
                c[c_base + Layout::ColMajor.index(row, col, c_ld)] = acc;
            }
        }
    }
}
