use crate::batch::MatrixBatch;
use crate::layout::Layout;

/// Convert a batch to the opposite storage order, preserving every logical
/// matrix.
///
/// The multiply engine expects its second operand pre-transposed relative to
/// natural row-major storage, so a conventionally generated row-major B runs
/// through this once before use. Each matrix is re-linearized independently;
/// the output is fully overwritten and sized `rows * cols * num_matrices`.
/// Pure element movement with no arithmetic: applying the conversion twice
/// reproduces the input bit-for-bit.
pub fn transpose_batch(input: &MatrixBatch) -> MatrixBatch {
    let rows = input.rows();
    let cols = input.cols();
    let src_layout = input.layout();
    let dst_layout = src_layout.flipped();
    let src_ld = src_layout.leading_dim(rows, cols);
    let dst_ld = dst_layout.leading_dim(rows, cols);
    let matrix_len = input.matrix_len();

    let mut out = MatrixBatch::zeros(rows, cols, input.num_matrices(), dst_layout);
    let src = input.data();
    let dst = out.data_mut();
    for m in 0..input.num_matrices() {
        let base = m * matrix_len;
        for r in 0..rows {
            for c in 0..cols {
                dst[base + dst_layout.index(r, c, dst_ld)] =
                    src[base + src_layout.index(r, c, src_ld)];
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn test_row_to_col_2x2() -> Result<()> {
        // Row-major [[5,6],[7,8]] re-linearized column-major.
        let input = MatrixBatch::from_vec(vec![5.0, 6.0, 7.0, 8.0], 2, 2, 1, Layout::RowMajor)?;
        let out = transpose_batch(&input);
        assert_eq!(out.layout(), Layout::ColMajor);
        assert_eq!(out.data(), &[5.0, 7.0, 6.0, 8.0]);
        Ok(())
    }

    #[test]
    fn test_non_square() -> Result<()> {
        // Row-major 2x3 [[1,2,3],[4,5,6]] -> column-major [1,4,2,5,3,6].
        let input =
            MatrixBatch::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3, 1, Layout::RowMajor)?;
        let out = transpose_batch(&input);
        assert_eq!(out.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        Ok(())
    }

    #[test]
    fn test_preserves_logical_elements() -> Result<()> {
        let input = MatrixBatch::from_vec(
            (1..=12).map(|v| v as f32).collect(),
            3,
            2,
            2,
            Layout::RowMajor,
        )?;
        let out = transpose_batch(&input);
        for m in 0..2 {
            for r in 0..3 {
                for c in 0..2 {
                    assert_eq!(out.get(m, r, c), input.get(m, r, c));
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_round_trip_exact() -> Result<()> {
        let data = vec![0.125, -3.5, 9.75, 2.0, 1e-7, -0.0, 6.5, 4.25];
        let input = MatrixBatch::from_vec(data.clone(), 2, 2, 2, Layout::RowMajor)?;
        let back = transpose_batch(&transpose_batch(&input));
        assert_eq!(back.layout(), Layout::RowMajor);
        assert_eq!(back.data(), data.as_slice());
        Ok(())
    }

    #[test]
    fn test_matrices_do_not_interact() -> Result<()> {
        let first = vec![1.0, 2.0, 3.0, 4.0];
        let second = vec![50.0, 60.0, 70.0, 80.0];
        let batch = MatrixBatch::from_vec(
            [first.clone(), second.clone()].concat(),
            2,
            2,
            2,
            Layout::RowMajor,
        )?;
        let out = transpose_batch(&batch);

        let single_first = transpose_batch(&MatrixBatch::from_vec(
            first,
            2,
            2,
            1,
            Layout::RowMajor,
        )?);
        let single_second = transpose_batch(&MatrixBatch::from_vec(
            second,
            2,
            2,
            1,
            Layout::RowMajor,
        )?);
        assert_eq!(out.matrix(0), single_first.matrix(0));
        assert_eq!(out.matrix(1), single_second.matrix(0));
        Ok(())
    }
}
