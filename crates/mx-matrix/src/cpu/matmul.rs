// Loop kernels over flat row-major buffers.
//
// Both kernels take `n` as the shared side length; callers validate that
// every slice has the length implied by `n`.

use std::ops::Range;

/// Canonical i-j-k product: each output element is a complete dot product.
pub(crate) fn matmul_ijk(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0f64;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}

/// i-k-j product for the output rows in `rows`.
///
/// `out` holds exactly those rows (`rows.len() * n` elements, zero-filled),
/// so row `i` of the product lands at `out[(i - rows.start) * n..]`. The
/// inner loop walks a row of `b` and a row of `out` contiguously.
pub(crate) fn matmul_rows_ikj(a: &[f64], b: &[f64], out: &mut [f64], n: usize, rows: Range<usize>) {
    for (local, i) in rows.enumerate() {
        let out_row = &mut out[local * n..(local + 1) * n];
        let a_row = &a[i * n..(i + 1) * n];
        for (k, &a_ik) in a_row.iter().enumerate() {
            let b_row = &b[k * n..(k + 1) * n];
            for (dst, &b_kj) in out_row.iter_mut().zip(b_row) {
                *dst += a_ik * b_kj;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f64; 4] = [1.0, 2.0, 3.0, 4.0];
    const B: [f64; 4] = [5.0, 6.0, 7.0, 8.0];

    #[test]
    fn test_ijk_basic() {
        let mut c = [0.0; 4];
        matmul_ijk(&A, &B, &mut c, 2);
        assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_ikj_full_range() {
        let mut c = [0.0; 4];
        matmul_rows_ikj(&A, &B, &mut c, 2, 0..2);
        assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_ikj_single_row_block() {
        // Only row 1 of the product.
        let mut row = [0.0; 2];
        matmul_rows_ikj(&A, &B, &mut row, 2, 1..2);
        assert_eq!(row, [43.0, 50.0]);
    }

    #[test]
    fn test_ikj_identity() {
        let identity = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let x: Vec<f64> = (1..=9).map(f64::from).collect();
        let mut c = vec![0.0; 9];
        matmul_rows_ikj(&identity, &x, &mut c, 3, 0..3);
        assert_eq!(c, x);
    }
}
