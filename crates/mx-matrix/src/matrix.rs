use std::fmt;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::backend::MultiplyBackend;
use crate::cpu::{ParallelBackend, SequentialBackend};
use crate::error::{MatrixError, Result};

/// A dense `dimension x dimension` matrix of `f64` values.
///
/// Elements live in one contiguous, row-major buffer owned by the matrix:
/// element `(i, j)` sits at linear index `i * dimension + j`. The buffer
/// length is always `dimension * dimension` and the dimension never changes
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    dimension: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a zero-filled matrix. A dimension of zero gives an empty matrix.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `dimension * dimension` overflows `usize`.
    pub fn zeros(dimension: usize) -> Result<Self> {
        let len = dimension.checked_mul(dimension).ok_or_else(|| {
            MatrixError::InvalidArgument(format!(
                "dimension {} is too large for a square matrix",
                dimension
            ))
        })?;
        Ok(Matrix {
            dimension,
            data: vec![0.0; len],
        })
    }

    /// Create a matrix whose elements are drawn independently and uniformly
    /// from `[min, max]`, seeded from the thread-local generator.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `min > max` or the range is not finite.
    pub fn random(dimension: usize, min: f64, max: f64) -> Result<Self> {
        Self::random_with_rng(dimension, min, max, &mut rand::thread_rng())
    }

    /// Like [`Matrix::random`], drawing from the given generator.
    pub fn random_with_rng<R: Rng + ?Sized>(
        dimension: usize,
        min: f64,
        max: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut matrix = Matrix::zeros(dimension)?;
        matrix.fill_random_with_rng(min, max, rng)?;
        Ok(matrix)
    }

    /// Build a matrix from a row-major sequence whose length is a perfect square.
    ///
    /// # Errors
    /// Returns `Format` if `values.len()` is not a perfect square.
    pub fn from_flat(values: Vec<f64>) -> Result<Self> {
        let dimension = integer_sqrt(values.len());
        if dimension * dimension != values.len() {
            return Err(MatrixError::Format {
                len: values.len() as u64,
            });
        }
        Ok(Matrix {
            dimension,
            data: values,
        })
    }

    /// Side length of the matrix.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let idx = self.offset(row, col)?;
        Ok(self.data[idx])
    }

    /// Overwrites the element at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let idx = self.offset(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Rewrites every element with a fresh uniform sample from `[min, max]`.
    pub fn fill_random(&mut self, min: f64, max: f64) -> Result<()> {
        self.fill_random_with_rng(min, max, &mut rand::thread_rng())
    }

    /// Like [`Matrix::fill_random`], drawing from the given generator.
    pub fn fill_random_with_rng<R: Rng + ?Sized>(
        &mut self,
        min: f64,
        max: f64,
        rng: &mut R,
    ) -> Result<()> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(MatrixError::InvalidArgument(format!(
                "random range min {} exceeds max {}",
                min, max
            )));
        }
        if !(max - min).is_finite() {
            return Err(MatrixError::InvalidArgument(format!(
                "random range [{}, {}] is not finite",
                min, max
            )));
        }

        let dist = Uniform::new_inclusive(min, max);
        for value in self.data.iter_mut() {
            *value = dist.sample(rng);
        }
        Ok(())
    }

    /// Row-major view of the elements.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the matrix, returning its row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Reference product `self @ other` on the calling thread.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        SequentialBackend::new().multiply(self, other)
    }

    /// Product `self @ other` with output rows split across `workers` threads.
    pub fn parallel_multiply(&self, other: &Matrix, workers: usize) -> Result<Matrix> {
        ParallelBackend::new(workers)?.multiply(self, other)
    }

    /// The single place where `(row, col)` becomes a linear index.
    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.dimension || col >= self.dimension {
            return Err(MatrixError::OutOfRange {
                row,
                col,
                dimension: self.dimension,
            });
        }
        Ok(row * self.dimension + col)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}x{}:", self.dimension, self.dimension)?;
        if self.dimension == 0 {
            return Ok(());
        }
        for row in self.data.chunks(self.dimension) {
            for value in row {
                write!(f, "{}\t", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Largest `r` with `r * r <= n`.
pub(crate) fn integer_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    // The float estimate can be off by one for large `n`.
    while r > 0 && r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).map_or(false, |sq| sq <= n) {
        r += 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zeros() {
        let m = Matrix::zeros(3).unwrap();
        assert_eq!(m.dimension(), 3);
        assert_eq!(m.as_slice(), &[0.0; 9]);
    }

    #[test]
    fn test_zeros_rejects_overflowing_dimension() {
        let huge = 1usize << (usize::BITS / 2);
        assert!(matches!(
            Matrix::zeros(huge),
            Err(MatrixError::InvalidArgument(_))
        ));
        assert!(matches!(
            Matrix::random(huge, 0.0, 1.0),
            Err(MatrixError::InvalidArgument(_))
        ));
        assert!(matches!(
            Matrix::zeros(usize::MAX),
            Err(MatrixError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_dimension_is_empty() {
        let m = Matrix::zeros(0).unwrap();
        assert_eq!(m.dimension(), 0);
        assert!(m.as_slice().is_empty());
        assert!(matches!(m.get(0, 0), Err(MatrixError::OutOfRange { .. })));
    }

    #[test]
    fn test_from_flat_infers_dimension() {
        let m = Matrix::from_flat((0..16).map(|v| v as f64).collect()).unwrap();
        assert_eq!(m.dimension(), 4);
        assert_eq!(m.get(2, 3).unwrap(), 11.0);
    }

    #[test]
    fn test_from_flat_rejects_non_square_length() {
        let err = Matrix::from_flat(vec![1.0; 5]).unwrap_err();
        assert!(matches!(err, MatrixError::Format { len: 5 }));
    }

    #[test]
    fn test_get_set_row_major() {
        let mut m = Matrix::zeros(3).unwrap();
        m.set(1, 2, 7.5).unwrap();
        assert_eq!(m.get(1, 2).unwrap(), 7.5);
        assert_eq!(m.as_slice()[5], 7.5);
    }

    #[test]
    fn test_out_of_range() {
        let mut m = Matrix::zeros(3).unwrap();
        assert!(matches!(
            m.get(3, 0),
            Err(MatrixError::OutOfRange {
                row: 3,
                col: 0,
                dimension: 3
            })
        ));
        assert!(matches!(m.get(0, 3), Err(MatrixError::OutOfRange { .. })));
        assert!(matches!(m.set(5, 1, 1.0), Err(MatrixError::OutOfRange { .. })));
    }

    #[test]
    fn test_random_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random_with_rng(8, -2.0, 3.0, &mut rng).unwrap();
        assert_eq!(m.as_slice().len(), 64);
        assert!(m.as_slice().iter().all(|&v| (-2.0..=3.0).contains(&v)));
    }

    #[test]
    fn test_random_degenerate_range() {
        let m = Matrix::random(2, 1.5, 1.5).unwrap();
        assert_eq!(m.as_slice(), &[1.5; 4]);
    }

    #[test]
    fn test_random_min_greater_than_max() {
        assert!(matches!(
            Matrix::random(2, 5.0, 1.0),
            Err(MatrixError::InvalidArgument(_))
        ));
        assert!(matches!(
            Matrix::random(2, f64::NAN, 1.0),
            Err(MatrixError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_fill_random_rewrites_all() {
        let mut m = Matrix::zeros(4).unwrap();
        m.fill_random(10.0, 20.0).unwrap();
        assert_eq!(m.as_slice().len(), 16);
        assert!(m.as_slice().iter().all(|&v| (10.0..=20.0).contains(&v)));
        assert!(m.as_slice().iter().all(|&v| v != 0.0));
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_flat(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.to_string(), "Matrix 2x2:\n1\t2\t\n3\t4\t\n");
    }

    #[test]
    fn test_integer_sqrt() {
        assert_eq!(integer_sqrt(0), 0);
        assert_eq!(integer_sqrt(1), 1);
        assert_eq!(integer_sqrt(15), 3);
        assert_eq!(integer_sqrt(16), 4);
        assert_eq!(integer_sqrt(17), 4);
        assert_eq!(integer_sqrt(usize::MAX), (1usize << (usize::BITS / 2)) - 1);
    }
}
