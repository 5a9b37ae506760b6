pub mod matmul;
pub mod partition;

pub use partition::partition_rows;

use crate::backend::MultiplyBackend;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// Worker count used when the caller does not choose one.
pub const DEFAULT_WORKERS: usize = 4;

fn check_dimensions(a: &Matrix, b: &Matrix) -> Result<usize> {
    if a.dimension() != b.dimension() {
        return Err(MatrixError::DimensionMismatch {
            left: a.dimension(),
            right: b.dimension(),
        });
    }
    Ok(a.dimension())
}

/// Single-threaded reference backend.
///
/// Uses the canonical i-j-k loop order. Intended as the correctness and
/// throughput baseline for [`ParallelBackend`].
#[derive(Debug, Clone)]
pub struct SequentialBackend;

impl SequentialBackend {
    pub fn new() -> Self {
        SequentialBackend
    }
}

impl Default for SequentialBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiplyBackend for SequentialBackend {
    fn name(&self) -> &str {
        "sequential"
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let n = check_dimensions(a, b)?;
        let mut c = Matrix::zeros(n)?;
        matmul::matmul_ijk(a.as_slice(), b.as_slice(), c.as_mut_slice(), n);
        Ok(c)
    }
}

/// Multi-threaded backend that splits output rows across short-lived workers.
///
/// Each call spawns at most `workers` scoped threads (never more than there
/// are rows), each owning one contiguous block of result rows, and joins all
/// of them before returning. No threads outlive the call.
#[derive(Debug, Clone)]
pub struct ParallelBackend {
    workers: usize,
}

impl ParallelBackend {
    /// # Errors
    /// Returns `InvalidArgument` if `workers == 0`.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(MatrixError::InvalidArgument(
                "worker count must be positive".to_string(),
            ));
        }
        Ok(ParallelBackend { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ParallelBackend {
    fn default() -> Self {
        ParallelBackend {
            workers: DEFAULT_WORKERS,
        }
    }
}

impl MultiplyBackend for ParallelBackend {
    fn name(&self) -> &str {
        "parallel"
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let n = check_dimensions(a, b)?;
        let mut c = Matrix::zeros(n)?;
        if n == 0 {
            return Ok(c);
        }

        let ranges = partition_rows(n, self.workers)?;
        tracing::debug!(
            dimension = n,
            requested = self.workers,
            workers = ranges.len(),
            "parallel multiply"
        );

        let (a, b) = (a.as_slice(), b.as_slice());
        partition::parallel_for_rows(c.as_mut_slice(), n, &ranges, |rows, block| {
            matmul::matmul_rows_ikj(a, b, block, n, rows)
        })?;
        Ok(c)
    }
}
