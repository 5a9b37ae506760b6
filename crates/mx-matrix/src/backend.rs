use std::fmt::Debug;

use crate::error::Result;
use crate::matrix::Matrix;

/// Trait for pluggable multiplication strategies.
///
/// A backend reads both operands without mutating them and returns a newly
/// allocated product of the same dimension.
pub trait MultiplyBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "sequential", "parallel").
    fn name(&self) -> &str;

    /// Matrix multiplication: C = A @ B.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `a` and `b` differ in dimension.
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix>;
}
