//! Raw binary persistence.
//!
//! A matrix file is `dimension * dimension` consecutive native-endian `f64`
//! values in row-major order. There is no header: the dimension is recovered
//! from the file size on load, and any size that is not `8 * n * n` bytes for
//! some `n` is rejected.

mod provider;

pub use provider::{FileProvider, LocalFs, SizedRead};

use std::io::{Read, Write};
use std::path::Path;

use crate::error::{MatrixError, Result};
use crate::matrix::{integer_sqrt, Matrix};

/// Bytes per stored element.
pub const ELEMENT_SIZE: usize = std::mem::size_of::<f64>();

impl Matrix {
    /// Write the matrix to `path` on the local filesystem.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with(&LocalFs, path.as_ref())
    }

    /// Read a matrix from `path` on the local filesystem.
    pub fn load(path: impl AsRef<Path>) -> Result<Matrix> {
        Matrix::load_with(&LocalFs, path.as_ref())
    }

    /// Write the matrix through `provider`, replacing any existing file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be opened or fewer than
    /// `dimension² × 8` bytes are written. Partial writes are not retried.
    pub fn save_with<P: FileProvider>(&self, provider: &P, path: &Path) -> Result<()> {
        let bytes = encode(self.as_slice());
        let mut writer = provider.open_write(path)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        tracing::debug!(
            path = %path.display(),
            dimension = self.dimension(),
            bytes = bytes.len(),
            "saved matrix"
        );
        Ok(())
    }

    /// Read a matrix through `provider`.
    ///
    /// # Errors
    /// - `Io` if the file cannot be opened, sized, or fully read.
    /// - `Format` if its size is not `8 * n * n` bytes for any `n`.
    pub fn load_with<P: FileProvider>(provider: &P, path: &Path) -> Result<Matrix> {
        let mut reader = provider.open_read(path)?;
        let len = reader.byte_len()?;
        let dimension = dimension_for_len(len)?;

        let mut bytes = vec![0u8; dimension * dimension * ELEMENT_SIZE];
        reader.read_exact(&mut bytes)?;

        let mut matrix = Matrix::zeros(dimension)?;
        decode(&bytes, matrix.as_mut_slice());
        tracing::debug!(path = %path.display(), dimension, bytes = len, "loaded matrix");
        Ok(matrix)
    }
}

/// Dimension of the square matrix stored in `len` bytes.
fn dimension_for_len(len: u64) -> Result<usize> {
    let elements =
        usize::try_from(len / ELEMENT_SIZE as u64).map_err(|_| MatrixError::Format { len })?;
    let dimension = integer_sqrt(elements);
    match dimension
        .checked_mul(dimension)
        .and_then(|sq| sq.checked_mul(ELEMENT_SIZE))
    {
        Some(expected) if expected as u64 == len => Ok(dimension),
        _ => Err(MatrixError::Format { len }),
    }
}

fn encode(values: &[f64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * ELEMENT_SIZE);
    for value in values {
        out.extend_from_slice(&value.to_ne_bytes());
    }
    out
}

fn decode(bytes: &[u8], out: &mut [f64]) {
    for (dst, chunk) in out.iter_mut().zip(bytes.chunks_exact(ELEMENT_SIZE)) {
        let mut raw = [0u8; ELEMENT_SIZE];
        raw.copy_from_slice(chunk);
        *dst = f64::from_ne_bytes(raw);
    }
}
