use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("index ({row}, {col}) out of range for {dimension}x{dimension} matrix")]
    OutOfRange {
        row: usize,
        col: usize,
        dimension: usize,
    },
    #[error("dimension mismatch: {left}x{left} @ {right}x{right}")]
    DimensionMismatch { left: usize, right: usize },
    /// `len` is a byte count for files and an element count for flat sequences.
    #[error("length {len} does not describe a square matrix")]
    Format { len: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, MatrixError>;
