//! `mx-matrix` - Dense square matrices for multiplication throughput experiments.
//!
//! This crate provides:
//! - A `Matrix` type owning a flat, row-major `f64` buffer
//! - Raw binary persistence behind a pluggable `FileProvider`
//! - A `MultiplyBackend` trait with sequential and row-partitioned
//!   multi-threaded implementations

pub mod backend;
pub mod cpu;
pub mod error;
pub mod matrix;
pub mod persist;

// Re-export primary types at the crate root for convenience.
pub use backend::MultiplyBackend;
pub use cpu::{partition_rows, ParallelBackend, SequentialBackend, DEFAULT_WORKERS};
pub use error::{MatrixError, Result};
pub use matrix::Matrix;
pub use persist::{FileProvider, LocalFs, SizedRead, ELEMENT_SIZE};
