use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};

use mx_matrix::{Matrix, MultiplyBackend, ParallelBackend, SequentialBackend};

pub fn run(left: &Path, right: &Path, workers: usize, output: Option<&Path>) -> Result<()> {
    let a = Matrix::load(left).with_context(|| format!("failed to read {}", left.display()))?;
    let b = Matrix::load(right).with_context(|| format!("failed to read {}", right.display()))?;
    tracing::info!(dimension = a.dimension(), workers, "operands loaded");

    let sequential = SequentialBackend::new();
    let parallel = ParallelBackend::new(workers)?;

    let (expected, seq_time) = timed(&sequential, &a, &b)?;
    let (product, par_time) = timed(&parallel, &a, &b)?;

    println!("{:<12}{:>10} ms", sequential.name(), seq_time.as_millis());
    println!(
        "{:<12}{:>10} ms  ({} workers)",
        parallel.name(),
        par_time.as_millis(),
        parallel.workers()
    );
    if !par_time.is_zero() {
        println!("speedup     {:>10.2}x", seq_time.as_secs_f64() / par_time.as_secs_f64());
    }
    println!("max |diff|  {:>10.3e}", max_abs_diff(&expected, &product));

    if let Some(path) = output {
        product
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "parallel product written");
    }
    Ok(())
}

fn timed(backend: &dyn MultiplyBackend, a: &Matrix, b: &Matrix) -> Result<(Matrix, Duration)> {
    let start = Instant::now();
    let product = backend
        .multiply(a, b)
        .with_context(|| format!("{} multiply failed", backend.name()))?;
    Ok((product, start.elapsed()))
}

fn max_abs_diff(x: &Matrix, y: &Matrix) -> f64 {
    x.as_slice()
        .iter()
        .zip(y.as_slice())
        .map(|(p, q)| (p - q).abs())
        .fold(0.0, f64::max)
}
