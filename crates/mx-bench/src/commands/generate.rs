use anyhow::{Context, Result};
use std::path::Path;

use mx_matrix::Matrix;

pub fn run(dimension: usize, min: f64, max: f64, output: &Path) -> Result<()> {
    let matrix = Matrix::random(dimension, min, max)
        .with_context(|| format!("failed to generate {0}x{0} matrix", dimension))?;
    matrix
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(dimension, path = %output.display(), "matrix written");
    Ok(())
}
