use anyhow::{Context, Result};
use std::path::Path;

use mx_matrix::Matrix;

pub fn run(path: &Path) -> Result<()> {
    let matrix =
        Matrix::load(path).with_context(|| format!("failed to read {}", path.display()))?;
    print!("{}", matrix);
    Ok(())
}
