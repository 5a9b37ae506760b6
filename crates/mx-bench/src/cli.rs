use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mx-bench")]
#[command(author, version, about = "Compare sequential and parallel square-matrix multiplication")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a uniformly random matrix to a file
    Generate {
        /// Side length of the matrix
        #[arg(short, long)]
        dimension: usize,

        /// Lower bound of the uniform range
        #[arg(long, default_value = "0.0")]
        min: f64,

        /// Upper bound of the uniform range
        #[arg(long, default_value = "1.0")]
        max: f64,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Time both strategies on two matrix files
    Bench {
        /// Left operand
        #[arg(long)]
        left: PathBuf,

        /// Right operand
        #[arg(long)]
        right: PathBuf,

        /// Worker threads for the parallel strategy
        #[arg(short, long, env = "MX_WORKERS", default_value_t = mx_matrix::DEFAULT_WORKERS)]
        workers: usize,

        /// Where to save the parallel product
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a matrix file
    Show {
        /// Matrix file to print
        path: PathBuf,
    },
}
