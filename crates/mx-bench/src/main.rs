use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;

use cli::{Cli, Commands};

const DEFAULT_LOG_LEVEL: &str = "info";

/// Filter from `RUST_LOG`-style directives, falling back to `info` only when
/// none are given or they fail to parse.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            dimension,
            min,
            max,
            output,
        } => commands::generate::run(dimension, min, max, &output),
        Commands::Bench {
            left,
            right,
            workers,
            output,
        } => commands::bench::run(&left, &right, workers, output.as_deref()),
        Commands::Show { path } => commands::show::run(&path),
    }
}
