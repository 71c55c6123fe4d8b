//! `collgen` binary.
//!
//! Usage: `collgen [OPTIONS] <DIR> <TYPE>`. Set `RUST_LOG=debug` for
//! per-file and per-field detail.

use anyhow::Result;
use clap::Parser;
use collgen::cli::{Cli, Outcome, run};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli)? {
        Outcome::Written(path) => println!("generated {}", path.display()),
        Outcome::Printed(source) => print!("{source}"),
    }

    Ok(())
}
