//! Command-line interface.
//!
//! The binary is a thin wrapper: it parses arguments, runs the
//! [`Generator`], and writes or prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use collgen_codegen::{DEFAULT_FILE_SUFFIX, Generator, GeneratorOptions};
use collgen_source::DuplicatePolicy;
use std::path::PathBuf;
use tracing::debug;

/// Generate a typed collection for a Rust struct.
#[derive(Debug, Clone, Parser)]
#[command(name = "collgen", version)]
pub struct Cli {
    /// Directory containing the package's Cargo.toml
    pub dir: PathBuf,

    /// Name of the struct to generate a collection for
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Suffix appended to the lower-cased type name to form the file name
    #[arg(long, default_value = DEFAULT_FILE_SUFFIX)]
    pub suffix: String,

    /// Directory to write the file to (defaults to the package's src/)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Print the generated source instead of writing a file
    #[arg(long, conflicts_with = "out_dir")]
    pub stdout: bool,

    /// Fail if the struct is declared more than once
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    /// Generator options selected by the flags.
    #[must_use]
    pub fn options(&self) -> GeneratorOptions {
        let duplicates = if self.strict {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::FirstMatch
        };
        GeneratorOptions::default()
            .with_duplicates(duplicates)
            .with_file_suffix(self.suffix.clone())
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file was written to this path.
    Written(PathBuf),
    /// The source, for printing.
    Printed(String),
}

/// Runs one invocation.
///
/// # Errors
/// Returns the pipeline error, with the directory and type name as context.
pub fn run(cli: &Cli) -> Result<Outcome> {
    debug!("{:?}", cli);

    let context = || {
        format!(
            "failed to generate collection for '{}' in {}",
            cli.type_name,
            cli.dir.display()
        )
    };

    let generator = Generator::new(&cli.dir, &cli.type_name, cli.options()).with_context(context)?;
    let file = generator.run().with_context(context)?;

    if cli.stdout {
        return Ok(Outcome::Printed(file.contents));
    }

    let out_dir = cli
        .out_dir
        .clone()
        .unwrap_or_else(|| generator.source_root().to_path_buf());
    let path = file
        .write_to(&out_dir)
        .with_context(|| format!("failed to write {} to {}", file.file_name, out_dir.display()))?;

    Ok(Outcome::Written(path))
}
