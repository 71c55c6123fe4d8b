//! # collgen
//!
//! Generates a typed collection for a Rust struct.
//!
//! Given a directory holding one Cargo package and the name of a struct
//! declared in it, collgen emits `<Type>s`, a newtype over `Vec<Type>` with
//! per-field accessor and filter helpers, formatted with `prettyplease`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use collgen::prelude::*;
//!
//! let file = generate("path/to/package", "User")?;
//! std::fs::write(file.file_name, file.contents)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`source`] - Package resolution and struct introspection
//! - [`codegen`] - Templates, rendering, formatting, and the pipeline
//! - [`cli`] - The `collgen` command line

pub mod cli;
pub mod prelude;

/// Package resolution and struct introspection.
pub mod source {
    pub use collgen_source::*;
}

/// Templates, rendering, formatting, and the generation pipeline.
pub mod codegen {
    pub use collgen_codegen::*;
}

pub use collgen_codegen::{GeneratedFile, Generator, GeneratorOptions, generate};
