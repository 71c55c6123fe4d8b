//! # collgen codegen
//!
//! Collection code generation for Rust structs.
//!
//! This crate provides:
//! - An explicitly constructed, immutable template registry
//! - Rendering of a located record into the collection templates
//! - Canonical formatting of the rendered source with `prettyplease`
//! - The end-to-end [`Generator`] pipeline

pub mod canonical;
pub mod error;
pub mod generator;
pub mod render;
pub mod template;

pub use canonical::canonicalize;
pub use error::{CodegenError, TemplateError};
pub use generator::{
    DEFAULT_FILE_SUFFIX, GeneratedFile, Generator, GeneratorOptions, output_file_name,
};
pub use render::{RenderTarget, Renderer};
pub use template::{TEMPLATE_SET_VERSION, Template, TemplateRegistry, Value};

/// Generates the collection source for `type_name` declared in the package
/// at `dir`, with default options.
///
/// # Arguments
/// * `dir` - Directory containing the package's `Cargo.toml`
/// * `type_name` - Name of the struct
///
/// # Returns
/// The generated file name and canonically formatted contents.
///
/// # Errors
/// Returns `CodegenError` if any pipeline stage fails.
pub fn generate(
    dir: impl AsRef<std::path::Path>,
    type_name: &str,
) -> Result<GeneratedFile, CodegenError> {
    Generator::new(dir, type_name, GeneratorOptions::default())?.run()
}
