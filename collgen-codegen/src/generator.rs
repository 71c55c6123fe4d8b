//! The generation pipeline.
//!
//! [`Generator::new`] resolves the package and locates the record;
//! [`Generator::run`] renders the template set and canonicalizes the result.
//! Any stage failure ends the run with that stage's error.

use crate::canonical::canonicalize;
use crate::error::CodegenError;
use crate::render::{RenderTarget, Renderer};
use crate::template::TemplateRegistry;
use collgen_source::{
    CompilationUnit, DuplicatePolicy, LoadMode, RecordDecl, find_record, resolve,
    validate_type_name,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default suffix of generated file names.
pub const DEFAULT_FILE_SUFFIX: &str = "_gen.rs";

/// Options controlling a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Handling of duplicate declarations of the target type.
    pub duplicates: DuplicatePolicy,
    /// Suffix appended to the lower-cased type name to form the file name.
    pub file_suffix: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
        }
    }
}

impl GeneratorOptions {
    /// Sets the duplicate declaration policy.
    #[must_use]
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Sets the file name suffix.
    #[must_use]
    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }
}

/// Output of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name, e.g. `user_gen.rs`.
    pub file_name: String,
    /// Canonically formatted source.
    pub contents: String,
}

impl GeneratedFile {
    /// Writes the file into `dir`, returning its path.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the file cannot be written.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, CodegenError> {
        let path = dir.as_ref().join(&self.file_name);
        fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

/// Derives the output file name: the lower-cased type name plus `suffix`.
#[must_use]
pub fn output_file_name(type_name: &str, suffix: &str) -> String {
    format!("{}{}", type_name.to_lowercase(), suffix)
}

/// Collection code generator for one record of one package.
#[derive(Debug)]
pub struct Generator {
    unit: CompilationUnit,
    record: RecordDecl,
    options: GeneratorOptions,
    registry: TemplateRegistry,
}

impl Generator {
    /// Loads the package in `dir` and locates `type_name` in it.
    ///
    /// # Arguments
    /// * `dir` - Directory containing the package's `Cargo.toml`
    /// * `type_name` - Name of the struct to generate a collection for
    /// * `options` - Generation options
    ///
    /// # Errors
    /// Returns `CodegenError::Source` if the name is invalid, the package
    /// cannot be resolved, or the record cannot be found or described, and
    /// `CodegenError::Template` if the embedded template set fails to parse.
    pub fn new(
        dir: impl AsRef<Path>,
        type_name: &str,
        options: GeneratorOptions,
    ) -> Result<Self, CodegenError> {
        validate_type_name(type_name)?;
        let unit = resolve(dir.as_ref(), LoadMode::Syntax)?;
        let record = find_record(type_name, &unit, options.duplicates)?;
        let registry = TemplateRegistry::builtin()?;

        Ok(Self {
            unit,
            record,
            options,
            registry,
        })
    }

    /// Replaces the template set.
    #[must_use]
    pub fn with_registry(mut self, registry: TemplateRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The resolved package.
    #[must_use]
    pub fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    /// The located record.
    #[must_use]
    pub fn record(&self) -> &RecordDecl {
        &self.record
    }

    /// Directory the generated file belongs in.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.unit.source_root
    }

    /// Data the templates are rendered with.
    #[must_use]
    pub fn target(&self) -> RenderTarget {
        RenderTarget::new(&self.unit.name, &self.record)
    }

    /// Renders and formats the collection source.
    ///
    /// # Errors
    /// Returns `CodegenError::Template` if rendering fails, or
    /// `CodegenError::MalformedOutput` if the rendered text is not valid Rust.
    pub fn run(&self) -> Result<GeneratedFile, CodegenError> {
        let target = self.target();
        let raw = Renderer::new(&self.registry).render(&target)?;
        let contents = canonicalize(&raw)?;
        let file_name = output_file_name(&self.record.name, &self.options.file_suffix);

        info!(
            "Generated {} for {} ({} bytes)",
            file_name,
            self.record.location(),
            contents.len()
        );

        Ok(GeneratedFile {
            file_name,
            contents,
        })
    }
}
