//! Prelude module for convenient imports.
//!
//! ```ignore
//! use collgen::prelude::*;
//! ```

// Source types
pub use collgen_source::{
    CompilationUnit, DuplicatePolicy, FieldDescriptor, LoadMode, PointerKind, RecordDecl,
    SourceError,
};

// Codegen types
pub use collgen_codegen::{
    CodegenError, GeneratedFile, Generator, GeneratorOptions, RenderTarget, Renderer,
    TemplateError, TemplateRegistry, canonicalize, generate,
};
