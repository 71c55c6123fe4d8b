//! # collgen source
//!
//! Cargo package resolution and struct introspection.
//!
//! This crate provides:
//! - Loading one Cargo package and parsing its sources with `syn`
//! - Locating a `struct` declaration by name
//! - Classifying each field as a named type or a pointer to one
//! - The intermediate representation consumed by code generation

pub mod error;
pub mod extract;
pub mod ir;
pub mod manifest;
pub mod resolver;
pub mod validation;

pub use error::{LoadCause, SourceError};
pub use extract::{DuplicatePolicy, FieldShape, classify, extract_fields, find_record};
pub use ir::{FieldDescriptor, PointerKind, RecordDecl, plural_name};
pub use manifest::{Manifest, ManifestKind};
pub use resolver::{CompilationUnit, LoadMode, ParsedFile, resolve};
pub use validation::validate_type_name;
