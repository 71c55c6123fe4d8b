//! Error types for package resolution and field extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Underlying reason a package could not be loaded.
#[derive(Debug, Error)]
pub enum LoadCause {
    /// The path does not name a directory.
    #[error("not a directory")]
    NotADirectory,

    /// No `Cargo.toml` at the package root.
    #[error("no Cargo.toml manifest found")]
    MissingManifest,

    /// Manifest is not valid TOML or has an unexpected shape.
    #[error("invalid manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    /// Manifest declares a package without a usable name.
    #[error("manifest has no package name")]
    MissingPackageName,

    /// The package has no `src` directory.
    #[error("source directory '{path}' not found")]
    MissingSourceRoot {
        /// Expected source root.
        path: PathBuf,
    },

    /// A source file is not valid Rust.
    #[error("syntax error in {path} at {line}:{column}: {message}")]
    Syntax {
        /// File path relative to the source root.
        path: PathBuf,
        /// 1-based line of the error.
        line: usize,
        /// 0-based column of the error.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for resolving a package and introspecting its records.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The directory could not be loaded as a single package.
    #[error("failed to load package dir={dir}: {cause}")]
    Load {
        /// Directory that was loaded.
        dir: PathBuf,
        /// Underlying cause.
        #[source]
        cause: LoadCause,
    },

    /// The directory resolves to zero or several packages.
    #[error("{found} packages found in dir={dir}, expected exactly one")]
    AmbiguousPackage {
        /// Directory that was loaded.
        dir: PathBuf,
        /// Number of packages the manifest refers to.
        found: usize,
    },

    /// No struct with the requested name exists in the package.
    #[error("type '{type_name}' not found in dir={dir}")]
    TypeNotFound {
        /// Requested type name.
        type_name: String,
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// The requested name is declared more than once.
    #[error("type '{type_name}' is declared more than once: {first} and {second}")]
    AmbiguousType {
        /// Requested type name.
        type_name: String,
        /// Location of the first declaration.
        first: String,
        /// Location of the second declaration.
        second: String,
    },

    /// A field of the record has a shape the generator cannot handle.
    #[error("unsupported field '{field}' in type '{type_name}': {reason}")]
    UnsupportedFieldShape {
        /// Record name.
        type_name: String,
        /// Field name, or its position for unnamed fields.
        field: String,
        /// Why the shape is rejected.
        reason: String,
    },

    /// The requested type name is not a Rust identifier.
    #[error("invalid type name '{name}': {reason}")]
    InvalidTypeName {
        /// Requested name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl SourceError {
    /// Creates a load error for the given directory.
    pub fn load(dir: impl Into<PathBuf>, cause: impl Into<LoadCause>) -> Self {
        Self::Load {
            dir: dir.into(),
            cause: cause.into(),
        }
    }

    /// Creates an unsupported field error.
    pub fn unsupported(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedFieldShape {
            type_name: type_name.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl LoadCause {
    /// Creates a syntax error cause from a `syn` error.
    pub fn syntax(path: impl Into<PathBuf>, err: &syn::Error) -> Self {
        let start = err.span().start();
        Self::Syntax {
            path: path.into(),
            line: start.line,
            column: start.column,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_message_names_dir() {
        let err = SourceError::load("/tmp/pkg", LoadCause::MissingManifest);
        assert_eq!(
            err.to_string(),
            "failed to load package dir=/tmp/pkg: no Cargo.toml manifest found"
        );
    }

    #[test]
    fn test_load_error_exposes_cause() {
        use std::error::Error as _;

        let err = SourceError::load("pkg", LoadCause::NotADirectory);
        let source = err.source().expect("load error has a source");
        assert_eq!(source.to_string(), "not a directory");
    }

    #[test]
    fn test_unsupported_field_message() {
        let err = SourceError::unsupported("User", "tags", "generic type arguments");
        assert_eq!(
            err.to_string(),
            "unsupported field 'tags' in type 'User': generic type arguments"
        );
    }

    #[test]
    fn test_syntax_cause_records_location() {
        let err = syn::parse_file("struct {").expect_err("invalid source");
        let cause = LoadCause::syntax("lib.rs", &err);
        match cause {
            LoadCause::Syntax { path, line, .. } => {
                assert_eq!(path, PathBuf::from("lib.rs"));
                assert_eq!(line, 1);
            }
            other => panic!("unexpected cause: {other:?}"),
        }
    }
}
