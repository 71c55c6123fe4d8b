//! Error types for code generation.

use collgen_source::SourceError;
use thiserror::Error;

/// Error type for template parsing and execution.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Malformed template syntax.
    #[error("template '{template}' line {line}: {message}")]
    Parse {
        /// Template name.
        template: String,
        /// 1-based line of the offending tag.
        line: usize,
        /// Error message.
        message: String,
    },

    /// Template execution failed.
    #[error("failed to execute template '{template}': {message}")]
    Execute {
        /// Template being executed.
        template: String,
        /// Error message.
        message: String,
    },

    /// No template registered under the name.
    #[error("unknown template '{name}'")]
    UnknownTemplate {
        /// Requested name.
        name: String,
    },

    /// Two templates registered under one name.
    #[error("duplicate template '{name}'")]
    DuplicateTemplate {
        /// Template name.
        name: String,
    },
}

impl TemplateError {
    /// Creates a parse error.
    pub fn parse(template: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            template: template.into(),
            line,
            message: message.into(),
        }
    }

    /// Creates an execution error.
    pub fn execute(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execute {
            template: template.into(),
            message: message.into(),
        }
    }
}

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Package resolution or field extraction failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Rendered text is not valid Rust.
    #[error("generated code is malformed at {line}:{column}: {message}")]
    MalformedOutput {
        /// 1-based line of the error in the rendered text.
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
