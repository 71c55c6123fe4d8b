//! Canonical formatting of generated source.

use crate::error::CodegenError;

/// Parses `raw` as a Rust file and re-emits it with `prettyplease`.
///
/// Formatting is deterministic: equal token streams produce equal text.
/// Plain `//` comments are not part of the syntax tree and are dropped; doc
/// comments are kept.
///
/// # Errors
/// Returns `CodegenError::MalformedOutput` if `raw` is not a valid Rust file.
pub fn canonicalize(raw: &str) -> Result<String, CodegenError> {
    let file = syn::parse_file(raw).map_err(|e| {
        let start = e.span().start();
        CodegenError::MalformedOutput {
            line: start.line,
            column: start.column,
            message: e.to_string(),
        }
    })?;
    Ok(prettyplease::unparse(&file))
}
