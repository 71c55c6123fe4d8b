//! Input validation.

use crate::error::SourceError;

/// Validates that `name` can be used as the target type name.
///
/// # Errors
/// Returns `SourceError::InvalidTypeName` if `name` is empty, is not a Rust
/// identifier, or is a keyword.
pub fn validate_type_name(name: &str) -> Result<(), SourceError> {
    let invalid = |reason: &str| SourceError::InvalidTypeName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.starts_with("r#") {
        return Err(invalid("raw identifiers are not supported"));
    }
    syn::parse_str::<syn::Ident>(name)
        .map_err(|_| invalid("not an identifier, or a reserved keyword"))?;

    Ok(())
}
