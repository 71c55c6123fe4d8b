//! Intermediate representation handed to code generation.
//!
//! These types are the flattened result of resolving a package and locating
//! one record declaration in it. They carry plain strings so the rendering
//! stage never has to look at `syn` trees.

use std::fmt;
use std::path::PathBuf;

/// Smart pointer wrapping a field's named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// `Box<T>`.
    Box,
    /// `Rc<T>`.
    Rc,
    /// `Arc<T>`.
    Arc,
}

impl PointerKind {
    /// Matches the last path segment of a pointer type.
    #[must_use]
    pub fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "Box" => Some(Self::Box),
            "Rc" => Some(Self::Rc),
            "Arc" => Some(Self::Arc),
            _ => None,
        }
    }

    /// Returns the pointer's type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Box => "Box",
            Self::Rc => "Rc",
            Self::Arc => "Arc",
        }
    }
}

impl fmt::Display for PointerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted metadata for one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, without any `r#` prefix.
    pub name: String,
    /// Named type of the field, or of the pointee for pointer fields.
    pub base_type: String,
    /// Whether the field holds a pointer to `base_type`.
    pub is_pointer: bool,
    /// Pointer wrapper, when `is_pointer` is set.
    pub pointer: Option<PointerKind>,
}

impl FieldDescriptor {
    /// Creates a descriptor for a field of a plain named type.
    #[must_use]
    pub fn plain(name: impl Into<String>, base_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_type: base_type.into(),
            is_pointer: false,
            pointer: None,
        }
    }

    /// Creates a descriptor for a field holding a pointer to a named type.
    #[must_use]
    pub fn pointer(
        name: impl Into<String>,
        kind: PointerKind,
        base_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_type: base_type.into(),
            is_pointer: true,
            pointer: Some(kind),
        }
    }
}

/// A located record declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDecl {
    /// Declared type name.
    pub name: String,
    /// Module path from the crate root to the declaration.
    pub module_path: Vec<String>,
    /// Source file, relative to the package's source root.
    pub file: PathBuf,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDecl {
    /// Path of the module declaring the record, e.g. `crate::model`.
    #[must_use]
    pub fn crate_module(&self) -> String {
        let mut path = String::from("crate");
        for segment in &self.module_path {
            path.push_str("::");
            path.push_str(segment);
        }
        path
    }

    /// Path used to import the record from elsewhere in the same crate.
    #[must_use]
    pub fn crate_path(&self) -> String {
        format!("{}::{}", self.crate_module(), self.name)
    }

    /// Human-readable location, used in diagnostics.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{} ({})", self.crate_path(), self.file.display())
    }
}

/// Derives the collection name for a type by appending `s`.
///
/// No irregular pluralization is attempted: `Status` becomes `Statuss`.
#[must_use]
pub fn plural_name(type_name: &str) -> String {
    format!("{type_name}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_name_appends_s() {
        assert_eq!(plural_name("User"), "Users");
        assert_eq!(plural_name("Status"), "Statuss");
        assert_eq!(plural_name("Person"), "Persons");
    }

    #[test]
    fn test_pointer_kind_from_ident() {
        assert_eq!(PointerKind::from_ident("Box"), Some(PointerKind::Box));
        assert_eq!(PointerKind::from_ident("Arc"), Some(PointerKind::Arc));
        assert_eq!(PointerKind::from_ident("Vec"), None);
        assert_eq!(PointerKind::Rc.to_string(), "Rc");
    }

    #[test]
    fn test_crate_path_at_root() {
        let record = RecordDecl {
            name: "User".to_string(),
            module_path: Vec::new(),
            file: PathBuf::from("lib.rs"),
            fields: Vec::new(),
        };
        assert_eq!(record.crate_module(), "crate");
        assert_eq!(record.crate_path(), "crate::User");
    }

    #[test]
    fn test_crate_path_nested() {
        let record = RecordDecl {
            name: "Invoice".to_string(),
            module_path: vec!["billing".to_string(), "model".to_string()],
            file: PathBuf::from("billing/model.rs"),
            fields: Vec::new(),
        };
        assert_eq!(record.crate_module(), "crate::billing::model");
        assert_eq!(record.crate_path(), "crate::billing::model::Invoice");
        assert_eq!(
            record.location(),
            "crate::billing::model::Invoice (billing/model.rs)"
        );
    }

    #[test]
    fn test_field_descriptor_constructors() {
        let id = FieldDescriptor::plain("id", "i64");
        assert!(!id.is_pointer);
        assert_eq!(id.pointer, None);

        let manager = FieldDescriptor::pointer("manager", PointerKind::Box, "User");
        assert!(manager.is_pointer);
        assert_eq!(manager.base_type, "User");
        assert_eq!(manager.pointer, Some(PointerKind::Box));
    }
}
