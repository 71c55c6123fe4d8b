//! Record lookup and field extraction.
//!
//! The lookup is targeted: files are scanned for a `struct` item with the
//! requested name (descending only into inline `mod` blocks), and once it is
//! found only that struct's own field list is read.

use crate::error::SourceError;
use crate::ir::{FieldDescriptor, PointerKind, RecordDecl};
use crate::resolver::{CompilationUnit, ParsedFile};
use syn::{
    Fields, GenericArgument, GenericParam, Item, ItemStruct, Path as SynPath, PathArguments, Type,
};
use tracing::debug;

/// What to do when the requested name is declared more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Use the first declaration in traversal order.
    #[default]
    FirstMatch,
    /// Fail with [`SourceError::AmbiguousType`].
    Reject,
}

/// Shape of a field's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// A named type such as `i64` or `chrono::NaiveDate`.
    Plain(String),
    /// A smart pointer to a named type, such as `Box<User>`.
    Pointer(PointerKind, String),
    /// Anything else; the string says why.
    Unsupported(String),
}

/// Classifies a field type.
#[must_use]
pub fn classify(ty: &Type) -> FieldShape {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => classify_path(&type_path.path),
        Type::Paren(inner) => classify(&inner.elem),
        Type::Group(inner) => classify(&inner.elem),
        Type::Reference(_) => FieldShape::Unsupported("reference types".to_string()),
        Type::Ptr(_) => FieldShape::Unsupported("raw pointer types".to_string()),
        Type::Array(_) => FieldShape::Unsupported("array types".to_string()),
        Type::Slice(_) => FieldShape::Unsupported("slice types".to_string()),
        Type::Tuple(tuple) if tuple.elems.is_empty() => {
            FieldShape::Unsupported("unit type".to_string())
        }
        Type::Tuple(_) => FieldShape::Unsupported("tuple types".to_string()),
        Type::BareFn(_) => FieldShape::Unsupported("function pointer types".to_string()),
        Type::TraitObject(_) | Type::ImplTrait(_) => {
            FieldShape::Unsupported("trait types".to_string())
        }
        Type::Path(_) => FieldShape::Unsupported("qualified self types".to_string()),
        _ => FieldShape::Unsupported("unrecognized type syntax".to_string()),
    }
}

fn classify_path(path: &SynPath) -> FieldShape {
    let Some(last) = path.segments.last() else {
        return FieldShape::Unsupported("empty type path".to_string());
    };

    if let Some(kind) = PointerKind::from_ident(&last.ident.to_string()) {
        let prefix_is_plain = path
            .segments
            .iter()
            .take(path.segments.len() - 1)
            .all(|segment| segment.arguments.is_none());
        if let (true, PathArguments::AngleBracketed(args)) = (prefix_is_plain, &last.arguments) {
            let mut types = args.args.iter().filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            });
            if let (Some(inner), None, 1) = (types.next(), types.next(), args.args.len()) {
                return match classify(inner) {
                    FieldShape::Plain(base) => FieldShape::Pointer(kind, base),
                    FieldShape::Pointer(..) => {
                        FieldShape::Unsupported(format!("nested pointer inside {kind}"))
                    }
                    FieldShape::Unsupported(reason) => {
                        FieldShape::Unsupported(format!("{kind} of {reason}"))
                    }
                };
            }
        }
    }

    if path.segments.iter().any(|segment| !segment.arguments.is_none()) {
        return FieldShape::Unsupported("generic type arguments".to_string());
    }

    FieldShape::Plain(path_to_string(path))
}

fn path_to_string(path: &SynPath) -> String {
    let joined = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    if path.leading_colon.is_some() {
        format!("::{joined}")
    } else {
        joined
    }
}

/// Extracts the fields of a struct declaration, in declaration order.
///
/// `Self` in a field type is replaced by the struct's own name, since the
/// generated code uses it inside the collection's `impl`.
///
/// # Errors
/// Returns `SourceError::UnsupportedFieldShape` for generic structs, for
/// unnamed fields, and for fields whose type is neither a named type nor a
/// pointer to one.
pub fn fields_of(item: &ItemStruct) -> Result<Vec<FieldDescriptor>, SourceError> {
    let type_name = item.ident.to_string();

    if let Some(param) = item.generics.params.first() {
        let (param, reason) = match param {
            GenericParam::Type(ty) => (ty.ident.to_string(), "generic type parameter"),
            GenericParam::Lifetime(lt) => (lt.lifetime.to_string(), "lifetime parameter"),
            GenericParam::Const(c) => (c.ident.to_string(), "const generic parameter"),
        };
        return Err(SourceError::unsupported(type_name, param, reason));
    }

    let resolve_self = |base: String| if base == "Self" { type_name.clone() } else { base };

    match &item.fields {
        Fields::Unit => Ok(Vec::new()),
        Fields::Unnamed(_) => Err(SourceError::unsupported(
            type_name,
            "0",
            "unnamed fields in tuple struct",
        )),
        Fields::Named(named) => named
            .named
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let Some(ident) = &field.ident else {
                    return Err(SourceError::unsupported(
                        type_name.as_str(),
                        index.to_string(),
                        "field has no name",
                    ));
                };
                let name = syn::ext::IdentExt::unraw(ident).to_string();
                let descriptor = match classify(&field.ty) {
                    FieldShape::Plain(base) => FieldDescriptor::plain(name, resolve_self(base)),
                    FieldShape::Pointer(kind, base) => {
                        FieldDescriptor::pointer(name, kind, resolve_self(base))
                    }
                    FieldShape::Unsupported(reason) => {
                        return Err(SourceError::unsupported(type_name.as_str(), name, reason));
                    }
                };
                debug!(
                    "Field {}.{}: {} (pointer={})",
                    type_name, descriptor.name, descriptor.base_type, descriptor.is_pointer
                );
                Ok(descriptor)
            })
            .collect(),
    }
}

/// A struct declaration found while scanning a file.
struct Found<'a> {
    item: &'a ItemStruct,
    module_path: Vec<String>,
    file: &'a ParsedFile,
}

/// Searches `items` (and inline modules within them) for a struct named
/// `type_name`, pushing every match onto `out` unless `first_only` is set and
/// a match already exists.
fn find_in_items<'a>(
    items: &'a [Item],
    type_name: &str,
    module_path: &mut Vec<String>,
    file: &'a ParsedFile,
    first_only: bool,
    out: &mut Vec<Found<'a>>,
) {
    for item in items {
        if first_only && !out.is_empty() {
            return;
        }
        match item {
            Item::Struct(item_struct) if item_struct.ident == type_name => {
                out.push(Found {
                    item: item_struct,
                    module_path: module_path.clone(),
                    file,
                });
            }
            Item::Mod(item_mod) => {
                if let Some((_, content)) = &item_mod.content {
                    module_path.push(item_mod.ident.to_string());
                    find_in_items(content, type_name, module_path, file, first_only, out);
                    module_path.pop();
                }
            }
            _ => {}
        }
    }
}

fn find_matches<'a>(
    type_name: &str,
    files: &'a [ParsedFile],
    first_only: bool,
) -> Vec<Found<'a>> {
    let mut found = Vec::new();
    for file in files {
        let mut module_path = file.module_path.clone();
        find_in_items(
            &file.syntax.items,
            type_name,
            &mut module_path,
            file,
            first_only,
            &mut found,
        );
        if first_only && !found.is_empty() {
            break;
        }
    }
    found
}

/// Extracts the field list of the struct named `type_name`.
///
/// Files are visited in the unit's order and the first declaration wins.
/// Use [`find_record`] to also learn where the struct is declared.
///
/// # Errors
/// Returns `SourceError::TypeNotFound` (naming the unit's directory) if no
/// file declares the struct, or `SourceError::UnsupportedFieldShape` for
/// fields the generator cannot describe.
pub fn extract_fields(
    type_name: &str,
    unit: &CompilationUnit,
) -> Result<Vec<FieldDescriptor>, SourceError> {
    let found = find_matches(type_name, &unit.files, true);
    match found.first() {
        Some(found) => fields_of(found.item),
        None => Err(SourceError::TypeNotFound {
            type_name: type_name.to_string(),
            dir: unit.manifest_dir.clone(),
        }),
    }
}

/// Locates the struct named `type_name` in a loaded package.
///
/// # Arguments
/// * `type_name` - Name of the struct
/// * `unit` - Package loaded with [`crate::resolver::LoadMode::Syntax`]
/// * `policy` - Handling of duplicate declarations
///
/// # Errors
/// Returns `SourceError::TypeNotFound`, `SourceError::AmbiguousType` (only
/// under [`DuplicatePolicy::Reject`]), or `SourceError::UnsupportedFieldShape`.
pub fn find_record(
    type_name: &str,
    unit: &CompilationUnit,
    policy: DuplicatePolicy,
) -> Result<RecordDecl, SourceError> {
    let found = find_matches(type_name, &unit.files, policy == DuplicatePolicy::FirstMatch);

    let Some(first) = found.first() else {
        return Err(SourceError::TypeNotFound {
            type_name: type_name.to_string(),
            dir: unit.manifest_dir.clone(),
        });
    };

    let record = RecordDecl {
        name: type_name.to_string(),
        module_path: first.module_path.clone(),
        file: first.file.path.clone(),
        fields: fields_of(first.item)?,
    };

    if let Some(second) = found.get(1) {
        let duplicate = RecordDecl {
            name: type_name.to_string(),
            module_path: second.module_path.clone(),
            file: second.file.path.clone(),
            fields: Vec::new(),
        };
        return Err(SourceError::AmbiguousType {
            type_name: type_name.to_string(),
            first: record.location(),
            second: duplicate.location(),
        });
    }

    debug!(
        "Found {} with {} fields",
        record.location(),
        record.fields.len()
    );

    Ok(record)
}
