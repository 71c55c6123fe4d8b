//! Binding of a located record into the template set.

use crate::error::CodegenError;
use crate::template::{COLLECTION_TEMPLATE, TemplateRegistry, Value};
use collgen_source::{FieldDescriptor, RecordDecl, plural_name};
use tracing::debug;

/// Data handed to the templates for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    /// Crate the record lives in.
    pub package_name: String,
    /// Record type name.
    pub type_name: String,
    /// Collection type name, `type_name` + `s`.
    pub plural_name: String,
    /// Path used to import the record, e.g. `crate::model::User`.
    pub record_path: String,
    /// Module declaring the record, e.g. `crate::model`. The generated file
    /// glob-imports it so field types declared beside the record resolve.
    pub module_path: String,
    /// Record fields, in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl RenderTarget {
    /// Builds the target for a record declared in `package_name`.
    #[must_use]
    pub fn new(package_name: impl Into<String>, record: &RecordDecl) -> Self {
        Self {
            package_name: package_name.into(),
            type_name: record.name.clone(),
            plural_name: plural_name(&record.name),
            record_path: record.crate_path(),
            module_path: record.crate_module(),
            fields: record.fields.clone(),
        }
    }

    /// Converts the target into template data.
    ///
    /// Besides the descriptor attributes, each field exposes `member` (the
    /// name as written in expressions, `r#`-escaped for keywords) and
    /// `plural` (the accessor name, `name` + `s`, escaped likewise).
    #[must_use]
    pub fn to_value(&self, template_version: &str) -> Value {
        let fields = self
            .fields
            .iter()
            .map(|field| {
                Value::map()
                    .with("name", field.name.as_str())
                    .with("member", escape_keyword(&field.name))
                    .with("plural", escape_keyword(&plural_name(&field.name)))
                    .with("base_type", field.base_type.as_str())
                    .with("is_pointer", field.is_pointer)
                    .with(
                        "pointer",
                        field.pointer.map(|kind| kind.as_str()).unwrap_or_default(),
                    )
            })
            .collect::<Vec<_>>();

        Value::map()
            .with("package_name", self.package_name.as_str())
            .with("type_name", self.type_name.as_str())
            .with("plural_name", self.plural_name.as_str())
            .with("record_path", self.record_path.as_str())
            .with("module_path", self.module_path.as_str())
            .with("template_version", template_version)
            .with("has_fields", !fields.is_empty())
            .with("fields", fields)
    }
}

/// Prefixes `r#` when `name` is a keyword that can be used as a raw
/// identifier.
fn escape_keyword(name: &str) -> String {
    if syn::parse_str::<syn::Ident>(name).is_ok() {
        name.to_string()
    } else {
        format!("r#{name}")
    }
}

/// Renders targets with a template set.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    registry: &'a TemplateRegistry,
    entry: &'a str,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer using the set's `collection` template as entry.
    #[must_use]
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self {
            registry,
            entry: COLLECTION_TEMPLATE,
        }
    }

    /// Uses another template of the set as entry point.
    #[must_use]
    pub fn with_entry(mut self, entry: &'a str) -> Self {
        self.entry = entry;
        self
    }

    /// Renders raw, unformatted source for `target`.
    ///
    /// # Errors
    /// Returns `CodegenError::Template` if the entry template is missing or
    /// execution fails.
    pub fn render(&self, target: &RenderTarget) -> Result<String, CodegenError> {
        let data = target.to_value(self.registry.version());
        let text = self.registry.execute(self.entry, &data)?;
        debug!(
            "Rendered {} with template '{}' ({} bytes)",
            target.plural_name,
            self.entry,
            text.len()
        );
        Ok(text)
    }
}
