//! Template registry.
//!
//! A [`TemplateRegistry`] is an immutable set of named, pre-parsed templates.
//! It is built explicitly, either from the embedded set shipped with the crate
//! ([`TemplateRegistry::builtin`]) or from caller-supplied sources, and then
//! handed to a [`crate::render::Renderer`].

pub mod exec;
pub mod parser;
pub mod value;

use crate::error::TemplateError;
use exec::Executor;
use parser::Node;
use std::collections::BTreeMap;
use value::Scope;

pub use value::Value;

/// Version of the embedded template set. Bumped whenever the generated code
/// changes shape.
pub const TEMPLATE_SET_VERSION: &str = "1";

/// Entry template of the embedded set.
pub const COLLECTION_TEMPLATE: &str = "collection";

const BUILTIN: &[(&str, &str)] = &[
    (
        COLLECTION_TEMPLATE,
        include_str!("../../templates/collection.rs.tmpl"),
    ),
    (
        "collection_fields",
        include_str!("../../templates/collection_fields.rs.tmpl"),
    ),
    (
        "collection_traits",
        include_str!("../../templates/collection_traits.rs.tmpl"),
    ),
];

/// A parsed template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parses a template.
    ///
    /// # Errors
    /// Returns `TemplateError::Parse` if the source is malformed.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        let name = name.into();
        let nodes = parser::parse(&name, source)?;
        Ok(Self { name, nodes })
    }

    /// Template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parsed nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

/// An immutable set of named templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
    version: String,
}

impl TemplateRegistry {
    /// Creates a builder for a custom template set.
    #[must_use]
    pub fn builder() -> TemplateRegistryBuilder {
        TemplateRegistryBuilder::default()
    }

    /// Builds the template set embedded in this crate.
    ///
    /// # Errors
    /// Returns `TemplateError::Parse` if an embedded template is malformed.
    pub fn builtin() -> Result<Self, TemplateError> {
        BUILTIN
            .iter()
            .fold(Self::builder(), |builder, (name, source)| {
                builder.template(*name, *source)
            })
            .version(TEMPLATE_SET_VERSION)
            .build()
    }

    /// Looks up a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Registered template names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Version label of the set.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Executes the template `name` with `root` as its data.
    ///
    /// # Errors
    /// Returns `TemplateError::UnknownTemplate` if `name` is not registered,
    /// or `TemplateError::Execute` if execution fails.
    pub fn execute(&self, name: &str, root: &Value) -> Result<String, TemplateError> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::UnknownTemplate {
                name: name.to_string(),
            })?;

        let mut out = String::new();
        let mut scope = Scope::new(root);
        Executor::new(self).run(template.name(), template.nodes(), &mut scope, &mut out)?;
        Ok(out)
    }
}

/// Builder for [`TemplateRegistry`].
#[derive(Debug, Default)]
pub struct TemplateRegistryBuilder {
    sources: Vec<(String, String)>,
    version: Option<String>,
}

impl TemplateRegistryBuilder {
    /// Adds a template source.
    #[must_use]
    pub fn template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.sources.push((name.into(), source.into()));
        self
    }

    /// Sets the version label.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Parses every template and freezes the set.
    ///
    /// # Errors
    /// Returns `TemplateError::Parse` for malformed sources, or
    /// `TemplateError::DuplicateTemplate` if a name is registered twice.
    pub fn build(self) -> Result<TemplateRegistry, TemplateError> {
        let mut templates = BTreeMap::new();
        for (name, source) in self.sources {
            if templates.contains_key(&name) {
                return Err(TemplateError::DuplicateTemplate { name });
            }
            let template = Template::parse(name.clone(), &source)?;
            templates.insert(name, template);
        }

        Ok(TemplateRegistry {
            templates,
            version: self.version.unwrap_or_else(|| "0".to_string()),
        })
    }
}
