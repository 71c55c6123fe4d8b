//! Values bound into templates.

use std::collections::BTreeMap;
use std::fmt;

/// A value visible to a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text, interpolated verbatim.
    Str(String),
    /// Flag, usable in `{#if}`.
    Bool(bool),
    /// Sequence, usable in `{#for}`.
    List(Vec<Value>),
    /// Named attributes, reachable with dotted paths.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Creates an empty map.
    #[must_use]
    pub fn map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Adds an attribute to a map value. Has no effect on other kinds.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Self::Map(entries) = &mut self {
            entries.insert(key.into(), value.into());
        }
        self
    }

    /// Looks up a direct attribute of a map value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Bool(_) => "boolean",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => write!(f, "<list of {}>", items.len()),
            Self::Map(_) => f.write_str("<map>"),
        }
    }
}

/// Stack of loop bindings layered over the root value.
#[derive(Debug)]
pub(crate) struct Scope<'v> {
    root: &'v Value,
    bindings: Vec<(&'v str, &'v Value)>,
}

impl<'v> Scope<'v> {
    pub(crate) fn new(root: &'v Value) -> Self {
        Self {
            root,
            bindings: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, name: &'v str, value: &'v Value) {
        self.bindings.push((name, value));
    }

    pub(crate) fn pop(&mut self) {
        self.bindings.pop();
    }

    /// Resolves a dotted path, innermost binding first.
    pub(crate) fn lookup(&self, path: &[String]) -> Result<&'v Value, String> {
        let Some((head, rest)) = path.split_first() else {
            return Err("empty path".to_string());
        };

        let mut current = self
            .bindings
            .iter()
            .rev()
            .find(|(name, _)| *name == head.as_str())
            .map(|(_, value)| *value)
            .or_else(|| self.root.get(head))
            .ok_or_else(|| format!("unknown variable '{head}'"))?;

        for (depth, segment) in rest.iter().enumerate() {
            current = current.get(segment).ok_or_else(|| {
                let owner = path[..=depth].join(".");
                format!("'{owner}' has no attribute '{segment}'")
            })?;
        }

        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> Vec<String> {
        p.split('.').map(str::to_string).collect()
    }

    #[test]
    fn test_with_builds_map() {
        let value = Value::map().with("name", "id").with("is_pointer", false);
        assert_eq!(value.get("name"), Some(&Value::Str("id".to_string())));
        assert_eq!(value.get("is_pointer"), Some(&Value::Bool(false)));
        assert_eq!(value.get("missing"), None);
    }

    #[test]
    fn test_lookup_prefers_innermost_binding() {
        let root = Value::map().with("field", "root");
        let outer = Value::map().with("name", "outer");
        let inner = Value::map().with("name", "inner");
        let mut scope = Scope::new(&root);

        scope.push("field", &outer);
        scope.push("field", &inner);
        assert_eq!(
            scope.lookup(&path("field.name")),
            Ok(&Value::Str("inner".to_string()))
        );

        scope.pop();
        assert_eq!(
            scope.lookup(&path("field.name")),
            Ok(&Value::Str("outer".to_string()))
        );

        scope.pop();
        assert_eq!(
            scope.lookup(&path("field")),
            Ok(&Value::Str("root".to_string()))
        );
    }

    #[test]
    fn test_lookup_errors() {
        let root = Value::map().with("target", Value::map().with("name", "User"));
        let scope = Scope::new(&root);

        assert_eq!(
            scope.lookup(&path("missing")),
            Err("unknown variable 'missing'".to_string())
        );
        assert_eq!(
            scope.lookup(&path("target.plural")),
            Err("'target' has no attribute 'plural'".to_string())
        );
        assert_eq!(
            scope.lookup(&path("target.name.len")),
            Err("'target.name' has no attribute 'len'".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(
            Value::from(vec![Value::from("a")]).to_string(),
            "<list of 1>"
        );
    }
}
