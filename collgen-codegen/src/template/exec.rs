//! Template execution.

use super::TemplateRegistry;
use super::parser::Node;
use super::value::{Scope, Value};
use crate::error::TemplateError;

/// Maximum `{#include}` nesting before execution is aborted.
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// Executes one template against a scope, appending to `out`.
pub(crate) struct Executor<'r> {
    registry: &'r TemplateRegistry,
    depth: usize,
}

impl<'r> Executor<'r> {
    pub(crate) fn new(registry: &'r TemplateRegistry) -> Self {
        Self { registry, depth: 0 }
    }

    pub(crate) fn run<'v>(
        &mut self,
        template: &'v str,
        nodes: &'v [Node],
        scope: &mut Scope<'v>,
        out: &mut String,
    ) -> Result<(), TemplateError>
    where
        'r: 'v,
    {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Interpolate { path, line } => {
                    let value = lookup(template, scope, path, *line)?;
                    match value {
                        Value::Str(_) | Value::Bool(_) => out.push_str(&value.to_string()),
                        other => {
                            return Err(TemplateError::execute(
                                template,
                                format!(
                                    "line {line}: cannot interpolate {} '{}'",
                                    other.kind(),
                                    path.join(".")
                                ),
                            ));
                        }
                    }
                }
                Node::For {
                    binding,
                    list,
                    body,
                    line,
                } => {
                    let items = match lookup(template, scope, list, *line)? {
                        Value::List(items) => items,
                        other => {
                            return Err(TemplateError::execute(
                                template,
                                format!(
                                    "line {line}: cannot iterate over {} '{}'",
                                    other.kind(),
                                    list.join(".")
                                ),
                            ));
                        }
                    };
                    for item in items {
                        scope.push(binding, item);
                        let result = self.run(template, body, scope, out);
                        scope.pop();
                        result?;
                    }
                }
                Node::If {
                    condition,
                    negate,
                    then_branch,
                    else_branch,
                    line,
                } => {
                    let flag = match lookup(template, scope, condition, *line)? {
                        Value::Bool(flag) => *flag,
                        other => {
                            return Err(TemplateError::execute(
                                template,
                                format!(
                                    "line {line}: condition '{}' is a {}, expected a boolean",
                                    condition.join("."),
                                    other.kind()
                                ),
                            ));
                        }
                    };
                    let branch = if flag != *negate {
                        then_branch
                    } else {
                        else_branch
                    };
                    self.run(template, branch, scope, out)?;
                }
                Node::Include { name, line } => {
                    if self.depth >= MAX_INCLUDE_DEPTH {
                        return Err(TemplateError::execute(
                            template,
                            format!(
                                "line {line}: include depth exceeds {MAX_INCLUDE_DEPTH} at '{name}'"
                            ),
                        ));
                    }
                    let Some(partial) = self.registry.get(name) else {
                        return Err(TemplateError::execute(
                            template,
                            format!("line {line}: unknown partial '{name}'"),
                        ));
                    };
                    self.depth += 1;
                    let result = self.run(partial.name(), partial.nodes(), scope, out);
                    self.depth -= 1;
                    result?;
                }
            }
        }
        Ok(())
    }
}

fn lookup<'v>(
    template: &str,
    scope: &Scope<'v>,
    path: &[String],
    line: usize,
) -> Result<&'v Value, TemplateError> {
    scope
        .lookup(path)
        .map_err(|message| TemplateError::execute(template, format!("line {line}: {message}")))
}
