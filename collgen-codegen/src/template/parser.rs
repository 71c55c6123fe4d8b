//! Template parsing.
//!
//! Template text is literal output except for these tags:
//!
//! | tag                   | meaning                                  |
//! |-----------------------|------------------------------------------|
//! | `@{path}`             | interpolate a string or boolean          |
//! | `{#for x in path}`    | repeat the body for each list item       |
//! | `{#if path}`          | emit the body when the flag is set       |
//! | `{#if !path}`         | emit the body when the flag is clear     |
//! | `{:else}`             | alternative branch of `{#if}`            |
//! | `{/for}`, `{/if}`     | close a block                            |
//! | `{#include name}`     | render another template in the same set  |
//!
//! A tag that sits alone on its line takes the whole line with it, so block
//! tags do not leave blank lines behind.

use crate::error::TemplateError;

/// A parsed template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text.
    Text(String),
    /// `@{path}`.
    Interpolate {
        /// Dotted path.
        path: Vec<String>,
        /// Source line.
        line: usize,
    },
    /// `{#for binding in list}...{/for}`.
    For {
        /// Loop variable.
        binding: String,
        /// Path of the list.
        list: Vec<String>,
        /// Loop body.
        body: Vec<Node>,
        /// Source line.
        line: usize,
    },
    /// `{#if path}...{:else}...{/if}`.
    If {
        /// Path of the flag.
        condition: Vec<String>,
        /// Whether the condition is negated.
        negate: bool,
        /// Nodes emitted when the condition holds.
        then_branch: Vec<Node>,
        /// Nodes emitted otherwise.
        else_branch: Vec<Node>,
        /// Source line.
        line: usize,
    },
    /// `{#include name}`.
    Include {
        /// Partial template name.
        name: String,
        /// Source line.
        line: usize,
    },
}

/// Block terminator encountered while parsing a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Else,
    EndIf,
    EndFor,
}

impl Terminator {
    const fn tag(self) -> &'static str {
        match self {
            Self::Else => "{:else}",
            Self::EndIf => "{/if}",
            Self::EndFor => "{/for}",
        }
    }
}

/// A lexed tag.
#[derive(Debug)]
enum Tag {
    Interpolate(Vec<String>),
    For(String, Vec<String>),
    If(Vec<String>, bool),
    Include(String),
    End(Terminator),
}

struct Parser<'s> {
    name: &'s str,
    source: &'s str,
    pos: usize,
    line: usize,
}

/// Parses template source into nodes.
///
/// # Errors
/// Returns `TemplateError::Parse` for unterminated or unknown tags, empty or
/// malformed paths, unclosed blocks, and stray `{:else}`/`{/...}` tags.
pub fn parse(name: &str, source: &str) -> Result<Vec<Node>, TemplateError> {
    let mut parser = Parser {
        name,
        source,
        pos: 0,
        line: 1,
    };
    let (nodes, terminator) = parser.fragment(&[])?;
    match terminator {
        None => Ok(nodes),
        Some((terminator, line)) => Err(TemplateError::parse(
            name,
            line,
            format!("unexpected {}", terminator.tag()),
        )),
    }
}

impl<'s> Parser<'s> {
    fn error(&self, line: usize, message: impl Into<String>) -> TemplateError {
        TemplateError::parse(self.name, line, message)
    }

    /// Parses nodes until end of input or one of `stop`.
    ///
    /// Returns the terminator that ended the fragment, with its line. A
    /// terminator not listed in `stop` is returned as well, so the caller can
    /// report it.
    fn fragment(
        &mut self,
        stop: &[Terminator],
    ) -> Result<(Vec<Node>, Option<(Terminator, usize)>), TemplateError> {
        let mut nodes = Vec::new();

        loop {
            let Some(start) = self.next_tag_start() else {
                self.push_text(&mut nodes, self.source.len());
                return Ok((nodes, None));
            };

            let line_start = self.source[..start].rfind('\n').map_or(0, |i| i + 1);
            let before = &self.source[line_start..start];
            let is_block = self.source[start..].starts_with('{');

            let tag_line = self.line + self.source[self.pos..start].matches('\n').count();
            let (tag, tag_end) = self.lex_tag(start, tag_line)?;

            // A block tag alone on its line consumes the line.
            let standalone_end = if is_block && before.trim().is_empty() && line_start >= self.pos
            {
                let after = &self.source[tag_end..];
                let rest_of_line = after.find('\n').map_or(after.len(), |i| i + 1);
                after[..rest_of_line]
                    .trim()
                    .is_empty()
                    .then_some(tag_end + rest_of_line)
            } else {
                None
            };

            match standalone_end {
                Some(end) => {
                    self.push_text(&mut nodes, line_start);
                    self.advance(end);
                }
                None => {
                    self.push_text(&mut nodes, start);
                    self.advance(tag_end);
                }
            }

            match tag {
                Tag::Interpolate(path) => nodes.push(Node::Interpolate {
                    path,
                    line: tag_line,
                }),
                Tag::Include(name) => nodes.push(Node::Include {
                    name,
                    line: tag_line,
                }),
                Tag::For(binding, list) => {
                    let (body, end) = self.fragment(&[Terminator::EndFor])?;
                    match end {
                        Some((Terminator::EndFor, _)) => nodes.push(Node::For {
                            binding,
                            list,
                            body,
                            line: tag_line,
                        }),
                        Some((other, line)) => {
                            return Err(self.error(line, format!("unexpected {}", other.tag())));
                        }
                        None => {
                            return Err(self.error(tag_line, "unclosed {#for} block: missing {/for}"));
                        }
                    }
                }
                Tag::If(condition, negate) => {
                    let (then_branch, end) =
                        self.fragment(&[Terminator::Else, Terminator::EndIf])?;
                    let else_branch = match end {
                        Some((Terminator::EndIf, _)) => Vec::new(),
                        Some((Terminator::Else, _)) => {
                            let (else_branch, end) = self.fragment(&[Terminator::EndIf])?;
                            match end {
                                Some((Terminator::EndIf, _)) => else_branch,
                                Some((other, line)) => {
                                    return Err(
                                        self.error(line, format!("unexpected {}", other.tag()))
                                    );
                                }
                                None => {
                                    return Err(self.error(
                                        tag_line,
                                        "unclosed {:else} block: missing {/if}",
                                    ));
                                }
                            }
                        }
                        Some((other, line)) => {
                            return Err(self.error(line, format!("unexpected {}", other.tag())));
                        }
                        None => {
                            return Err(self.error(tag_line, "unclosed {#if} block: missing {/if}"));
                        }
                    };
                    nodes.push(Node::If {
                        condition,
                        negate,
                        then_branch,
                        else_branch,
                        line: tag_line,
                    });
                }
                Tag::End(terminator) => {
                    if !stop.contains(&terminator) {
                        return Err(self.error(tag_line, format!("unexpected {}", terminator.tag())));
                    }
                    return Ok((nodes, Some((terminator, tag_line))));
                }
            }
        }
    }

    /// Finds the byte offset of the next tag at or after `pos`.
    fn next_tag_start(&self) -> Option<usize> {
        let bytes = self.source.as_bytes();
        (self.pos..bytes.len().saturating_sub(1)).find(|&i| {
            let next = bytes[i + 1];
            (bytes[i] == b'@' && next == b'{')
                || (bytes[i] == b'{' && matches!(next, b'#' | b':' | b'/'))
        })
    }

    /// Lexes the tag starting at `start`, returning it with its end offset.
    fn lex_tag(&self, start: usize, line: usize) -> Result<(Tag, usize), TemplateError> {
        let open = if self.source[start..].starts_with('@') {
            2
        } else {
            1
        };
        let body_start = start + open;
        let close = self.source[body_start..]
            .find(|c| c == '}' || c == '{' || c == '\n')
            .map(|i| body_start + i);
        let close = match close {
            Some(i) if self.source.as_bytes()[i] == b'}' => i,
            _ => return Err(self.error(line, "unterminated tag")),
        };
        let body = self.source[body_start..close].trim();
        let end = close + 1;

        if open == 2 {
            return Ok((Tag::Interpolate(self.path(body, line)?), end));
        }

        let tag = match body {
            ":else" => Tag::End(Terminator::Else),
            "/if" => Tag::End(Terminator::EndIf),
            "/for" => Tag::End(Terminator::EndFor),
            _ => {
                let mut words = body.split_whitespace();
                match words.next() {
                    Some("#for") => {
                        let binding = words.next();
                        let keyword = words.next();
                        let list = words.next();
                        match (binding, keyword, list, words.next()) {
                            (Some(binding), Some("in"), Some(list), None)
                                if is_identifier(binding) =>
                            {
                                Tag::For(binding.to_string(), self.path(list, line)?)
                            }
                            _ => {
                                return Err(self.error(
                                    line,
                                    format!("malformed for tag '{{{body}}}': expected {{#for item in path}}"),
                                ));
                            }
                        }
                    }
                    Some("#if") => {
                        let rest: Vec<&str> = words.collect();
                        let expr = rest.concat();
                        match expr.strip_prefix('!') {
                            Some(negated) => Tag::If(self.path(negated, line)?, true),
                            None => Tag::If(self.path(&expr, line)?, false),
                        }
                    }
                    Some("#include") => match (words.next(), words.next()) {
                        (Some(name), None) => Tag::Include(name.to_string()),
                        _ => {
                            return Err(self.error(line, "malformed include tag: expected {#include name}"));
                        }
                    },
                    _ => return Err(self.error(line, format!("unknown tag '{{{body}}}'"))),
                }
            }
        };

        Ok((tag, end))
    }

    /// Parses a dotted path such as `field.base_type`.
    fn path(&self, text: &str, line: usize) -> Result<Vec<String>, TemplateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(self.error(line, "empty path"));
        }
        text.split('.')
            .map(|segment| {
                if is_identifier(segment) {
                    Ok(segment.to_string())
                } else {
                    Err(self.error(line, format!("invalid path '{text}'")))
                }
            })
            .collect()
    }

    fn push_text(&self, nodes: &mut Vec<Node>, end: usize) {
        if end > self.pos {
            nodes.push(Node::Text(self.source[self.pos..end].to_string()));
        }
    }

    fn advance(&mut self, to: usize) {
        self.line += self.source[self.pos..to].matches('\n').count();
        self.pos = to;
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> Vec<String> {
        p.split('.').map(str::to_string).collect()
    }

    fn parse_err(source: &str) -> (usize, String) {
        match parse("t", source) {
            Err(TemplateError::Parse { line, message, .. }) => (line, message),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_text_and_interpolation() {
        let nodes = parse("t", "pub struct @{plural_name}(Vec<@{type_name}>);")
            .expect("Failed to parse");

        assert_eq!(
            nodes,
            vec![
                Node::Text("pub struct ".to_string()),
                Node::Interpolate {
                    path: path("plural_name"),
                    line: 1
                },
                Node::Text("(Vec<".to_string()),
                Node::Interpolate {
                    path: path("type_name"),
                    line: 1
                },
                Node::Text(">);".to_string()),
            ]
        );
    }

    #[test]
    fn test_rust_braces_are_literal() {
        let source = "impl X {\n    fn f(&self) -> u8 { 0 }\n}\n";
        let nodes = parse("t", source).expect("Failed to parse");
        assert_eq!(nodes, vec![Node::Text(source.to_string())]);
    }

    #[test]
    fn test_standalone_block_tags_consume_line() {
        let source = "a\n{#for f in fields}\n  @{f.name}\n{/for}\nb\n";
        let nodes = parse("t", source).expect("Failed to parse");

        assert_eq!(
            nodes,
            vec![
                Node::Text("a\n".to_string()),
                Node::For {
                    binding: "f".to_string(),
                    list: path("fields"),
                    body: vec![
                        Node::Text("  ".to_string()),
                        Node::Interpolate {
                            path: path("f.name"),
                            line: 3
                        },
                        Node::Text("\n".to_string()),
                    ],
                    line: 2,
                },
                Node::Text("b\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_if_else() {
        let nodes = parse("t", "{#if !f.is_pointer}x{:else}y{/if}").expect("Failed to parse");

        assert_eq!(
            nodes,
            vec![Node::If {
                condition: path("f.is_pointer"),
                negate: true,
                then_branch: vec![Node::Text("x".to_string())],
                else_branch: vec![Node::Text("y".to_string())],
                line: 1,
            }]
        );
    }

    #[test]
    fn test_parse_include() {
        let nodes = parse("t", "{#include fields}").expect("Failed to parse");
        assert_eq!(
            nodes,
            vec![Node::Include {
                name: "fields".to_string(),
                line: 1
            }]
        );
    }

    #[test]
    fn test_unclosed_for() {
        let (line, message) = parse_err("x\n{#for f in fields}\nbody\n");
        assert_eq!(line, 2);
        assert!(message.contains("unclosed {#for}"), "{message}");
    }

    #[test]
    fn test_unclosed_if() {
        let (line, message) = parse_err("{#if flag}\nbody\n");
        assert_eq!(line, 1);
        assert!(message.contains("unclosed {#if}"), "{message}");
    }

    #[test]
    fn test_stray_terminator() {
        let (line, message) = parse_err("a\nb\n{/for}\n");
        assert_eq!(line, 3);
        assert_eq!(message, "unexpected {/for}");
    }

    #[test]
    fn test_mismatched_terminator() {
        let (_, message) = parse_err("{#for f in fields}{/if}");
        assert_eq!(message, "unexpected {/if}");
    }

    #[test]
    fn test_unterminated_tag() {
        let (_, message) = parse_err("pub struct @{plural_name\n");
        assert_eq!(message, "unterminated tag");
    }

    #[test]
    fn test_empty_and_invalid_paths() {
        assert_eq!(parse_err("@{ }").1, "empty path");
        assert_eq!(parse_err("@{a..b}").1, "invalid path 'a..b'");
        assert_eq!(parse_err("@{field-name}").1, "invalid path 'field-name'");
    }

    #[test]
    fn test_unknown_and_malformed_tags() {
        assert!(parse_err("{#while x}").1.starts_with("unknown tag"));
        assert!(parse_err("{#for f of fields}{/for}").1.starts_with("malformed for tag"));
        assert!(parse_err("{#include}").1.starts_with("malformed include tag"));
    }
}
