//! Recursive-descent parser for dash-list structure schemas.
//!
//! Grammar (indentation-sensitive, spaces only):
//!
//! ```text
//! list  := item+                      all items at the same indentation
//! item  := "- " key                   bare entry
//!        | "- " key ":" NEWLINE list  nested entry, list more indented
//! key   := unquoted | '"' text '"' | "'" text "'"
//! ```
//!
//! Blank lines and full-line `#` comments are ignored. Scalar values
//! (`- key: value`), flow collections and tags are not part of the language.

use super::StructureNode;
use crate::error::SchemaError;

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    indent: usize,
    content: &'a str,
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

pub(super) fn parse(text: &str) -> Result<Vec<StructureNode>, SchemaError> {
    let lines = tokenize(text)?;
    let Some(first) = lines.first().copied() else {
        return Err(SchemaError::NotAList);
    };
    if !first.content.starts_with('-') {
        return Err(SchemaError::NotAList);
    }

    let mut parser = Parser { lines, pos: 0 };
    let nodes = parser.parse_list(first.indent)?;

    if let Some(line) = parser.peek() {
        return Err(SchemaError::syntax(
            line.number,
            "indentation does not match any enclosing list",
        ));
    }

    Ok(nodes)
}

fn tokenize(text: &str) -> Result<Vec<Line<'_>>, SchemaError> {
    let mut lines = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let content = raw.trim_start();
        let leading = &raw[..raw.len() - content.len()];
        if leading.contains('\t') {
            return Err(SchemaError::syntax(number, "tabs are not allowed in indentation"));
        }

        lines.push(Line {
            number,
            indent: leading.chars().count(),
            content: content.trim_end(),
        });
    }

    Ok(lines)
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn parse_list(&mut self, indent: usize) -> Result<Vec<StructureNode>, SchemaError> {
        let mut nodes = Vec::new();

        while let Some(line) = self.peek() {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(SchemaError::syntax(line.number, "unexpected indentation"));
            }
            self.pos += 1;

            let (key, has_children) = parse_item(line)?;
            if !has_children {
                nodes.push(StructureNode::from_schema_key(&key, None));
                continue;
            }

            match self.peek() {
                Some(next) if next.indent > indent => {
                    let children = self.parse_list(next.indent)?;
                    nodes.push(StructureNode::from_schema_key(&key, Some(children)));
                }
                _ => {
                    return Err(SchemaError::syntax(
                        line.number,
                        format!("expected a nested list under \"{key}\""),
                    ));
                }
            }
        }

        Ok(nodes)
    }
}

/// Parses `- key` or `- key:` into the key and whether children follow.
fn parse_item(line: Line<'_>) -> Result<(String, bool), SchemaError> {
    let rest = match line.content.strip_prefix('-') {
        Some("") => return Err(SchemaError::syntax(line.number, "empty list item")),
        Some(rest) if rest.starts_with(' ') => rest.trim(),
        _ => return Err(SchemaError::syntax(line.number, "expected a \"- \" list item")),
    };

    if rest.starts_with('-') {
        return Err(SchemaError::syntax(line.number, "nested sequences are not supported"));
    }

    let quoted = rest.starts_with(['"', '\'']);
    let (key, tail) = match rest.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = &rest[1..];
            let Some(end) = inner.find(quote) else {
                return Err(SchemaError::syntax(line.number, "unterminated quoted key"));
            };
            (inner[..end].to_string(), strip_comment(inner[end + 1..].trim()))
        }
        _ => {
            let unquoted = strip_comment(rest);
            match unquoted.strip_suffix(':') {
                Some(key) => (key.trim_end().to_string(), ":"),
                None => (unquoted.to_string(), ""),
            }
        }
    };

    if !quoted && key.contains(": ") {
        return Err(SchemaError::syntax(
            line.number,
            format!("scalar values are not supported (\"{key}\")"),
        ));
    }

    let has_children = match tail {
        "" => false,
        ":" => true,
        other => {
            return Err(SchemaError::syntax(
                line.number,
                format!("unexpected text after key: \"{other}\""),
            ));
        }
    };

    if key.is_empty() {
        return Err(SchemaError::syntax(line.number, "empty key"));
    }

    Ok((key, has_children))
}

fn strip_comment(text: &str) -> &str {
    match text.find(" #") {
        Some(pos) => text[..pos].trim_end(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> StructureNode {
        StructureNode::key(name)
    }

    #[test]
    fn test_flat_list() {
        let nodes = parse("- id\n- name\n").unwrap();
        assert_eq!(nodes, vec![key("id"), key("name")]);
    }

    #[test]
    fn test_nested_and_wildcard() {
        let text = r"
- orderId
- user:
    - name
    - email
- products*:
  - name
  - price
";
        let nodes = parse(text).unwrap();
        assert_eq!(
            nodes,
            vec![
                key("orderId"),
                StructureNode::nested("user", vec![key("name"), key("email")]),
                StructureNode::each("products", vec![key("name"), key("price")]),
            ]
        );
    }

    #[test]
    fn test_deep_nesting_and_dedent() {
        let text = "- a:\n  - b:\n    - c\n  - d\n- e";
        let nodes = parse(text).unwrap();
        assert_eq!(
            nodes,
            vec![
                StructureNode::nested(
                    "a",
                    vec![StructureNode::nested("b", vec![key("c")]), key("d")]
                ),
                key("e"),
            ]
        );
    }

    #[test]
    fn test_indented_document() {
        let nodes = parse("    - a\n    - b:\n        - c").unwrap();
        assert_eq!(
            nodes,
            vec![key("a"), StructureNode::nested("b", vec![key("c")])]
        );
    }

    #[test]
    fn test_comments_blank_lines_and_quotes() {
        let text = "# order schema\n\n- \"a.b\"\n- 'x: y'\n- total # grand total\n";
        let nodes = parse(text).unwrap();
        assert_eq!(nodes, vec![key("a.b"), key("x: y"), key("total")]);
    }

    #[test]
    fn test_bare_wildcard() {
        let nodes = parse("- tags*").unwrap();
        assert_eq!(nodes, vec![StructureNode::each("tags", Vec::new())]);
    }

    #[test]
    fn test_rejects_non_list() {
        assert_eq!(parse("user"), Err(SchemaError::NotAList));
        assert_eq!(parse(""), Err(SchemaError::NotAList));
        assert_eq!(parse("# only a comment"), Err(SchemaError::NotAList));
    }

    #[test]
    fn test_rejects_scalar_values() {
        let err = parse("- user: Ann").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_rejects_dangling_nested_key() {
        let err = parse("- user:\n- name").unwrap_err();
        assert_eq!(
            err,
            SchemaError::syntax(1, "expected a nested list under \"user\"")
        );
    }

    #[test]
    fn test_rejects_bad_indentation() {
        assert!(matches!(
            parse("- a:\n    - b\n  - c"),
            Err(SchemaError::Syntax { line: 3, .. })
        ));
        assert!(matches!(
            parse("- a\n  - b"),
            Err(SchemaError::Syntax { line: 2, .. })
        ));
        assert!(matches!(
            parse("  - a\n- b"),
            Err(SchemaError::Syntax { line: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_tabs_and_malformed_items() {
        assert!(matches!(
            parse("- a:\n\t- b"),
            Err(SchemaError::Syntax { line: 2, .. })
        ));
        assert!(matches!(parse("-a"), Err(SchemaError::Syntax { line: 1, .. })));
        assert!(matches!(parse("-"), Err(SchemaError::Syntax { line: 1, .. })));
        assert!(matches!(parse("- - a"), Err(SchemaError::Syntax { line: 1, .. })));
        assert!(matches!(parse("- \"open"), Err(SchemaError::Syntax { line: 1, .. })));
        assert!(matches!(parse("- \"\""), Err(SchemaError::Syntax { line: 1, .. })));
        assert!(matches!(parse("- \"a\" b"), Err(SchemaError::Syntax { line: 1, .. })));
    }
}
