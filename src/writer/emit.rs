//! Ordered YAML emitter
//!
//! `serde_yaml` always writes sequences in block style and gives no control
//! over individual nodes. The persisted manifest needs two things it cannot
//! do: an exact key order decided by the writer, and flow style (`[a, b]`)
//! for group lists. This module builds an explicit [`Node`] tree, an ordered
//! list of key/value pairs rather than a hash map, and prints it.
//!
//! Scalars are still rendered by `serde_yaml`, so quoting rules match what
//! it would produce.
//!
//! Layout follows west's own manifests: two-space indentation, with
//! sequence items indented under their key.
//!
//! ```text
//! manifest:
//!   projects:
//!     - name: cmsis
//!       groups: [hal]
//! ```

use serde_yaml::Value;

use crate::error::{Error, Result};

/// Keys whose scalar lists are written in flow style.
pub const FLOW_KEYS: &[&str] = &["groups", "group-filter"];

const INDENT: usize = 2;

/// A node in an ordered YAML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A scalar value (string, number, bool, null, tagged scalar).
    Scalar(Value),
    /// A block mapping with an explicit key order.
    Map(Vec<(Value, Node)>),
    /// A block sequence.
    Seq(Vec<Node>),
    /// A sequence of scalars written inline as `[a, b]`.
    Flow(Vec<Value>),
}

impl Node {
    pub fn string(s: impl Into<String>) -> Self {
        Node::Scalar(Value::String(s.into()))
    }

    /// Convert a YAML value, keeping mapping order and switching lists
    /// under [`FLOW_KEYS`] to flow style.
    pub fn from_value(value: &Value) -> Self {
        Self::convert(value, None)
    }

    fn convert(value: &Value, key: Option<&Value>) -> Self {
        match value {
            Value::Mapping(map) => Node::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::convert(v, Some(k))))
                    .collect(),
            ),
            Value::Sequence(items) => {
                let flow_key = key
                    .and_then(Value::as_str)
                    .is_some_and(|k| FLOW_KEYS.contains(&k));
                if flow_key && items.iter().all(is_scalar) {
                    Node::Flow(items.clone())
                } else {
                    Node::Seq(items.iter().map(|item| Self::convert(item, None)).collect())
                }
            }
            scalar => Node::Scalar(scalar.clone()),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Mapping(_) | Value::Sequence(_))
}

/// Render a tree to YAML text with a trailing newline.
pub fn to_string(root: &Node) -> Result<String> {
    let mut out = String::new();
    match root {
        Node::Map(entries) if !entries.is_empty() => write_map(&mut out, entries, 0, false)?,
        Node::Seq(items) if !items.is_empty() => write_seq(&mut out, items, 0)?,
        other => {
            out.push_str(&inline(other)?);
            out.push('\n');
        }
    }
    Ok(out)
}

/// Write mapping entries at `indent`. When `continuation` is set the first
/// key follows a `- ` already on the line.
fn write_map(
    out: &mut String,
    entries: &[(Value, Node)],
    indent: usize,
    continuation: bool,
) -> Result<()> {
    for (idx, (key, value)) in entries.iter().enumerate() {
        if !(continuation && idx == 0) {
            push_indent(out, indent);
        }
        out.push_str(&scalar(key)?);
        out.push(':');
        match value {
            Node::Map(children) if !children.is_empty() => {
                out.push('\n');
                write_map(out, children, indent + INDENT, false)?;
            }
            Node::Seq(items) if !items.is_empty() => {
                out.push('\n');
                write_seq(out, items, indent + INDENT)?;
            }
            other => {
                out.push(' ');
                out.push_str(&inline(other)?);
                out.push('\n');
            }
        }
    }
    Ok(())
}

fn write_seq(out: &mut String, items: &[Node], indent: usize) -> Result<()> {
    for item in items {
        push_indent(out, indent);
        out.push('-');
        match item {
            Node::Map(children) if !children.is_empty() => {
                out.push(' ');
                write_map(out, children, indent + INDENT, true)?;
            }
            Node::Seq(nested) if !nested.is_empty() => {
                out.push('\n');
                write_seq(out, nested, indent + INDENT)?;
            }
            other => {
                out.push(' ');
                out.push_str(&inline(other)?);
                out.push('\n');
            }
        }
    }
    Ok(())
}

/// Render a node that fits on one line: scalars, flow lists and empty
/// collections.
fn inline(node: &Node) -> Result<String> {
    match node {
        Node::Scalar(value) => scalar(value),
        Node::Flow(items) => {
            let rendered = items.iter().map(flow_scalar).collect::<Result<Vec<_>>>()?;
            Ok(format!("[{}]", rendered.join(", ")))
        }
        Node::Map(entries) if entries.is_empty() => Ok("{}".to_string()),
        Node::Seq(items) if items.is_empty() => Ok("[]".to_string()),
        _ => Err(Error::Parse {
            message: "block collection cannot be rendered inline".to_string(),
        }),
    }
}

/// Render a scalar as `serde_yaml` would, on a single line.
fn scalar(value: &Value) -> Result<String> {
    if let Value::String(s) = value {
        if s.contains('\n') || s.contains('\r') {
            // JSON strings are valid YAML double-quoted scalars.
            return serde_json::to_string(s).map_err(|e| Error::Parse {
                message: format!("cannot render string: {}", e),
            });
        }
    }

    let rendered = serde_yaml::to_string(value)?;
    let rendered = rendered.trim_end_matches('\n');
    if rendered.contains('\n') {
        return Err(Error::Parse {
            message: format!("scalar does not fit on one line: {:?}", value),
        });
    }
    Ok(rendered.to_string())
}

/// Render a scalar for use inside `[...]`, where `,[]{}` end a plain scalar.
fn flow_scalar(value: &Value) -> Result<String> {
    let rendered = scalar(value)?;
    let quoted = rendered.starts_with('\'') || rendered.starts_with('"');
    if !quoted && rendered.contains([',', '[', ']', '{', '}']) {
        return Ok(format!("'{}'", rendered.replace('\'', "''")));
    }
    Ok(rendered)
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}
