//! Query expressions - minimal path language over [`Node`] trees
//!
//! Supports:
//! - `$.a.b.c` / `a.b.c` (child names, `$.` prefix optional)
//! - `$[0].a` (n-th child of the node, same as `*[0].a`)
//! - `a[0].b` / `a.0.b` (n-th node of the current match set)
//! - `a.*` (any child)
//! - `$`, `.` or empty (the node itself)
//!
//! Does NOT support:
//! - Filters: `a[?(@.x==1)]`
//! - Recursive descent: `a..b`
//! - Slices: `a[0:5]`

use crate::error::GraphBindingError;
use crate::node::{Node, NodeHandle};

/// A parsed query segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Children with this name
    Child(String),
    /// Any child: `*`
    Wildcard,
    /// N-th node of the current match set: `[0]`
    Index(usize),
}

fn invalid(query: &str, reason: &str) -> GraphBindingError {
    GraphBindingError::InvalidQuery {
        query: query.to_string(),
        reason: reason.to_string(),
    }
}

fn name_segment(name: &str) -> Segment {
    if name == "*" {
        Segment::Wildcard
    } else {
        Segment::Child(name.to_string())
    }
}

/// Parse a query string into segments
///
/// Examples:
/// - "$.book.title" → [Child("book"), Child("title")]
/// - "items[0].*" → [Child("items"), Index(0), Wildcard]
pub fn parse(query: &str) -> Result<Vec<Segment>, GraphBindingError> {
    let path = query.trim();
    let children;
    let path = if let Some(stripped) = path.strip_prefix("$.") {
        stripped
    } else if path.starts_with("$[") {
        children = format!("*{}", &path[1..]);
        children.as_str()
    } else if path == "$" || path == "." {
        return Ok(vec![]); // The node itself
    } else {
        path
    };

    if path.is_empty() {
        return Ok(vec![]);
    }

    let mut segments = Vec::new();

    for part in path.split('.') {
        if part.is_empty() {
            return Err(invalid(query, "empty segment"));
        }

        // Bracketed indices: name[0] or name[0][1] or just [0]
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            if !name.is_empty() {
                segments.push(name_segment(name));
            }

            let mut rest = &part[bracket_pos..];
            while !rest.is_empty() {
                let Some(inner) = rest.strip_prefix('[') else {
                    return Err(invalid(query, "unexpected text after ']'"));
                };
                let Some(close) = inner.find(']') else {
                    return Err(invalid(query, "unterminated '['"));
                };
                let index: usize = inner[..close]
                    .trim()
                    .parse()
                    .map_err(|_| invalid(query, "index must be a non-negative integer"))?;
                segments.push(Segment::Index(index));
                rest = &inner[close + 1..];
            }
        } else if part.contains(']') {
            return Err(invalid(query, "unmatched ']'"));
        } else if let Ok(index) = part.parse::<usize>() {
            // Numeric segment treated as index (e.g., "items.0")
            segments.push(Segment::Index(index));
        } else {
            segments.push(name_segment(part));
        }
    }

    Ok(segments)
}

/// Apply segments to a node, returning matches in document order
pub fn select<'a>(node: &dyn Node<'a>, segments: &[Segment]) -> Vec<NodeHandle<'a>> {
    let mut current = vec![node.to_handle()];

    for segment in segments {
        current = match segment {
            Segment::Child(name) => current
                .iter()
                .flat_map(|n| n.children())
                .filter(|c| c.name() == name.as_str())
                .collect(),
            Segment::Wildcard => current.iter().flat_map(|n| n.children()).collect(),
            Segment::Index(idx) => current.into_iter().nth(*idx).into_iter().collect(),
        };
        if current.is_empty() {
            break;
        }
    }

    current
}

/// Parse and apply a query in one step
pub fn resolve<'a>(
    node: &dyn Node<'a>,
    query: &str,
) -> Result<Vec<NodeHandle<'a>>, GraphBindingError> {
    let segments = parse(query)?;
    Ok(select(node, &segments))
}

/// Validate query syntax without evaluating it
pub fn validate(query: &str) -> Result<(), GraphBindingError> {
    parse(query)?;
    Ok(())
}
