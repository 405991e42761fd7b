//! Borrowed node view over `serde_json::Value`
//!
//! Mapping rules:
//! - object members are children named by their key
//! - an array member expands into one child per item, each named by the key
//! - items of a bare array carry the array node's own name
//! - `null` members and items are absent
//! - attributes are the scalar members of an object
//! - text is the scalar value (strings verbatim, numbers/bools rendered)

use std::borrow::Cow;

use serde_json::Value;

use super::{Node, NodeHandle, NodeId};

/// Name given to the root of a document
pub const ROOT_NAME: &str = "$";

#[derive(Debug, Clone, Copy)]
pub struct JsonNode<'a> {
    name: &'a str,
    value: &'a Value,
}

impl<'a> JsonNode<'a> {
    /// View a document root (named `$`)
    pub fn root(value: &'a Value) -> Self {
        Self::named(ROOT_NAME, value)
    }

    pub fn named(name: &'a str, value: &'a Value) -> Self {
        Self { name, value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }
}

fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn push_member<'a>(out: &mut Vec<NodeHandle<'a>>, name: &'a str, value: &'a Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items.iter().filter(|v| !v.is_null()) {
                out.push(Box::new(JsonNode::named(name, item)));
            }
        }
        _ => out.push(Box::new(JsonNode::named(name, value))),
    }
}

impl<'a> Node<'a> for JsonNode<'a> {
    fn name(&self) -> &str {
        self.name
    }

    fn id(&self) -> NodeId {
        NodeId::of(self.value)
    }

    fn children(&self) -> Vec<NodeHandle<'a>> {
        let mut out = Vec::new();
        match self.value {
            Value::Object(map) => {
                for (key, value) in map {
                    push_member(&mut out, key.as_str(), value);
                }
            }
            Value::Array(items) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    out.push(Box::new(JsonNode::named(self.name, item)));
                }
            }
            _ => {}
        }
        out
    }

    fn attribute(&self, name: &str) -> Option<Cow<'a, str>> {
        match self.value {
            Value::Object(map) => map.get(name).and_then(scalar_text),
            _ => None,
        }
    }

    fn text(&self) -> Option<Cow<'a, str>> {
        scalar_text(self.value)
    }

    fn to_handle(&self) -> NodeHandle<'a> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(nodes: &[NodeHandle<'_>]) -> Vec<String> {
        nodes.iter().map(|n| n.name().to_string()).collect()
    }

    #[test]
    fn object_members_become_children_in_order() {
        let doc = json!({"name": "Ada", "born": 1815, "alive": false});
        let root = JsonNode::root(&doc);
        let children = root.children();
        assert_eq!(names(&children), vec!["name", "born", "alive"]);
        assert_eq!(children[1].text().as_deref(), Some("1815"));
        assert_eq!(children[2].text().as_deref(), Some("false"));
    }

    #[test]
    fn array_members_expand_to_repeated_children() {
        let doc = json!({"tags": ["a", "b", null, "c"]});
        let root = JsonNode::root(&doc);
        let children = root.children();
        assert_eq!(names(&children), vec!["tags", "tags", "tags"]);
        assert_eq!(children[2].text().as_deref(), Some("c"));
    }

    #[test]
    fn null_members_are_absent() {
        let doc = json!({"a": null, "b": 1});
        let root = JsonNode::root(&doc);
        assert_eq!(names(&root.children()), vec!["b"]);
    }

    #[test]
    fn bare_array_items_keep_parent_name() {
        let doc = json!([1, 2]);
        let root = JsonNode::named("row", &doc);
        assert_eq!(names(&root.children()), vec!["row", "row"]);
    }

    #[test]
    fn scalar_members_are_attributes() {
        let doc = json!({"id": 7, "meta": {"x": 1}});
        let root = JsonNode::root(&doc);
        assert_eq!(root.attribute("id").as_deref(), Some("7"));
        assert_eq!(root.attribute("meta"), None);
        assert_eq!(root.attribute("missing"), None);
    }

    #[test]
    fn containers_have_no_text() {
        let doc = json!({"a": [1]});
        assert_eq!(JsonNode::root(&doc).text(), None);
    }
}
