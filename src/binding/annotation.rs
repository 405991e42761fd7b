//! Per-field binding metadata
//!
//! A [`Query`] says where a field's data lives (`value`), how to pull it out
//! (`binding`) and which matched nodes qualify (`target`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Selector that accepts any node name
pub const ANY_TARGET: &str = "*";

fn any_target() -> String {
    ANY_TARGET.to_string()
}

/// Extraction strategy for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingType {
    /// Matched nodes: bound recursively, or their text for scalars
    #[default]
    Element,
    /// Attribute named by the last query segment, read from the nodes the
    /// preceding segments match
    Attribute,
    /// Text content of the matched nodes
    Text,
    /// Names of the matched nodes
    Name,
}

impl fmt::Display for BindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BindingType::Element => "ELEMENT",
            BindingType::Attribute => "ATTRIBUTE",
            BindingType::Text => "TEXT",
            BindingType::Name => "NAME",
        };
        f.write_str(label)
    }
}

/// Binding rule attached to one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    value: String,
    #[serde(default, rename = "type")]
    binding: BindingType,
    #[serde(default = "any_target")]
    target: String,
}

impl Query {
    /// Element binding with the wildcard target
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            binding: BindingType::Element,
            target: any_target(),
        }
    }

    /// Shorthand for an attribute binding: `Query::attribute("meta.@id")`
    pub fn attribute(value: impl Into<String>) -> Self {
        Self::new(value).with_binding(BindingType::Attribute)
    }

    /// Shorthand for a text binding
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(value).with_binding(BindingType::Text)
    }

    pub fn with_binding(mut self, binding: BindingType) -> Self {
        self.binding = binding;
        self
    }

    /// Narrow matches to nodes with this name (`*` accepts any)
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn binding(&self) -> BindingType {
        self.binding
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn matches_target(&self, name: &str) -> bool {
        self.target == ANY_TARGET || self.target == name
    }
}

impl From<&str> for Query {
    fn from(value: &str) -> Self {
        Query::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_element_and_wildcard() {
        let q = Query::new("name");
        assert_eq!(q.value(), "name");
        assert_eq!(q.binding(), BindingType::Element);
        assert_eq!(q.target(), "*");
        assert!(q.matches_target("anything"));
    }

    #[test]
    fn concrete_target_narrows() {
        let q = Query::new("items.*").with_target("book");
        assert!(q.matches_target("book"));
        assert!(!q.matches_target("magazine"));
    }

    #[test]
    fn shorthands() {
        assert_eq!(Query::attribute("@id").binding(), BindingType::Attribute);
        assert_eq!(Query::text("title").binding(), BindingType::Text);
        assert_eq!(Query::from("a.b").value(), "a.b");
    }

    #[test]
    fn display_uses_upper_case() {
        assert_eq!(BindingType::Element.to_string(), "ELEMENT");
        assert_eq!(BindingType::Name.to_string(), "NAME");
    }

    #[test]
    fn deserializes_with_defaults() {
        let q: Query = serde_yaml::from_str("value: person.name\n").unwrap();
        assert_eq!(q, Query::new("person.name"));

        let q: Query = serde_yaml::from_str("value: '@id'\ntype: attribute\ntarget: book\n").unwrap();
        assert_eq!(q.binding(), BindingType::Attribute);
        assert_eq!(q.target(), "book");
    }
}
