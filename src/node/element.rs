//! Owned element tree
//!
//! A small DOM: every element has a name, ordered attributes, optional text
//! and child elements. Built with chaining methods:
//!
//! ```
//! use graphbind::node::Element;
//!
//! let book = Element::new("book")
//!     .attr("isbn", "978-0")
//!     .child(Element::new("title").text("Dune"));
//! assert_eq!(book.children().len(), 1);
//! ```

use std::borrow::Cow;

use super::{Node, NodeHandle, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set an attribute (replaces an existing one with the same name)
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Leaf element with text only: `<name>text</name>`
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).text(text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl<'a> Node<'a> for &'a Element {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> NodeId {
        NodeId::of(*self)
    }

    fn children(&self) -> Vec<NodeHandle<'a>> {
        let element: &'a Element = *self;
        element
            .children
            .iter()
            .map(|c| Box::new(c) as NodeHandle<'a>)
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<Cow<'a, str>> {
        let element: &'a Element = *self;
        element.get_attribute(name).map(Cow::Borrowed)
    }

    fn text(&self) -> Option<Cow<'a, str>> {
        let element: &'a Element = *self;
        element.text.as_deref().map(Cow::Borrowed)
    }

    fn to_handle(&self) -> NodeHandle<'a> {
        Box::new(*self)
    }
}
