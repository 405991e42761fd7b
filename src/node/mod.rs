//! Node Module - generic tree abstraction
//!
//! The binder never sees a concrete document type. It walks trees through
//! the [`Node`] trait:
//! - `element`: owned element tree with attributes (XML-like)
//! - `json`: borrowed view over a `serde_json::Value`
//!
//! Handles are boxed trait objects tied to the lifetime of the tree they
//! point into, so a query can hand out children without cloning data.

use std::borrow::Cow;
use std::fmt;

mod element;
mod json;

pub use element::Element;
pub use json::JsonNode;

/// Owned handle to a node borrowed from a tree that lives for `'a`
pub type NodeHandle<'a> = Box<dyn Node<'a> + 'a>;

/// Identity of a node within its tree
///
/// Derived from the address of the underlying data, so it is only meaningful
/// while the tree is alive and unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn of<T: ?Sized>(data: &T) -> Self {
        Self(data as *const T as *const () as usize)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// Read-only view of one node in a hierarchical tree
pub trait Node<'a> {
    /// Element name (object key for JSON members)
    fn name(&self) -> &str;

    /// Identity within the tree
    fn id(&self) -> NodeId;

    /// Child nodes in document order
    fn children(&self) -> Vec<NodeHandle<'a>>;

    /// Named attribute value
    fn attribute(&self, name: &str) -> Option<Cow<'a, str>>;

    /// Scalar text content, if the node has any
    fn text(&self) -> Option<Cow<'a, str>>;

    /// Box a copy of this handle
    fn to_handle(&self) -> NodeHandle<'a>;
}

impl fmt::Debug for dyn Node<'_> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("id", &self.id())
            .finish()
    }
}
