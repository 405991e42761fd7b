//! graphbind - query-driven binding of node trees into typed objects
//!
//! ```
//! use graphbind::{Bindable, GraphBinder, JsonNode, SchemaBuilder};
//! use serde_json::json;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//! }
//!
//! impl Bindable for Person {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema.field("name", "name", |p| &mut p.name);
//!     }
//! }
//!
//! let doc = json!({"name": "Ada"});
//! let person: Person = GraphBinder::default().read(JsonNode::root(&doc)).unwrap();
//! assert_eq!(person.name, "Ada");
//! ```

pub mod binder;
pub mod binding;
pub mod config;
pub mod document;
pub mod error;
pub mod node;
pub mod query;

pub use binder::{GraphBinder, ObjectReader};
pub use binding::{
    Bindable, BindingType, Cardinality, FieldInfo, Query, Scalar, Schema, SchemaBuilder, SlotKind,
};
pub use config::{BinderConfig, MissingFieldPolicy};
pub use error::{FixSuggestion, GraphBindingError};
pub use node::{Element, JsonNode, Node, NodeHandle, NodeId};
