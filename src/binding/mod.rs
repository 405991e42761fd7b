//! Binding Module - field metadata and per-type schemas
//!
//! - `annotation`: `Query` and `BindingType` (where a field's data lives)
//! - `scalar`: text → primitive conversions
//! - `schema`: `Bindable`, `SchemaBuilder`, `Schema`
//! - `registry`: process-wide schema cache
//!
//! Data flow:
//! ```text
//! Bindable::describe → SchemaBuilder → Schema (validated)
//!                                         ↓
//!                                 registry (cached per type)
//!                                         ↓
//!                             GraphBinder::read walks fields
//! ```

mod annotation;
pub mod registry;
mod scalar;
mod schema;

pub use annotation::{BindingType, Query, ANY_TARGET};
pub use registry::schema_of;
pub use scalar::Scalar;
pub use schema::{Bindable, Cardinality, FieldInfo, Schema, SchemaBuilder, SlotKind};

pub(crate) use schema::{Entry, FieldBinding};
