//! Type registration - which fields a type has and how each one binds
//!
//! Destination types implement [`Bindable`] and list their fields once in
//! `describe()`. The resulting [`Schema`] is validated when it is built and
//! then cached by the registry, so a type's rules are read once per process.
//!
//! ```
//! use graphbind::{Bindable, Query, SchemaBuilder};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     age: Option<u32>,
//! }
//!
//! impl Bindable for Person {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema
//!             .field("name", "name", |p| &mut p.name)
//!             .optional("age", Query::new("age"), |p| &mut p.age);
//!     }
//! }
//! ```

use std::any::type_name;
use std::borrow::Cow;
use std::collections::HashSet;

use tracing::debug;

use crate::binder::BindContext;
use crate::error::GraphBindingError;
use crate::node::{Node, NodeHandle};
use crate::query::{self, Segment};

use super::annotation::{BindingType, Query};
use super::scalar::Scalar;

/// A type that can be populated from a node tree
pub trait Bindable: Default + 'static {
    /// Register this type's fields
    fn describe(schema: &mut SchemaBuilder<Self>);

    /// Build the empty instance fields are written into
    ///
    /// Return `None` to refuse construction; the read then fails with `BIND-001`.
    fn instantiate() -> Option<Self> {
        Some(Self::default())
    }
}

/// Boxed types bind like the type they hold (needed for recursive types)
impl<U: Bindable> Bindable for Box<U> {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema.flatten("inner", |boxed| &mut **boxed);
    }

    fn instantiate() -> Option<Self> {
        U::instantiate().map(Box::new)
    }
}

/// How many values a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one value (mandatory)
    One,
    /// `Option<_>`
    Optional,
    /// `Vec<_>`
    Many,
}

/// Whether a field holds a converted scalar or a recursively bound type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Scalar,
    Nested,
}

/// Read-only description of a registered field
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: &'static str,
    pub query: Query,
    pub cardinality: Cardinality,
    pub slot: SlotKind,
    /// Element type of the field (`u32` for `Option<u32>`)
    pub value_type: &'static str,
}

/// Raw data pulled out of a node for one field
pub(crate) enum Extracted<'a> {
    Nodes(Vec<NodeHandle<'a>>),
    Values(Vec<Cow<'a, str>>),
}

impl Extracted<'_> {
    pub(crate) fn len(&self) -> usize {
        match self {
            Extracted::Nodes(nodes) => nodes.len(),
            Extracted::Values(values) => values.len(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parsed form of a field's query
#[derive(Debug, Clone)]
enum Locator {
    Element(Vec<Segment>),
    Text(Vec<Segment>),
    Name(Vec<Segment>),
    Attribute { owner: Vec<Segment>, name: String },
}

impl Locator {
    fn compile(query: &Query) -> Result<Self, GraphBindingError> {
        let mut segments = query::parse(query.value())?;
        let locator = match query.binding() {
            BindingType::Element => Locator::Element(segments),
            BindingType::Text => Locator::Text(segments),
            BindingType::Name => Locator::Name(segments),
            BindingType::Attribute => match segments.pop() {
                Some(Segment::Child(name)) => {
                    let name = name.strip_prefix('@').unwrap_or(&name).to_string();
                    if name.is_empty() {
                        return Err(GraphBindingError::InvalidQuery {
                            query: query.value().to_string(),
                            reason: "attribute name is empty".to_string(),
                        });
                    }
                    Locator::Attribute {
                        owner: segments,
                        name,
                    }
                }
                _ => {
                    return Err(GraphBindingError::InvalidQuery {
                        query: query.value().to_string(),
                        reason: "attribute query must end with an attribute name".to_string(),
                    })
                }
            },
        };
        Ok(locator)
    }
}

pub(crate) type ApplyFn<T> = Box<
    dyn for<'a, 'c> Fn(&mut T, Extracted<'a>, &mut BindContext<'c>) -> Result<(), GraphBindingError>
        + Send
        + Sync,
>;

pub(crate) type FlattenFn<T> = Box<
    dyn for<'a, 'n, 'c> Fn(&mut T, &'n dyn Node<'a>, &mut BindContext<'c>) -> Result<(), GraphBindingError>
        + Send
        + Sync,
>;

fn apply_fn<T, F>(f: F) -> ApplyFn<T>
where
    F: for<'a, 'c> Fn(&mut T, Extracted<'a>, &mut BindContext<'c>) -> Result<(), GraphBindingError>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

fn flatten_fn<T, F>(f: F) -> FlattenFn<T>
where
    F: for<'a, 'n, 'c> Fn(&mut T, &'n dyn Node<'a>, &mut BindContext<'c>) -> Result<(), GraphBindingError>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

/// One registered field: metadata, compiled query, and the writer
pub(crate) struct FieldBinding<T> {
    pub(crate) info: FieldInfo,
    locator: Locator,
    pub(crate) apply: ApplyFn<T>,
}

impl<T> FieldBinding<T> {
    /// Evaluate the query against `node` and filter by target
    pub(crate) fn extract<'a>(&self, node: &dyn Node<'a>) -> Extracted<'a> {
        let query = &self.info.query;
        let matching = |path: &[Segment]| -> Vec<NodeHandle<'a>> {
            query::select(node, path)
                .into_iter()
                .filter(|n| query.matches_target(n.name()))
                .collect()
        };

        match &self.locator {
            Locator::Element(path) => Extracted::Nodes(matching(path)),
            Locator::Text(path) => {
                Extracted::Values(matching(path).iter().filter_map(|n| n.text()).collect())
            }
            Locator::Name(path) => Extracted::Values(
                matching(path)
                    .iter()
                    .map(|n| Cow::Owned(n.name().to_string()))
                    .collect(),
            ),
            Locator::Attribute { owner, name } => Extracted::Values(
                matching(owner)
                    .iter()
                    .filter_map(|n| n.attribute(name))
                    .collect(),
            ),
        }
    }
}

/// Component bound against the same node as its owner
pub(crate) struct Flattened<T> {
    pub(crate) name: &'static str,
    pub(crate) type_name: &'static str,
    pub(crate) apply: FlattenFn<T>,
}

pub(crate) enum Entry<T> {
    Field(FieldBinding<T>),
    Flatten(Flattened<T>),
}

/// Validated binding rules for one type
pub struct Schema<T> {
    type_name: &'static str,
    entries: Vec<Entry<T>>,
}

impl<T: Bindable> Schema<T> {
    /// Run `T::describe` and validate the result
    pub fn build() -> Result<Self, GraphBindingError> {
        let mut builder = SchemaBuilder::new();
        T::describe(&mut builder);
        builder.finish()
    }
}

impl<T> Schema<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Directly registered fields, in registration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Field(field) => Some(&field.info),
            Entry::Flatten(_) => None,
        })
    }

    /// Flattened components as (field name, component type)
    pub fn flattened(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Flatten(flat) => Some((flat.name, flat.type_name)),
            Entry::Field(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }
}

/// Collects field registrations for `T`
///
/// Registration never fails on the spot; problems are collected and the
/// first one is reported when the schema is built.
pub struct SchemaBuilder<T> {
    type_name: &'static str,
    entries: Vec<Entry<T>>,
    names: HashSet<&'static str>,
    errors: Vec<GraphBindingError>,
}

impl<T: 'static> SchemaBuilder<T> {
    fn new() -> Self {
        Self {
            type_name: type_name::<T>(),
            entries: Vec::new(),
            names: HashSet::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Result<Schema<T>, GraphBindingError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        debug!(type_name = self.type_name, entries = self.entries.len(), "Built binding schema");
        Ok(Schema {
            type_name: self.type_name,
            entries: self.entries,
        })
    }

    fn claim_name(&mut self, name: &'static str) -> bool {
        if self.names.insert(name) {
            return true;
        }
        self.errors.push(GraphBindingError::DuplicateField {
            type_name: self.type_name,
            field: name,
        });
        false
    }

    fn register(
        &mut self,
        name: &'static str,
        query: Query,
        cardinality: Cardinality,
        slot: SlotKind,
        value_type: &'static str,
        apply: ApplyFn<T>,
    ) -> &mut Self {
        if !self.claim_name(name) {
            return self;
        }
        if slot == SlotKind::Nested && query.binding() != BindingType::Element {
            self.errors.push(GraphBindingError::UnsupportedBinding {
                type_name: self.type_name,
                field: name,
                binding: query.binding(),
                reason: format!("'{}' is a nested type and binds only from elements", value_type),
            });
            return self;
        }
        match Locator::compile(&query) {
            Ok(locator) => self.entries.push(Entry::Field(FieldBinding {
                info: FieldInfo {
                    name,
                    query,
                    cardinality,
                    slot,
                    value_type,
                },
                locator,
                apply,
            })),
            Err(err) => self.errors.push(err),
        }
        self
    }

    // ─────────────────────────────────────────────────────────────
    // Scalar fields
    // ─────────────────────────────────────────────────────────────

    /// Mandatory scalar field
    pub fn field<V: Scalar + 'static>(
        &mut self,
        name: &'static str,
        query: impl Into<Query>,
        accessor: fn(&mut T) -> &mut V,
    ) -> &mut Self {
        let owner = self.type_name;
        let apply = apply_fn(move |target: &mut T, extracted, ctx| {
            if let Some(text) = first_text::<V>(extracted, owner, name)? {
                *accessor(target) = convert::<V>(&text, ctx, owner, name)?;
            }
            Ok(())
        });
        self.register(name, query.into(), Cardinality::One, SlotKind::Scalar, V::TYPE_NAME, apply)
    }

    /// `Option<V>` field: stays `None` when nothing matches
    pub fn optional<V: Scalar + 'static>(
        &mut self,
        name: &'static str,
        query: impl Into<Query>,
        accessor: fn(&mut T) -> &mut Option<V>,
    ) -> &mut Self {
        let owner = self.type_name;
        let apply = apply_fn(move |target: &mut T, extracted, ctx| {
            if let Some(text) = first_text::<V>(extracted, owner, name)? {
                *accessor(target) = Some(convert::<V>(&text, ctx, owner, name)?);
            }
            Ok(())
        });
        self.register(
            name,
            query.into(),
            Cardinality::Optional,
            SlotKind::Scalar,
            V::TYPE_NAME,
            apply,
        )
    }

    /// `Vec<V>` field: one element per match, empty when nothing matches
    pub fn list<V: Scalar + 'static>(
        &mut self,
        name: &'static str,
        query: impl Into<Query>,
        accessor: fn(&mut T) -> &mut Vec<V>,
    ) -> &mut Self {
        let owner = self.type_name;
        let apply = apply_fn(move |target: &mut T, extracted, ctx| {
            let texts = scalar_texts::<V>(extracted, owner, name)?;
            let values = texts
                .iter()
                .map(|text| convert::<V>(text, ctx, owner, name))
                .collect::<Result<Vec<_>, _>>()?;
            *accessor(target) = values;
            Ok(())
        });
        self.register(name, query.into(), Cardinality::Many, SlotKind::Scalar, V::TYPE_NAME, apply)
    }

    // ─────────────────────────────────────────────────────────────
    // Nested fields
    // ─────────────────────────────────────────────────────────────

    /// Mandatory nested field, bound recursively from the first match
    pub fn nested<U: Bindable>(
        &mut self,
        name: &'static str,
        query: impl Into<Query>,
        accessor: fn(&mut T) -> &mut U,
    ) -> &mut Self {
        let apply = apply_fn(move |target: &mut T, extracted, ctx| {
            if let Some(node) = matched_nodes(extracted).first() {
                *accessor(target) = ctx.bind::<U>(&**node)?;
            }
            Ok(())
        });
        self.register(
            name,
            query.into(),
            Cardinality::One,
            SlotKind::Nested,
            type_name::<U>(),
            apply,
        )
    }

    /// `Option<U>` nested field
    pub fn optional_nested<U: Bindable>(
        &mut self,
        name: &'static str,
        query: impl Into<Query>,
        accessor: fn(&mut T) -> &mut Option<U>,
    ) -> &mut Self {
        let apply = apply_fn(move |target: &mut T, extracted, ctx| {
            if let Some(node) = matched_nodes(extracted).first() {
                *accessor(target) = Some(ctx.bind::<U>(&**node)?);
            }
            Ok(())
        });
        self.register(
            name,
            query.into(),
            Cardinality::Optional,
            SlotKind::Nested,
            type_name::<U>(),
            apply,
        )
    }

    /// `Vec<U>` nested field: every match is bound
    pub fn nested_list<U: Bindable>(
        &mut self,
        name: &'static str,
        query: impl Into<Query>,
        accessor: fn(&mut T) -> &mut Vec<U>,
    ) -> &mut Self {
        let apply = apply_fn(move |target: &mut T, extracted, ctx| {
            let items = matched_nodes(extracted)
                .iter()
                .map(|node| ctx.bind::<U>(&**node))
                .collect::<Result<Vec<_>, _>>()?;
            *accessor(target) = items;
            Ok(())
        });
        self.register(
            name,
            query.into(),
            Cardinality::Many,
            SlotKind::Nested,
            type_name::<U>(),
            apply,
        )
    }

    /// Embedded component whose fields bind against the same node
    pub fn flatten<U: Bindable>(&mut self, name: &'static str, accessor: fn(&mut T) -> &mut U) -> &mut Self {
        if !self.claim_name(name) {
            return self;
        }
        self.entries.push(Entry::Flatten(Flattened {
            name,
            type_name: type_name::<U>(),
            apply: flatten_fn(move |target: &mut T, node, ctx| ctx.populate::<U>(accessor(target), node)),
        }));
        self
    }
}

/// Nested slots only ever receive nodes; values never pass schema validation
fn matched_nodes(extracted: Extracted<'_>) -> Vec<NodeHandle<'_>> {
    match extracted {
        Extracted::Nodes(nodes) => nodes,
        Extracted::Values(_) => Vec::new(),
    }
}

fn no_text<V: Scalar>(node: &dyn Node<'_>, owner: &'static str, field: &'static str) -> GraphBindingError {
    GraphBindingError::Conversion {
        type_name: owner,
        field,
        expected: V::TYPE_NAME,
        value: format!("<{}>", node.name()),
        reason: "node has no text content".to_string(),
    }
}

/// Text of the first match only; later matches are never inspected
fn first_text<'a, V: Scalar>(
    extracted: Extracted<'a>,
    owner: &'static str,
    field: &'static str,
) -> Result<Option<Cow<'a, str>>, GraphBindingError> {
    if extracted.len() > 1 {
        debug!(field, matches = extracted.len(), "Several matches, using the first");
    }
    match extracted {
        Extracted::Values(values) => Ok(values.into_iter().next()),
        Extracted::Nodes(nodes) => match nodes.into_iter().next() {
            Some(node) => node.text().map(Some).ok_or_else(|| no_text::<V>(&*node, owner, field)),
            None => Ok(None),
        },
    }
}

fn scalar_texts<'a, V: Scalar>(
    extracted: Extracted<'a>,
    owner: &'static str,
    field: &'static str,
) -> Result<Vec<Cow<'a, str>>, GraphBindingError> {
    match extracted {
        Extracted::Values(values) => Ok(values),
        Extracted::Nodes(nodes) => nodes
            .iter()
            .map(|node| node.text().ok_or_else(|| no_text::<V>(&**node, owner, field)))
            .collect(),
    }
}

fn convert<V: Scalar>(
    text: &str,
    ctx: &BindContext<'_>,
    owner: &'static str,
    field: &'static str,
) -> Result<V, GraphBindingError> {
    let text = if ctx.config().trim_text { text.trim() } else { text };
    V::parse_scalar(text).map_err(|reason| GraphBindingError::Conversion {
        type_name: owner,
        field,
        expected: V::TYPE_NAME,
        value: text.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Address {
        city: String,
    }

    impl Bindable for Address {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("city", "city", |a| &mut a.city);
        }
    }

    #[derive(Debug, Default)]
    struct Person {
        name: String,
        id: Option<u64>,
        tags: Vec<String>,
        home: Address,
    }

    impl Bindable for Person {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("name", "name", |p| &mut p.name)
                .optional("id", Query::attribute("@id"), |p| &mut p.id)
                .list("tags", "tags", |p| &mut p.tags)
                .nested("home", "address", |p| &mut p.home);
        }
    }

    #[test]
    fn schema_lists_fields_in_order() {
        let schema = Schema::<Person>::build().unwrap();
        let names: Vec<_> = schema.fields().map(|f| f.name).collect();
        assert_eq!(names, vec!["name", "id", "tags", "home"]);
        assert!(schema.type_name().ends_with("Person"));
    }

    #[test]
    fn field_info_records_shape() {
        let schema = Schema::<Person>::build().unwrap();
        let fields: Vec<_> = schema.fields().collect();
        assert_eq!(fields[1].cardinality, Cardinality::Optional);
        assert_eq!(fields[1].value_type, "u64");
        assert_eq!(fields[1].query.binding(), BindingType::Attribute);
        assert_eq!(fields[2].cardinality, Cardinality::Many);
        assert_eq!(fields[3].slot, SlotKind::Nested);
    }

    #[derive(Debug, Default)]
    struct Duplicate {
        a: String,
    }

    impl Bindable for Duplicate {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("a", "a", |d| &mut d.a).field("a", "b", |d| &mut d.a);
        }
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = Schema::<Duplicate>::build().err().unwrap();
        assert_eq!(err.code(), "BIND-003");
        assert_eq!(err.field(), Some("a"));
    }

    #[derive(Debug, Default)]
    struct BadQuery {
        a: String,
    }

    impl Bindable for BadQuery {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("a", "a..b", |d| &mut d.a);
        }
    }

    #[test]
    fn invalid_query_rejected() {
        let err = Schema::<BadQuery>::build().err().unwrap();
        assert_eq!(err.code(), "BIND-002");
    }

    #[derive(Debug, Default)]
    struct AttributeOnNested {
        home: Address,
    }

    impl Bindable for AttributeOnNested {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.nested("home", Query::attribute("@home"), |d| &mut d.home);
        }
    }

    #[test]
    fn nested_requires_element_binding() {
        let err = Schema::<AttributeOnNested>::build().err().unwrap();
        assert_eq!(err.code(), "BIND-004");
        assert!(err.to_string().contains("ATTRIBUTE"));
    }

    #[derive(Debug, Default)]
    struct AttributeWithoutName {
        id: String,
    }

    impl Bindable for AttributeWithoutName {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("id", Query::attribute("meta[0]"), |d| &mut d.id);
        }
    }

    #[test]
    fn attribute_query_needs_trailing_name() {
        let err = Schema::<AttributeWithoutName>::build().err().unwrap();
        assert_eq!(err.code(), "BIND-002");
        assert!(err.to_string().contains("attribute name"));
    }

    #[test]
    fn boxed_types_flatten_their_content() {
        let schema = Schema::<Box<Address>>::build().unwrap();
        assert_eq!(schema.fields().count(), 0);
        let flattened: Vec<_> = schema.flattened().collect();
        assert_eq!(flattened.len(), 1);
        assert_eq!(flattened[0].0, "inner");
    }
}
