//! Graph binder - populates typed objects from node trees
//!
//! Binding is a single-pass, depth-first walk driven by the destination
//! type's schema. The node is only read; on any failure the whole read is
//! aborted and nothing partially built escapes.

use std::any::{type_name, TypeId};

use tracing::{debug, instrument, warn};

use crate::binding::{registry, Bindable, Cardinality, Entry, FieldBinding};
use crate::config::{BinderConfig, MissingFieldPolicy};
use crate::error::GraphBindingError;
use crate::node::{Node, NodeId};
use crate::query;

/// Reads typed objects out of node trees
pub trait ObjectReader {
    fn read<'a, T: Bindable, N: Node<'a>>(&self, node: N) -> Result<T, GraphBindingError>;
}

/// Schema-driven [`ObjectReader`]
///
/// Holds only configuration; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct GraphBinder {
    config: BinderConfig,
}

impl GraphBinder {
    pub fn new(config: BinderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Bind `node` as a `T`
    #[instrument(skip_all, fields(type_name = type_name::<T>()))]
    pub fn read<'a, T: Bindable, N: Node<'a>>(&self, node: N) -> Result<T, GraphBindingError> {
        debug!(node = node.name(), "Binding node");
        BindContext::new(&self.config).bind::<T>(&node)
    }

    /// Bind every node `query` matches under `node` as a `T`
    #[instrument(skip_all, fields(type_name = type_name::<T>(), query = query))]
    pub fn read_all<'a, T: Bindable, N: Node<'a>>(
        &self,
        node: N,
        query: &str,
    ) -> Result<Vec<T>, GraphBindingError> {
        let matches = query::resolve(&node, query)?;
        debug!(matches = matches.len(), "Binding query matches");
        let mut ctx = BindContext::new(&self.config);
        matches.iter().map(|m| ctx.bind::<T>(&**m)).collect()
    }
}

impl ObjectReader for GraphBinder {
    fn read<'a, T: Bindable, N: Node<'a>>(&self, node: N) -> Result<T, GraphBindingError> {
        GraphBinder::read(self, node)
    }
}

/// State of one read call: config plus the (type, node) pairs being bound
pub(crate) struct BindContext<'c> {
    config: &'c BinderConfig,
    active: Vec<(TypeId, NodeId)>,
}

impl<'c> BindContext<'c> {
    pub(crate) fn new(config: &'c BinderConfig) -> Self {
        Self {
            config,
            active: Vec::new(),
        }
    }

    pub(crate) fn config(&self) -> &BinderConfig {
        self.config
    }

    /// Instantiate a `T` and populate it from `node`
    pub(crate) fn bind<'a, T: Bindable>(&mut self, node: &dyn Node<'a>) -> Result<T, GraphBindingError> {
        let type_name = type_name::<T>();
        let key = (TypeId::of::<T>(), node.id());

        if self.active.contains(&key) {
            return Err(GraphBindingError::Cycle {
                type_name,
                node: node.id(),
            });
        }
        if self.active.len() >= self.config.max_depth {
            return Err(GraphBindingError::DepthExceeded {
                type_name,
                max_depth: self.config.max_depth,
            });
        }

        let mut instance = T::instantiate().ok_or(GraphBindingError::Instantiation { type_name })?;

        self.active.push(key);
        let result = self.populate(&mut instance, node);
        self.active.pop();

        result.map(|()| instance)
    }

    /// Write every registered field of `T` into `target`
    pub(crate) fn populate<'a, T: Bindable>(
        &mut self,
        target: &mut T,
        node: &dyn Node<'a>,
    ) -> Result<(), GraphBindingError> {
        let schema = registry::schema_of::<T>()?;

        for entry in schema.entries() {
            match entry {
                Entry::Field(field) => self.bind_field(target, field, node)?,
                Entry::Flatten(flat) => (flat.apply)(target, node, self)?,
            }
        }

        Ok(())
    }

    fn bind_field<'a, T: Bindable>(
        &mut self,
        target: &mut T,
        field: &FieldBinding<T>,
        node: &dyn Node<'a>,
    ) -> Result<(), GraphBindingError> {
        let info = &field.info;
        let extracted = field.extract(node);

        if extracted.is_empty() {
            if info.cardinality == Cardinality::One {
                match self.config.missing_fields {
                    MissingFieldPolicy::Error => {
                        return Err(GraphBindingError::Unresolved {
                            type_name: type_name::<T>(),
                            field: info.name,
                            query: info.query.value().to_string(),
                            target: info.query.target().to_string(),
                        });
                    }
                    MissingFieldPolicy::KeepDefault => {
                        warn!(
                            field = info.name,
                            query = info.query.value(),
                            "Unresolved field left at its default"
                        );
                    }
                }
            }
            return Ok(());
        }

        debug!(field = info.name, matches = extracted.len(), "Resolved field");
        (field.apply)(target, extracted, self)
    }
}
