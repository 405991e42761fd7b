//! Process-wide schema cache
//!
//! Schemas are built on first use and shared through `Arc`. Keyed by
//! `TypeId`; values are type-erased and downcast on lookup.

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::GraphBindingError;

use super::schema::{Bindable, Schema};

static SCHEMAS: Lazy<DashMap<TypeId, Arc<dyn Any + Send + Sync>>> = Lazy::new(DashMap::new);

/// Get the cached schema for `T`, building it on first use
///
/// A schema that fails validation is not cached; every read of that type
/// reports the same error.
pub fn schema_of<T: Bindable>() -> Result<Arc<Schema<T>>, GraphBindingError> {
    let key = TypeId::of::<T>();

    // Clone out of the map so no shard lock is held while building
    let cached = SCHEMAS.get(&key).map(|entry| Arc::clone(entry.value()));
    if let Some(schema) = cached.and_then(|any| any.downcast::<Schema<T>>().ok()) {
        return Ok(schema);
    }

    let schema = Arc::new(Schema::<T>::build()?);
    debug!(type_name = schema.type_name(), "Registered binding schema");
    SCHEMAS.insert(key, Arc::clone(&schema) as Arc<dyn Any + Send + Sync>);
    Ok(schema)
}

/// Whether a schema for `T` is already cached
pub fn is_registered<T: Bindable>() -> bool {
    SCHEMAS.contains_key(&TypeId::of::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::SchemaBuilder;

    #[derive(Debug, Default)]
    struct Cached {
        a: String,
    }

    impl Bindable for Cached {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("a", "a", |c| &mut c.a);
        }
    }

    #[derive(Debug, Default)]
    struct Broken {
        a: String,
    }

    impl Bindable for Broken {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("a", "a[", |c| &mut c.a);
        }
    }

    #[test]
    fn schema_is_built_once_and_shared() {
        let first = schema_of::<Cached>().unwrap();
        assert!(is_registered::<Cached>());
        let second = schema_of::<Cached>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_schema_is_not_cached() {
        assert!(schema_of::<Broken>().is_err());
        assert!(!is_registered::<Broken>());
        assert_eq!(schema_of::<Broken>().err().unwrap().code(), "BIND-002");
    }
}
