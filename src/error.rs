//! Error types with fix suggestions
//!
//! Every failure surfaced by a `read` call is a [`GraphBindingError`].
//! Messages carry a stable `BIND-xxx` code so callers can match on them in logs.

use thiserror::Error;

use crate::binding::BindingType;
use crate::node::NodeId;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum GraphBindingError {
    // ─────────────────────────────────────────────────────────────
    // Schema errors (BIND-001 to BIND-004)
    // ─────────────────────────────────────────────────────────────
    #[error("BIND-001: Cannot instantiate '{type_name}'")]
    Instantiation { type_name: &'static str },

    #[error("BIND-002: Invalid query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error("BIND-003: Field '{field}' is registered twice on '{type_name}'")]
    DuplicateField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("BIND-004: Binding type {binding} is not supported for field '{type_name}.{field}': {reason}")]
    UnsupportedBinding {
        type_name: &'static str,
        field: &'static str,
        binding: BindingType,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // Resolution errors (BIND-010 to BIND-011)
    // ─────────────────────────────────────────────────────────────
    #[error("BIND-010: Query '{query}' (target '{target}') matched nothing for mandatory field '{type_name}.{field}'")]
    Unresolved {
        type_name: &'static str,
        field: &'static str,
        query: String,
        target: String,
    },

    #[error("BIND-011: Cannot convert '{value}' to {expected} for field '{type_name}.{field}': {reason}")]
    Conversion {
        type_name: &'static str,
        field: &'static str,
        expected: &'static str,
        value: String,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // Traversal guards (BIND-020 to BIND-021)
    // ─────────────────────────────────────────────────────────────
    #[error("BIND-020: Cycle detected: '{type_name}' is already being bound from node {node}")]
    Cycle { type_name: &'static str, node: NodeId },

    #[error("BIND-021: Nesting depth {max_depth} exceeded while binding '{type_name}'")]
    DepthExceeded {
        type_name: &'static str,
        max_depth: usize,
    },

    // ─────────────────────────────────────────────────────────────
    // Document and config loading (BIND-030 to BIND-033)
    // ─────────────────────────────────────────────────────────────
    #[error("BIND-030: JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("BIND-031: YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("BIND-032: IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("BIND-033: Invalid binder config: {reason}")]
    InvalidConfig { reason: String },
}

impl GraphBindingError {
    /// Stable error code (e.g. `BIND-010`)
    pub fn code(&self) -> &'static str {
        match self {
            GraphBindingError::Instantiation { .. } => "BIND-001",
            GraphBindingError::InvalidQuery { .. } => "BIND-002",
            GraphBindingError::DuplicateField { .. } => "BIND-003",
            GraphBindingError::UnsupportedBinding { .. } => "BIND-004",
            GraphBindingError::Unresolved { .. } => "BIND-010",
            GraphBindingError::Conversion { .. } => "BIND-011",
            GraphBindingError::Cycle { .. } => "BIND-020",
            GraphBindingError::DepthExceeded { .. } => "BIND-021",
            GraphBindingError::JsonParse(_) => "BIND-030",
            GraphBindingError::YamlParse(_) => "BIND-031",
            GraphBindingError::Io(_) => "BIND-032",
            GraphBindingError::InvalidConfig { .. } => "BIND-033",
        }
    }

    /// Field the failure is attached to, when there is one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            GraphBindingError::DuplicateField { field, .. }
            | GraphBindingError::UnsupportedBinding { field, .. }
            | GraphBindingError::Unresolved { field, .. }
            | GraphBindingError::Conversion { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Destination type the failure is attached to, when there is one
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            GraphBindingError::Instantiation { type_name }
            | GraphBindingError::DuplicateField { type_name, .. }
            | GraphBindingError::UnsupportedBinding { type_name, .. }
            | GraphBindingError::Unresolved { type_name, .. }
            | GraphBindingError::Conversion { type_name, .. }
            | GraphBindingError::Cycle { type_name, .. }
            | GraphBindingError::DepthExceeded { type_name, .. } => Some(*type_name),
            _ => None,
        }
    }
}

impl FixSuggestion for GraphBindingError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            GraphBindingError::Instantiation { .. } => {
                Some("Check the type's instantiate() hook - it refused to build an instance")
            }
            GraphBindingError::InvalidQuery { .. } => {
                Some("Use dotted paths like a.b, a[0].b, a.* or $ for the node itself")
            }
            GraphBindingError::DuplicateField { .. } => {
                Some("Register each field once in describe()")
            }
            GraphBindingError::UnsupportedBinding { .. } => {
                Some("Nested types only bind with BindingType::Element")
            }
            GraphBindingError::Unresolved { .. } => Some(
                "Check the query against the document, make the field Option<_>, or use missing_fields: keep_default",
            ),
            GraphBindingError::Conversion { .. } => {
                Some("Check the document value matches the field type")
            }
            GraphBindingError::Cycle { .. } => {
                Some("A nested field re-binds its own type from the same node - check queries like '$' or '.'")
            }
            GraphBindingError::DepthExceeded { .. } => {
                Some("Raise max_depth in BinderConfig or flatten the document")
            }
            GraphBindingError::JsonParse(_) => Some("Check JSON syntax"),
            GraphBindingError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            GraphBindingError::Io(_) => Some("Check file path and permissions"),
            GraphBindingError::InvalidConfig { .. } => Some("max_depth must be at least 1"),
        }
    }
}
