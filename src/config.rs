//! Binder configuration
//!
//! Controls how strict a [`GraphBinder`](crate::GraphBinder) is about:
//! - Unresolved mandatory fields
//! - Nesting depth
//! - Whitespace around scalar text

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::GraphBindingError;

/// What to do when a mandatory field's query matches nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Abort the read with `BIND-010`
    #[default]
    Error,
    /// Leave the field at its default value
    KeepDefault,
}

/// Settings for a binder instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Handling of unresolved mandatory fields
    pub missing_fields: MissingFieldPolicy,

    /// Maximum nesting depth of bound types; the root type is level 1
    pub max_depth: usize,

    /// Trim scalar text before converting it
    pub trim_text: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            missing_fields: MissingFieldPolicy::Error,
            max_depth: 64,
            trim_text: true,
        }
    }
}

impl BinderConfig {
    /// Reject anything unexpected: missing fields, deep documents, padded text
    pub fn strict() -> Self {
        Self {
            missing_fields: MissingFieldPolicy::Error,
            max_depth: 32,
            trim_text: false,
        }
    }

    /// Bind whatever is there
    pub fn lenient() -> Self {
        Self {
            missing_fields: MissingFieldPolicy::KeepDefault,
            max_depth: 128,
            trim_text: true,
        }
    }

    pub fn with_missing_fields(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_fields = policy;
        self
    }

    /// Set the depth limit (0 is raised to 1, which binds the root type only)
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn with_trim_text(mut self, trim_text: bool) -> Self {
        self.trim_text = trim_text;
        self
    }

    /// Parse configuration from YAML (missing keys take defaults)
    pub fn from_yaml(yaml: &str) -> Result<Self, GraphBindingError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values a binder cannot work with
    pub fn validate(&self) -> Result<(), GraphBindingError> {
        if self.max_depth == 0 {
            return Err(GraphBindingError::InvalidConfig {
                reason: "max_depth is 0, no type could be bound".to_string(),
            });
        }
        Ok(())
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read binder config from {:?}", path))?;
        Self::from_yaml(&yaml)
            .with_context(|| format!("Failed to parse binder config {:?}", path))
    }
}
