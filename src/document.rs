//! Document loading
//!
//! JSON and YAML text both land in a `serde_json::Value`, which
//! [`JsonNode`](crate::node::JsonNode) can then view as a node tree.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::GraphBindingError;

/// Parse JSON text
pub fn parse_json(text: &str) -> Result<Value, GraphBindingError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse YAML text
pub fn parse_yaml(text: &str) -> Result<Value, GraphBindingError> {
    Ok(serde_yaml::from_str(text)?)
}

/// Load a document from disk
///
/// `.json` files are parsed as JSON; anything else as YAML (a JSON superset).
pub fn load(path: impl AsRef<Path>) -> Result<Value, GraphBindingError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    debug!(path = %path.display(), json = is_json, "Loading document");
    if is_json {
        parse_json(&text)
    } else {
        parse_yaml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn yaml_and_json_agree() {
        let from_yaml = parse_yaml("name: Ada\nlangs:\n  - en\n  - fr\n").unwrap();
        let from_json = parse_json(r#"{"name": "Ada", "langs": ["en", "fr"]}"#).unwrap();
        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = parse_json("{name").unwrap_err();
        assert_eq!(err.code(), "BIND-030");
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let err = parse_yaml("a: [1, 2").unwrap_err();
        assert_eq!(err.code(), "BIND-031");
    }

    #[test]
    fn load_picks_parser_from_extension() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("doc.json");
        let yaml_path = dir.path().join("doc.yml");
        fs::write(&json_path, r#"{"a": 1}"#).unwrap();
        fs::write(&yaml_path, "a: 1\n").unwrap();

        assert_eq!(load(&json_path).unwrap(), json!({"a": 1}));
        assert_eq!(load(&yaml_path).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load("/nonexistent/graphbind/doc.yaml").unwrap_err();
        assert_eq!(err.code(), "BIND-032");
    }
}
