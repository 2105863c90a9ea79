//! Expanded Kubernetes resource objects.

use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Provenance of an expanded object: which component produced it and from
/// which file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSource {
    /// The component name (file stem under `components/`).
    pub component: String,
    /// The manifest file the object came from.
    pub file_path: PathBuf,
}

impl ObjectSource {
    pub fn new(component: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            component: component.into(),
            file_path: file_path.into(),
        }
    }
}

/// One expanded resource manifest, as produced by the object expander.
///
/// The payload is a generic JSON mapping rather than typed per-kind structs:
/// validation walks it against the cluster's schema tree, so any kind the
/// cluster knows about is representable. Never mutated after expansion.
#[derive(Debug, Clone)]
pub struct StructuredObject {
    /// Where this object came from.
    pub source: ObjectSource,
    /// The resource document itself.
    pub data: Value,
}

impl StructuredObject {
    pub fn new(source: ObjectSource, data: Value) -> Self {
        Self { source, data }
    }

    /// The declared `apiVersion`, if present and a string.
    pub fn api_version(&self) -> Option<&str> {
        self.data.get("apiVersion").and_then(Value::as_str)
    }

    /// The declared `kind`, if present and a string.
    pub fn kind(&self) -> Option<&str> {
        self.data.get("kind").and_then(Value::as_str)
    }

    /// `metadata.name`, if present.
    pub fn name(&self) -> Option<&str> {
        self.data
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
    }

    /// `metadata.namespace`, if present.
    pub fn namespace(&self) -> Option<&str> {
        self.data
            .get("metadata")
            .and_then(|m| m.get("namespace"))
            .and_then(Value::as_str)
    }

    /// Identity used in the report: kind plus namespace-qualified name.
    pub fn identifier(&self) -> ObjectId {
        ObjectId {
            kind: self.kind().unwrap_or("<unknown>").to_string(),
            namespace: self.namespace().map(str::to_string),
            name: self.name().unwrap_or("<unnamed>").to_string(),
        }
    }
}

/// Identifies one object in the report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ObjectId {
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {}/{}", self.kind, ns, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}
