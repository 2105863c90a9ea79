//! Cluster schema handling: fetching, indexing, and validating against the
//! OpenAPI document published by the target cluster.

pub mod definition;
pub mod source;
pub mod validator;

pub use definition::{SchemaIndex, SchemaNode};
pub use source::{DiscoveryClient, HttpDiscoveryClient, KindSchema, SchemaSource};
pub use validator::{validate, Severity, UnknownFieldPolicy, ValidationError, ValidationOptions};

use serde::Serialize;
use std::fmt;

/// The tuple identifying a Kubernetes resource type and its schema version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Build from the `apiVersion`/`kind` fields of a manifest.
    ///
    /// `apiVersion` is either `group/version` (e.g. `apps/v1`) or a bare
    /// version for the core group (e.g. `v1`).
    pub fn from_api_version(api_version: &str, kind: &str) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => Self::new(group, version, kind),
            None => Self::new("", api_version, kind),
        }
    }

    /// The `group/version` string, `version` alone for the core group.
    pub fn group_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.group_version(), self.kind)
    }
}
