//! Parsed schema definitions from a cluster's OpenAPI v2 document.
//!
//! The swagger document carries a flat `definitions` map. Definitions refer
//! to each other by `$ref`, and the reference graph is cyclic (a PodSpec
//! eventually references itself through nested templates), so the index
//! keeps every definition as an immutable named node and references are
//! resolved by name at validation time rather than inlined.

use crate::schema::GroupVersionKind;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const REF_PREFIX: &str = "#/definitions/";

/// Primitive/structural types a swagger property can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

/// Policy for fields not declared in a node's `properties`.
#[derive(Debug, Clone, Default)]
pub enum AdditionalProperties {
    /// Not specified: undeclared fields are findings when the node declares
    /// any properties of its own.
    #[default]
    Unspecified,
    /// Explicitly allowed (`additionalProperties: true`).
    Allowed,
    /// Explicitly denied (`additionalProperties: false`).
    Denied,
    /// Allowed, and each value must match this schema (map types).
    Schema(Box<SchemaNode>),
}

/// One node of the field-schema tree.
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    /// Declared type, if any. Nodes that only carry `$ref` have none.
    pub field_type: Option<FieldType>,
    /// Declared format, e.g. `int32` or `int-or-string`.
    pub format: Option<String>,
    /// Name of a referenced definition (`$ref`), stripped of its prefix.
    pub reference: Option<String>,
    /// Declared fields of an object node.
    pub properties: BTreeMap<String, SchemaNode>,
    /// Names of required fields.
    pub required: BTreeSet<String>,
    /// Element schema of an array node.
    pub items: Option<Box<SchemaNode>>,
    /// Undeclared-field policy.
    pub additional: AdditionalProperties,
}

impl SchemaNode {
    /// Parse one swagger schema object into a node.
    fn parse(value: &Value) -> Self {
        let mut node = SchemaNode::default();

        if let Some(t) = value.get("type").and_then(Value::as_str) {
            node.field_type = FieldType::parse(t);
        }
        if let Some(fmt) = value.get("format").and_then(Value::as_str) {
            node.format = Some(fmt.to_string());
        }
        if let Some(r) = value.get("$ref").and_then(Value::as_str) {
            node.reference = Some(r.strip_prefix(REF_PREFIX).unwrap_or(r).to_string());
        }
        if let Some(props) = value.get("properties").and_then(Value::as_object) {
            for (name, prop) in props {
                node.properties.insert(name.clone(), SchemaNode::parse(prop));
            }
        }
        if let Some(req) = value.get("required").and_then(Value::as_array) {
            node.required = req
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }
        if let Some(items) = value.get("items") {
            node.items = Some(Box::new(SchemaNode::parse(items)));
        }
        node.additional = match value.get("additionalProperties") {
            None => AdditionalProperties::Unspecified,
            Some(Value::Bool(true)) => AdditionalProperties::Allowed,
            Some(Value::Bool(false)) => AdditionalProperties::Denied,
            Some(other) => AdditionalProperties::Schema(Box::new(SchemaNode::parse(other))),
        };

        node
    }

    /// Whether the node constrains object fields at all. Nodes with no
    /// type, no properties, and no reference are treated as opaque.
    pub fn is_opaque(&self) -> bool {
        self.field_type.is_none() && self.reference.is_none() && self.properties.is_empty()
    }
}

/// All definitions fetched from one cluster, keyed by definition name, plus
/// the group/version/kind lookup table built from the
/// `x-kubernetes-group-version-kind` extension.
///
/// Immutable once built; shared across validation workers.
#[derive(Debug)]
pub struct SchemaIndex {
    definitions: HashMap<String, SchemaNode>,
    by_gvk: HashMap<GroupVersionKind, String>,
}

impl SchemaIndex {
    /// Build an index from a parsed swagger document.
    ///
    /// Returns `None` when the document has no `definitions` map at all,
    /// which callers treat as a malformed schema.
    pub fn from_swagger(doc: &Value) -> Option<Self> {
        let defs = doc.get("definitions")?.as_object()?;

        let mut definitions = HashMap::with_capacity(defs.len());
        let mut by_gvk = HashMap::new();

        for (name, def) in defs {
            if let Some(gvks) = def.get("x-kubernetes-group-version-kind").and_then(Value::as_array)
            {
                for entry in gvks {
                    let (group, version, kind) = (
                        entry.get("group").and_then(Value::as_str),
                        entry.get("version").and_then(Value::as_str),
                        entry.get("kind").and_then(Value::as_str),
                    );
                    if let (Some(g), Some(v), Some(k)) = (group, version, kind) {
                        by_gvk.insert(GroupVersionKind::new(g, v, k), name.clone());
                    }
                }
            }
            definitions.insert(name.clone(), SchemaNode::parse(def));
        }

        Some(Self {
            definitions,
            by_gvk,
        })
    }

    /// Look up a definition node by name (a `$ref` target).
    pub fn definition(&self, name: &str) -> Option<&SchemaNode> {
        self.definitions.get(name)
    }

    /// Look up the root definition for a group/version/kind.
    pub fn for_kind(&self, gvk: &GroupVersionKind) -> Option<&SchemaNode> {
        self.by_gvk.get(gvk).and_then(|name| self.definitions.get(name))
    }

    /// Resolve a node's `$ref` chain to the node that actually carries the
    /// schema. Cycles in the definition graph go through `properties` or
    /// `items`, not through bare `$ref` chains, but a visited set guards
    /// against pathological documents anyway.
    pub fn resolve<'a>(&'a self, node: &'a SchemaNode) -> &'a SchemaNode {
        let mut seen: Vec<&str> = Vec::new();
        let mut current = node;
        while let Some(name) = current.reference.as_deref() {
            if seen.contains(&name) {
                break;
            }
            seen.push(name);
            match self.definitions.get(name) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Number of definitions in the index.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
