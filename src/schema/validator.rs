//! Recursive validation of one object against the cluster schema.
//!
//! The walk collects every problem it finds rather than stopping at the
//! first, so one run reports everything there is to fix.

use crate::error::DiscoveryError;
use crate::object::StructuredObject;
use crate::schema::definition::{AdditionalProperties, FieldType, SchemaIndex, SchemaNode};
use crate::schema::source::{SchemaError, SchemaSource};
use crate::schema::GroupVersionKind;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

const INT_OR_STRING_FORMAT: &str = "int-or-string";

/// Severity of a validation finding.
///
/// `Error` fails the run; `Warning` is reported but does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How to treat fields the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Report as an error.
    Error,
    /// Report as a warning.
    #[default]
    Warn,
    /// Do not report.
    Ignore,
}

/// Knobs for the validation walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    pub unknown_fields: UnknownFieldPolicy,
}

/// One finding against one object.
///
/// `path` addresses the offending field within the object (`spec.replicas`,
/// `spec.ports[0].port`); the empty path means the object as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationError {
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] {}", self.severity, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.severity, self.path, self.message)
        }
    }
}

/// Validate one object against the cluster schema.
///
/// An empty vec means the object is schema-valid. Discovery failures are
/// fatal and surface as `Err`; everything else is a finding.
pub fn validate(
    object: &StructuredObject,
    source: &SchemaSource,
    options: &ValidationOptions,
) -> Result<Vec<ValidationError>, DiscoveryError> {
    let (api_version, kind) = match (object.api_version(), object.kind()) {
        (Some(av), Some(k)) => (av, k),
        (None, Some(_)) => {
            return Ok(vec![ValidationError::error("", "object has no apiVersion")]);
        }
        (Some(_), None) => {
            return Ok(vec![ValidationError::error("", "object has no kind")]);
        }
        (None, None) => {
            return Ok(vec![ValidationError::error(
                "",
                "object has neither apiVersion nor kind",
            )]);
        }
    };

    let gvk = GroupVersionKind::from_api_version(api_version, kind);
    let schema = match source.schema(&gvk) {
        Ok(schema) => schema,
        Err(SchemaError::UnknownKind(gvk)) => {
            return Ok(vec![ValidationError::error(
                "",
                format!("{} is not recognized by the cluster", gvk),
            )]);
        }
        Err(SchemaError::Discovery(err)) => return Err(err),
    };

    let mut errors = Vec::new();
    walk(schema.index(), schema.root(), &object.data, "", options, &mut errors);
    Ok(errors)
}

fn join_path(base: &str, field: &str) -> String {
    if base.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", base, field)
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Recursively check `value` against `node`, appending findings to `out`.
///
/// `node` must already be `$ref`-resolved.
fn walk(
    index: &SchemaIndex,
    node: &SchemaNode,
    value: &Value,
    path: &str,
    options: &ValidationOptions,
    out: &mut Vec<ValidationError>,
) {
    // Null is indistinguishable from an absent field for the API server.
    if value.is_null() {
        return;
    }
    if node.is_opaque() {
        return;
    }

    // Untyped nodes that still declare properties behave as objects.
    let declared = node.field_type.or_else(|| {
        if !node.properties.is_empty() {
            Some(FieldType::Object)
        } else if node.items.is_some() {
            Some(FieldType::Array)
        } else {
            None
        }
    });

    let Some(declared) = declared else {
        return;
    };

    match declared {
        FieldType::Object => walk_object(index, node, value, path, options, out),
        FieldType::Array => walk_array(index, node, value, path, options, out),
        FieldType::String => {
            let int_or_string = node.format.as_deref() == Some(INT_OR_STRING_FORMAT);
            let ok = value.is_string() || (int_or_string && value.is_number());
            if !ok {
                out.push(type_mismatch(path, "string", value));
            }
        }
        FieldType::Boolean => {
            if !value.is_boolean() {
                out.push(type_mismatch(path, "boolean", value));
            }
        }
        FieldType::Integer => match value.as_f64() {
            Some(n) if n.fract() == 0.0 => {}
            Some(_) => out.push(ValidationError::error(
                path,
                "expected integer, found fractional number",
            )),
            None => out.push(type_mismatch(path, "integer", value)),
        },
        FieldType::Number => {
            if !value.is_number() {
                out.push(type_mismatch(path, "number", value));
            }
        }
    }
}

fn type_mismatch(path: &str, expected: &str, found: &Value) -> ValidationError {
    ValidationError::error(
        path,
        format!("expected {}, found {}", expected, shape_name(found)),
    )
}

fn walk_object(
    index: &SchemaIndex,
    node: &SchemaNode,
    value: &Value,
    path: &str,
    options: &ValidationOptions,
    out: &mut Vec<ValidationError>,
) {
    let Some(map) = value.as_object() else {
        out.push(type_mismatch(path, "object", value));
        return;
    };

    for required in &node.required {
        let missing = match map.get(required) {
            None => true,
            Some(v) => v.is_null(),
        };
        if missing {
            out.push(ValidationError::error(
                join_path(path, required),
                format!("missing required field '{}'", required),
            ));
        }
    }

    for (field, field_value) in map {
        let field_path = join_path(path, field);
        if let Some(child) = node.properties.get(field) {
            let child = index.resolve(child);
            walk(index, child, field_value, &field_path, options, out);
            continue;
        }

        match &node.additional {
            AdditionalProperties::Schema(child) => {
                let child = index.resolve(child);
                walk(index, child, field_value, &field_path, options, out);
            }
            AdditionalProperties::Allowed => {}
            AdditionalProperties::Denied | AdditionalProperties::Unspecified => {
                // Pure map types declare no properties; only nodes that do
                // declare fields can tell a typo from a map entry.
                let map_like = node.properties.is_empty()
                    && matches!(node.additional, AdditionalProperties::Unspecified);
                if map_like {
                    continue;
                }
                let finding = match options.unknown_fields {
                    UnknownFieldPolicy::Error => {
                        ValidationError::error(&field_path, format!("unknown field '{}'", field))
                    }
                    UnknownFieldPolicy::Warn => {
                        ValidationError::warning(&field_path, format!("unknown field '{}'", field))
                    }
                    UnknownFieldPolicy::Ignore => continue,
                };
                out.push(finding);
            }
        }
    }
}

fn walk_array(
    index: &SchemaIndex,
    node: &SchemaNode,
    value: &Value,
    path: &str,
    options: &ValidationOptions,
    out: &mut Vec<ValidationError>,
) {
    let Some(items) = value.as_array() else {
        out.push(type_mismatch(path, "array", value));
        return;
    };

    let Some(element_schema) = node.items.as_deref() else {
        return;
    };
    let element_schema = index.resolve(element_schema);

    for (i, element) in items.iter().enumerate() {
        let element_path = format!("{}[{}]", path, i);
        walk(index, element_schema, element, &element_path, options, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectSource;
    use crate::schema::source::tests::MockDiscovery;
    use serde_json::json;

    fn swagger() -> Value {
        json!({
            "definitions": {
                "io.k8s.api.apps.v1.Deployment": {
                    "type": "object",
                    "properties": {
                        "apiVersion": {"type": "string"},
                        "kind": {"type": "string"},
                        "metadata": {"$ref": "#/definitions/io.k8s.meta.v1.ObjectMeta"},
                        "spec": {"$ref": "#/definitions/io.k8s.api.apps.v1.DeploymentSpec"}
                    },
                    "x-kubernetes-group-version-kind": [
                        {"group": "apps", "version": "v1", "kind": "Deployment"}
                    ]
                },
                "io.k8s.api.apps.v1.DeploymentSpec": {
                    "type": "object",
                    "required": ["selector", "template"],
                    "properties": {
                        "replicas": {"type": "integer", "format": "int32"},
                        "paused": {"type": "boolean"},
                        "selector": {"type": "object", "additionalProperties": true},
                        "template": {"type": "object", "additionalProperties": true}
                    }
                },
                "io.k8s.meta.v1.ObjectMeta": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "namespace": {"type": "string"},
                        "labels": {"type": "object", "additionalProperties": {"type": "string"}}
                    }
                },
                "io.k8s.api.core.v1.Service": {
                    "type": "object",
                    "properties": {
                        "apiVersion": {"type": "string"},
                        "kind": {"type": "string"},
                        "metadata": {"$ref": "#/definitions/io.k8s.meta.v1.ObjectMeta"},
                        "spec": {"$ref": "#/definitions/io.k8s.api.core.v1.ServiceSpec"}
                    },
                    "x-kubernetes-group-version-kind": [
                        {"group": "", "version": "v1", "kind": "Service"}
                    ]
                },
                "io.k8s.api.core.v1.ServiceSpec": {
                    "type": "object",
                    "required": ["ports"],
                    "properties": {
                        "ports": {
                            "type": "array",
                            "items": {"$ref": "#/definitions/io.k8s.api.core.v1.ServicePort"}
                        },
                        "selector": {"type": "object", "additionalProperties": {"type": "string"}}
                    }
                },
                "io.k8s.api.core.v1.ServicePort": {
                    "type": "object",
                    "required": ["port"],
                    "properties": {
                        "port": {"type": "integer", "format": "int32"},
                        "targetPort": {"type": "string", "format": "int-or-string"},
                        "name": {"type": "string"}
                    }
                }
            }
        })
    }

    fn source() -> SchemaSource {
        SchemaSource::new("https://example.com", Box::new(MockDiscovery::new(swagger())))
    }

    fn object(data: Value) -> StructuredObject {
        StructuredObject::new(ObjectSource::new("test", "components/test.yaml"), data)
    }

    fn validate_obj(data: Value) -> Vec<ValidationError> {
        validate(&object(data), &source(), &ValidationOptions::default()).unwrap()
    }

    #[test]
    fn test_valid_deployment_has_no_errors() {
        let errors = validate_obj(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web", "labels": {"app": "web"}},
            "spec": {
                "replicas": 3,
                "selector": {"matchLabels": {"app": "web"}},
                "template": {}
            }
        }));
        assert!(errors.is_empty(), "unexpected: {:?}", errors);
    }

    #[test]
    fn test_missing_type_fields() {
        let errors = validate_obj(json!({"metadata": {"name": "x"}}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "");
        assert!(errors[0].message.contains("neither apiVersion nor kind"));

        let errors = validate_obj(json!({"kind": "Deployment"}));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("no apiVersion"));
    }

    #[test]
    fn test_unknown_kind_single_error() {
        let errors = validate_obj(json!({
            "apiVersion": "example.com/v1",
            "kind": "FluxCapacitor",
            "metadata": {"name": "x"}
        }));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity, Severity::Error);
        assert!(errors[0].message.contains("not recognized"));
    }

    #[test]
    fn test_missing_required_field_exact_path() {
        let errors = validate_obj(json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": {"name": "web"},
            "spec": {"selector": {"app": "web"}}
        }));
        assert_eq!(errors.len(), 1, "got: {:?}", errors);
        assert_eq!(errors[0].path, "spec.ports");
        assert_eq!(errors[0].severity, Severity::Error);
    }

    #[test]
    fn test_type_mismatches_do_not_short_circuit() {
        // Three independent problems, three findings.
        let errors = validate_obj(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": 42},
            "spec": {
                "replicas": "three",
                "paused": "yes",
                "selector": {},
                "template": {}
            }
        }));
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(errors.len(), 3, "got: {:?}", errors);
        assert!(paths.contains(&"metadata.name"));
        assert!(paths.contains(&"spec.replicas"));
        assert!(paths.contains(&"spec.paused"));
    }

    #[test]
    fn test_integer_accepts_whole_float_rejects_fractional() {
        let errors = validate_obj(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web"},
            "spec": {"replicas": 3.0, "selector": {}, "template": {}}
        }));
        assert!(errors.is_empty(), "whole float should pass: {:?}", errors);

        let errors = validate_obj(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web"},
            "spec": {"replicas": 2.5, "selector": {}, "template": {}}
        }));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "spec.replicas");
        assert!(errors[0].message.contains("fractional"));
    }

    #[test]
    fn test_sequence_elements_validated_with_index_path() {
        let errors = validate_obj(json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": {"name": "web"},
            "spec": {
                "ports": [
                    {"port": 80, "targetPort": 8080},
                    {"name": "https"}
                ]
            }
        }));
        assert_eq!(errors.len(), 1, "got: {:?}", errors);
        assert_eq!(errors[0].path, "spec.ports[1].port");
        assert!(errors[0].message.contains("required"));
    }

    #[test]
    fn test_int_or_string_accepts_both() {
        let errors = validate_obj(json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": {"name": "web"},
            "spec": {"ports": [{"port": 80, "targetPort": "http"}]}
        }));
        assert!(errors.is_empty(), "got: {:?}", errors);
    }

    #[test]
    fn test_unknown_field_policy() {
        let data = json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web"},
            "spec": {"replcas": 3, "selector": {}, "template": {}}
        });

        // Default: warning.
        let errors = validate_obj(data.clone());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "spec.replcas");
        assert_eq!(errors[0].severity, Severity::Warning);

        // Hard error.
        let opts = ValidationOptions {
            unknown_fields: UnknownFieldPolicy::Error,
        };
        let errors = validate(&object(data.clone()), &source(), &opts).unwrap();
        assert_eq!(errors[0].severity, Severity::Error);

        // Ignored.
        let opts = ValidationOptions {
            unknown_fields: UnknownFieldPolicy::Ignore,
        };
        let errors = validate(&object(data), &source(), &opts).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_map_values_checked_against_value_schema() {
        let errors = validate_obj(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web", "labels": {"app": "web", "tier": 2}},
            "spec": {"selector": {}, "template": {}}
        }));
        assert_eq!(errors.len(), 1, "got: {:?}", errors);
        assert_eq!(errors[0].path, "metadata.labels.tier");
        assert!(errors[0].message.contains("expected string"));
    }

    #[test]
    fn test_null_treated_as_absent() {
        let errors = validate_obj(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web"},
            "spec": {"replicas": null, "selector": {}, "template": {}}
        }));
        assert!(errors.is_empty(), "got: {:?}", errors);
    }
}
