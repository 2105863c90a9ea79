//! The object expander: from (environment, selector) to a concrete,
//! ordered sequence of resource objects.
//!
//! Components live under `<app root>/components/`. A component is one file
//! (`.yaml`, `.yml`, `.json`, or `.jsonnet`); its name is the path relative
//! to the components directory without the extension, so `backend/db.yaml`
//! is the component `backend/db`. Expansion is all-or-nothing: the first
//! failing component aborts the run with no partial object list.

pub mod evaluator;

pub use evaluator::{Evaluator, EvaluatorError, JsonnetCli};

use crate::config::{App, Environment};
use crate::error::ExpansionError;
use crate::object::{ObjectSource, StructuredObject};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const COMPONENT_EXTENSIONS: &[&str] = &["yaml", "yml", "json", "jsonnet"];

/// One manifest source found under the components directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Component {
    name: String,
    path: PathBuf,
}

/// Expands an application's components for one environment.
pub struct ObjectExpander<'a> {
    app: &'a App,
    evaluator: &'a dyn Evaluator,
}

impl<'a> ObjectExpander<'a> {
    pub fn new(app: &'a App, evaluator: &'a dyn Evaluator) -> Self {
        Self { app, evaluator }
    }

    /// Expand the selected components with the environment's parameters.
    ///
    /// An empty selector means all components. Output order is
    /// lexicographic by component path, with per-component internal order
    /// preserved, so repeated runs produce identical sequences.
    pub fn expand(
        &self,
        env: &Environment,
        selector: &[String],
    ) -> Result<Vec<StructuredObject>, ExpansionError> {
        let all = discover_components(&self.app.components_dir())?;

        // Fail fast on unknown names before any evaluation happens.
        let selected = if selector.is_empty() {
            all
        } else {
            let known: BTreeSet<&str> = all.iter().map(|c| c.name.as_str()).collect();
            for name in selector {
                if !known.contains(name.as_str()) {
                    return Err(ExpansionError::UnknownComponent(name.clone()));
                }
            }
            let wanted: BTreeSet<&str> = selector.iter().map(String::as_str).collect();
            all.into_iter()
                .filter(|c| wanted.contains(c.name.as_str()))
                .collect()
        };

        let mut objects = Vec::new();
        for component in &selected {
            let documents = self.evaluate_component(component, env)?;
            for doc in documents {
                flatten(doc, component, &mut objects);
            }
            log::debug!("component '{}' expanded", component.name);
        }

        log::info!(
            "expanded {} object(s) from {} component(s)",
            objects.len(),
            selected.len()
        );
        Ok(objects)
    }

    /// Evaluate one component into raw documents.
    fn evaluate_component(
        &self,
        component: &Component,
        env: &Environment,
    ) -> Result<Vec<Value>, ExpansionError> {
        let wrap = |reason: String| ExpansionError::Evaluate {
            component: component.name.clone(),
            reason,
        };

        match extension(&component.path) {
            "yaml" | "yml" => {
                let content =
                    fs::read_to_string(&component.path).map_err(|e| wrap(e.to_string()))?;
                parse_yaml_documents(&content).map_err(wrap)
            }
            "json" => {
                let content =
                    fs::read_to_string(&component.path).map_err(|e| wrap(e.to_string()))?;
                let doc = serde_json::from_str(&content).map_err(|e| wrap(e.to_string()))?;
                Ok(vec![doc])
            }
            "jsonnet" => {
                let doc = self
                    .evaluator
                    .evaluate(&component.path, &env.params)
                    .map_err(|e| wrap(e.to_string()))?;
                Ok(vec![doc])
            }
            other => Err(wrap(format!("unsupported component type '{}'", other))),
        }
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

/// Find every component file, sorted lexicographically by path.
fn discover_components(dir: &Path) -> Result<Vec<Component>, ExpansionError> {
    if !dir.is_dir() {
        return Err(ExpansionError::ComponentRoot {
            path: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let mut components = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|e| ExpansionError::ComponentRoot {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if !path.is_file() || !COMPONENT_EXTENSIONS.contains(&extension(path)) {
            continue;
        }

        let relative = path.strip_prefix(dir).unwrap_or(path);
        let name = relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        components.push(Component {
            name,
            path: path.to_path_buf(),
        });
    }

    components.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(components)
}

/// Parse a multi-document YAML string into JSON values.
fn parse_yaml_documents(content: &str) -> Result<Vec<Value>, String> {
    let mut documents = Vec::new();
    for doc in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(doc).map_err(|e| e.to_string())?;
        documents.push(value);
    }
    Ok(documents)
}

/// Flatten one evaluated document into concrete objects.
///
/// Arrays and `*List` kinds contribute their elements in order; null and
/// empty documents contribute nothing.
fn flatten(doc: Value, component: &Component, out: &mut Vec<StructuredObject>) {
    match doc {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                flatten(item, component, out);
            }
        }
        Value::Object(mut map) => {
            let is_list = map
                .get("kind")
                .and_then(Value::as_str)
                .is_some_and(|k| k.ends_with("List"))
                && map.contains_key("items");
            if is_list {
                if let Some(Value::Array(items)) = map.remove("items") {
                    for item in items {
                        flatten(item, component, out);
                    }
                }
                return;
            }
            if map.is_empty() {
                return;
            }
            let source = ObjectSource::new(component.name.clone(), component.path.clone());
            out.push(StructuredObject::new(source, Value::Object(map)));
        }
        // Scalar documents pass through so the validator reports them.
        other => {
            let source = ObjectSource::new(component.name.clone(), component.path.clone());
            out.push(StructuredObject::new(source, other));
        }
    }
}
