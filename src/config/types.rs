//! Application configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level application configuration, loaded from `app.yaml` at the
/// application root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name.
    #[serde(default)]
    pub name: String,

    /// Named deployment targets, keyed by environment name.
    #[serde(default)]
    pub environments: BTreeMap<String, Environment>,
}

impl AppConfig {
    /// Look up an environment by name.
    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments.get(name)
    }

    /// Environment names in deterministic (sorted) order.
    pub fn environment_names(&self) -> Vec<&str> {
        self.environments.keys().map(String::as_str).collect()
    }
}

/// A named deployment target: where the objects would be applied, and the
/// parameter overrides used when evaluating components for it.
///
/// Loaded once per invocation and read-only thereafter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Environment {
    /// API server endpoint, e.g. `https://dev.example.com:6443`.
    pub server: String,

    /// Default namespace for this environment.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Parameter overrides applied when evaluating components.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_lookup() {
        let yaml = r#"
name: guestbook
environments:
  dev:
    server: https://dev.example.com
    namespace: dev
    params:
      replicas: "1"
  prod:
    server: https://prod.example.com
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "guestbook");
        assert_eq!(config.environment_names(), vec!["dev", "prod"]);

        let dev = config.environment("dev").unwrap();
        assert_eq!(dev.server, "https://dev.example.com");
        assert_eq!(dev.namespace.as_deref(), Some("dev"));
        assert_eq!(dev.params.get("replicas").map(String::as_str), Some("1"));

        let prod = config.environment("prod").unwrap();
        assert!(prod.namespace.is_none());
        assert!(prod.params.is_empty());

        assert!(config.environment("staging").is_none());
    }
}
