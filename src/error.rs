//! Error types for kubecheck.
//!
//! Fatal failures (configuration, expansion, discovery) are modeled here as
//! `Err` values and abort the run. Per-object schema findings are *not*
//! errors in this sense: they are data, collected into the validation
//! report (see [`crate::report`]).

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or interpreting the application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `app.yaml` was found at (or above) the given root.
    #[error("no app.yaml found under {0}")]
    AppNotFound(PathBuf),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The requested environment is not configured.
    #[error("environment '{0}' is not defined; run `kubecheck env list` to see available environments")]
    UnknownEnvironment(String),
}

/// Errors from expanding components into concrete objects.
///
/// Expansion is all-or-nothing: any of these aborts the run before
/// validation starts.
#[derive(Debug, Error)]
pub enum ExpansionError {
    /// A component named in the selector does not exist.
    #[error("component '{0}' not found in the components directory")]
    UnknownComponent(String),

    /// The components directory itself is missing or unreadable.
    #[error("cannot read components directory {path}: {reason}")]
    ComponentRoot { path: PathBuf, reason: String },

    /// Evaluating or parsing a component failed.
    #[error("component '{component}': {reason}")]
    Evaluate { component: String, reason: String },
}

/// Errors from fetching or decoding the cluster's schema document.
///
/// There is no partial schema to validate against, so any of these is
/// fatal for the whole run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The HTTP client could not be constructed.
    #[error("failed to initialize discovery client: {0}")]
    ClientInit(String),

    /// The discovery endpoint could not be reached.
    #[error("failed to reach {server}: {source}")]
    Unreachable {
        server: String,
        #[source]
        source: reqwest::Error,
    },

    /// The discovery endpoint answered with a non-success status.
    #[error("schema request to {server} returned HTTP {status}")]
    HttpStatus { server: String, status: u16 },

    /// The schema document could not be decoded.
    #[error("malformed schema document from {server}: {reason}")]
    Malformed { server: String, reason: String },
}

/// Top-level error for the kubecheck CLI.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for kubecheck operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_fatal_messages_identify_failing_input() {
        let err = ConfigError::AppNotFound(Path::new("/work/guestbook").into());
        assert!(err.to_string().contains("app.yaml"));
        assert!(err.to_string().contains("/work/guestbook"));

        let err = ConfigError::UnknownEnvironment("staging".to_string());
        assert!(err.to_string().contains("staging"));
        assert!(err.to_string().contains("env list"));

        let err = ExpansionError::Evaluate {
            component: "redis".to_string(),
            reason: "bad yaml".to_string(),
        };
        assert!(err.to_string().contains("redis"));

        let err = DiscoveryError::HttpStatus {
            server: "https://dev.example.com".to_string(),
            status: 503,
        };
        assert!(err.to_string().contains("https://dev.example.com"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_umbrella_conversions() {
        let err: Error = ConfigError::UnknownEnvironment("dev".to_string()).into();
        assert!(matches!(err, Error::Config(_)));

        let err: Error = ExpansionError::UnknownComponent("web".to_string()).into();
        assert!(matches!(err, Error::Expansion(_)));

        let err: Error = DiscoveryError::ClientInit("no TLS backend".to_string()).into();
        assert!(matches!(err, Error::Discovery(_)));
    }
}
