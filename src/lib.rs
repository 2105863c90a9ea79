//! # kubecheck
//!
//! A command-line tool that expands environment-parameterized Kubernetes
//! application manifests into concrete API objects and validates each
//! object's structure against the OpenAPI schema published by the target
//! cluster — before anything is applied.
//!
//! ## Pipeline
//!
//! environment + selector → [`expand::ObjectExpander`] → object sequence →
//! [`runner::ValidationRunner`] → per-object [`schema::validator`] findings
//! (via a cached [`schema::SchemaSource`]) → [`report::ValidationReport`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use kubecheck::config::App;
//! use kubecheck::expand::{JsonnetCli, ObjectExpander};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let app = App::load(Path::new("."))?;
//! let env = app.environment("dev")?.clone();
//! let evaluator = JsonnetCli::new();
//! let objects = ObjectExpander::new(&app, &evaluator).expand(&env, &[])?;
//! println!("{} objects expanded", objects.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod expand;
pub mod handlers;
pub mod object;
pub mod report;
pub mod runner;
pub mod schema;

// Re-export commonly used types and functions
pub use error::{Error, Result};
pub use object::{ObjectId, StructuredObject};
pub use report::{ValidationReport, OutputFormat};
pub use schema::{GroupVersionKind, SchemaSource};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
