//! Application configuration loading.
//!
//! An application is a directory with an `app.yaml` at its root and a
//! `components/` directory next to it. The root is discovered by walking
//! upward from the working directory, so the command works from anywhere
//! inside the application tree.

pub mod types;

pub use types::{AppConfig, Environment};

use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

const APP_FILE_NAME: &str = "app.yaml";
const COMPONENTS_DIR: &str = "components";

/// An application rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct App {
    /// The directory containing `app.yaml`.
    pub root: PathBuf,
    /// The parsed configuration.
    pub config: AppConfig,
}

impl App {
    /// Locate and load the application whose tree contains `dir`.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let root = find_app_root(dir).ok_or_else(|| ConfigError::AppNotFound(dir.to_path_buf()))?;
        let path = root.join(APP_FILE_NAME);

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = serde_yaml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path, source })?;

        Ok(Self { root, config })
    }

    /// The directory holding this application's component manifests.
    pub fn components_dir(&self) -> PathBuf {
        self.root.join(COMPONENTS_DIR)
    }

    /// Look up an environment, failing with the configured-environments hint.
    pub fn environment(&self, name: &str) -> Result<&Environment, ConfigError> {
        self.config
            .environment(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))
    }
}

/// Walk upward from `dir` looking for a directory containing `app.yaml`.
fn find_app_root(dir: &Path) -> Option<PathBuf> {
    let mut current = Some(dir);
    while let Some(d) = current {
        if d.join(APP_FILE_NAME).is_file() {
            return Some(d.to_path_buf());
        }
        current = d.parent();
    }
    None
}
