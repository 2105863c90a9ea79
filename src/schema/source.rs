//! Fetching and caching the cluster schema.

use crate::error::DiscoveryError;
use crate::schema::definition::{SchemaIndex, SchemaNode};
use crate::schema::GroupVersionKind;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const OPENAPI_PATH: &str = "/openapi/v2";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of a per-kind schema lookup.
///
/// `UnknownKind` is non-fatal and becomes a per-object finding;
/// `Discovery` is fatal for the whole run.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The cluster's schema has no definition for this kind.
    #[error("kind {0} is not recognized by the cluster")]
    UnknownKind(GroupVersionKind),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Fetches the raw schema document for a cluster.
///
/// Credentials and transport policy live behind this boundary; the core only
/// needs the parsed JSON back.
pub trait DiscoveryClient: Send + Sync {
    fn fetch_schema(&self, server: &str) -> Result<Value, DiscoveryError>;
}

/// Discovery over HTTP: `GET {server}/openapi/v2`.
pub struct HttpDiscoveryClient {
    http: reqwest::blocking::Client,
}

impl HttpDiscoveryClient {
    /// Build a client with the default request timeout.
    pub fn new() -> Result<Self, DiscoveryError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Build a client with a caller-chosen timeout, propagated into every
    /// schema request.
    pub fn with_timeout(timeout: Duration) -> Result<Self, DiscoveryError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiscoveryError::ClientInit(e.to_string()))?;
        Ok(Self { http })
    }
}

impl DiscoveryClient for HttpDiscoveryClient {
    fn fetch_schema(&self, server: &str) -> Result<Value, DiscoveryError> {
        let url = format!("{}{}", server.trim_end_matches('/'), OPENAPI_PATH);
        log::debug!("fetching cluster schema from {}", url);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|source| DiscoveryError::Unreachable {
                server: server.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::HttpStatus {
                server: server.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().map_err(|e| DiscoveryError::Malformed {
            server: server.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Lazily fetched, process-lifetime cache of one cluster's schema.
///
/// The first lookup triggers the single underlying fetch; the fetch happens
/// under the cache lock, so concurrent first lookups block on it and reuse
/// the result. After population, lookups are a lock-and-clone of the `Arc`.
pub struct SchemaSource {
    server: String,
    client: Box<dyn DiscoveryClient>,
    cache: Mutex<Option<Arc<SchemaIndex>>>,
}

impl SchemaSource {
    pub fn new(server: impl Into<String>, client: Box<dyn DiscoveryClient>) -> Self {
        Self {
            server: server.into(),
            client,
            cache: Mutex::new(None),
        }
    }

    /// The server this source talks to.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// The parsed schema index, fetching it on first use.
    pub fn index(&self) -> Result<Arc<SchemaIndex>, DiscoveryError> {
        let mut cache = self.cache.lock();
        if let Some(index) = cache.as_ref() {
            return Ok(Arc::clone(index));
        }

        let doc = self.client.fetch_schema(&self.server)?;
        let index =
            SchemaIndex::from_swagger(&doc).ok_or_else(|| DiscoveryError::Malformed {
                server: self.server.clone(),
                reason: "document has no definitions".to_string(),
            })?;
        log::info!(
            "fetched schema from {}: {} definitions",
            self.server,
            index.len()
        );

        let index = Arc::new(index);
        *cache = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Look up the schema for one kind.
    ///
    /// This is the only place an unknown kind is detected; callers either get
    /// a usable root node or a `SchemaError::UnknownKind`.
    pub fn schema(&self, gvk: &GroupVersionKind) -> Result<KindSchema, SchemaError> {
        let index = self.index()?;
        let root = match index.for_kind(gvk) {
            Some(node) => index.resolve(node).clone(),
            None => return Err(SchemaError::UnknownKind(gvk.clone())),
        };
        Ok(KindSchema { index, root })
    }
}

/// One kind's resolved schema: the root node plus the index needed to
/// follow `$ref`s while walking it.
#[derive(Debug)]
pub struct KindSchema {
    index: Arc<SchemaIndex>,
    root: SchemaNode,
}

impl KindSchema {
    pub fn index(&self) -> &SchemaIndex {
        &self.index
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }
}
