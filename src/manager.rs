//! Backend-specific collaborator that owns the live connection and cache.

use std::sync::Arc;

use crate::cache::{Generation, NodeRecord, PoolRecord, Snapshot};
use crate::provider::{ProviderError, ProviderFuture};

/// Cached, periodically refreshed view of a backend's pools and nodes.
///
/// Only [`Manager::refresh`] and [`Manager::cleanup`] may talk to the
/// backend. Every other method answers from the cache and must not block.
pub trait Manager: Send + Sync {
    /// Pulls pools and nodes from the backend and installs them atomically.
    ///
    /// Returns the generation now visible to readers.
    fn refresh(&self) -> ProviderFuture<'_, Generation>;

    /// Lists pools from a single cached generation.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the cached view cannot be enumerated.
    fn list_node_groups(&self) -> Result<Vec<PoolRecord>, ProviderError>;

    /// Looks up the cached record for a Kubernetes node name.
    ///
    /// Returns `Ok(None)` when the backend does not own the node.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the cached view cannot be read.
    fn resolve_node(&self, node_name: &str) -> Result<Option<NodeRecord>, ProviderError>;

    /// Current cached generation, used by node group handles.
    fn snapshot(&self) -> Arc<Snapshot>;

    /// Releases connections and timers held by the manager.
    fn cleanup(&self) -> ProviderFuture<'_, ()>;
}
