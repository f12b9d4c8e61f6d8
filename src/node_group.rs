//! Node group handles returned by providers.

use std::fmt;

use crate::provider::{Instance, ProviderError};

/// Independently scalable pool of homogeneous nodes.
///
/// Implementations are lightweight handles: each call consults the provider's
/// current snapshot rather than a copy taken when the handle was created.
pub trait NodeGroup: Send + Sync + fmt::Debug {
    /// Backend pool identifier. Never empty.
    fn id(&self) -> &str;

    /// Minimum size, or `0` when the pool is no longer cached.
    fn min_size(&self) -> usize;

    /// Maximum size, or `0` when the pool is no longer cached.
    fn max_size(&self) -> usize;

    /// Node count the backend is converging on.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnknownNodeGroup`] when the pool has left the
    /// cache.
    fn target_size(&self) -> Result<usize, ProviderError>;

    /// Machines currently assigned to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnknownNodeGroup`] when the pool has left the
    /// cache.
    fn nodes(&self) -> Result<Vec<Instance>, ProviderError>;

    /// Reports whether the pool is present in the current snapshot.
    fn exist(&self) -> bool;

    /// One-line description for logs.
    fn debug(&self) -> String;

    /// Reports whether the group was created by the autoscaler itself.
    fn autoprovisioned(&self) -> bool {
        false
    }
}
