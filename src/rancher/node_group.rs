//! Node group handle backed by the manager's cache.

use std::fmt;
use std::sync::Arc;

use crate::manager::Manager;
use crate::node_group::NodeGroup;
use crate::provider::{Instance, ProviderError};

/// Handle for one Rancher node pool.
pub struct RancherNodeGroup<M> {
    manager: Arc<M>,
    id: String,
}

impl<M: Manager> RancherNodeGroup<M> {
    /// Creates a handle for `id`. Callers pass only cached, non-empty ids.
    #[must_use]
    pub(crate) const fn new(manager: Arc<M>, id: String) -> Self {
        Self { manager, id }
    }

    fn unknown(&self) -> ProviderError {
        ProviderError::UnknownNodeGroup {
            id: self.id.clone(),
        }
    }
}

impl<M> fmt::Debug for RancherNodeGroup<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RancherNodeGroup")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<M: Manager> NodeGroup for RancherNodeGroup<M> {
    fn id(&self) -> &str {
        &self.id
    }

    fn min_size(&self) -> usize {
        self.manager
            .snapshot()
            .pool(&self.id)
            .map_or(0, |pool| pool.min_size)
    }

    fn max_size(&self) -> usize {
        self.manager
            .snapshot()
            .pool(&self.id)
            .map_or(0, |pool| pool.max_size)
    }

    fn target_size(&self) -> Result<usize, ProviderError> {
        self.manager
            .snapshot()
            .pool(&self.id)
            .map(|pool| pool.target_size)
            .ok_or_else(|| self.unknown())
    }

    fn nodes(&self) -> Result<Vec<Instance>, ProviderError> {
        let snapshot = self.manager.snapshot();
        if snapshot.pool(&self.id).is_none() {
            return Err(self.unknown());
        }
        Ok(snapshot
            .nodes_in_pool(&self.id)
            .into_iter()
            .map(|node| Instance {
                id: node.provider_id.clone().unwrap_or_else(|| node.id.clone()),
                node_name: node.node_name.clone(),
            })
            .collect())
    }

    fn exist(&self) -> bool {
        self.manager.snapshot().pool(&self.id).is_some()
    }

    fn debug(&self) -> String {
        let snapshot = self.manager.snapshot();
        match snapshot.pool(&self.id) {
            Some(pool) => format!(
                "{} ({}:{}) target={} generation={}",
                pool.id,
                pool.min_size,
                pool.max_size,
                pool.target_size,
                snapshot.generation()
            ),
            None => format!("{} (not cached)", self.id),
        }
    }
}
