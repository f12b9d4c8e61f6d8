//! Cache-owning manager for Rancher node pools.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::client::{NodePool, RancherClient, RancherNode};
use crate::cache::{Generation, NodeRecord, PoolRecord, Snapshot, SnapshotCache};
use crate::config::RancherConfig;
use crate::manager::Manager;
use crate::options::NodeGroupSpec;
use crate::provider::{Operation, ProviderError, ProviderFuture};

/// Manager that mirrors a Rancher cluster's node pools into a
/// [`SnapshotCache`].
#[derive(Debug)]
pub struct RancherManager<C: RancherClient> {
    client: C,
    cluster_id: String,
    specs: Vec<NodeGroupSpec>,
    cache: SnapshotCache,
    refresh_timeout: Duration,
    cleanup_timeout: Duration,
    closed: AtomicBool,
}

impl<C: RancherClient> RancherManager<C> {
    /// Creates a manager for the configured cluster.
    ///
    /// When `specs` is non-empty only the listed pools are managed and their
    /// bounds come from the specs; otherwise every pool that carries its own
    /// bounds is managed.
    #[must_use]
    pub fn new(client: C, config: &RancherConfig, specs: Vec<NodeGroupSpec>) -> Self {
        Self {
            client,
            cluster_id: config.cluster_id.trim().to_owned(),
            specs,
            cache: SnapshotCache::new(),
            refresh_timeout: config.refresh_timeout(),
            cleanup_timeout: config.cleanup_timeout(),
            closed: AtomicBool::new(false),
        }
    }

    /// Cluster whose pools are mirrored.
    #[must_use]
    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    async fn fetch(&self) -> Result<(Vec<NodePool>, Vec<RancherNode>), C::Error> {
        tokio::try_join!(
            self.client.list_node_pools(&self.cluster_id),
            self.client.list_nodes(&self.cluster_id)
        )
    }

    fn pool_records(&self, pools: Vec<NodePool>) -> Vec<PoolRecord> {
        if self.specs.is_empty() {
            return pools.into_iter().filter_map(bounded_pool).collect();
        }

        self.specs
            .iter()
            .filter_map(|spec| {
                let Some(pool) = pools.iter().find(|pool| pool.id == spec.id) else {
                    warn!(pool = %spec.id, "configured node group not found in Rancher");
                    return None;
                };
                Some(PoolRecord {
                    id: pool.id.clone(),
                    name: pool.name.clone(),
                    min_size: spec.min_size,
                    max_size: spec.max_size,
                    target_size: pool.quantity,
                })
            })
            .collect()
    }

    fn node_records(pools: &[PoolRecord], nodes: Vec<RancherNode>) -> Vec<NodeRecord> {
        let managed = pools
            .iter()
            .map(|pool| pool.id.as_str())
            .collect::<BTreeSet<_>>();
        let mut seen = BTreeSet::new();
        let mut records = Vec::with_capacity(nodes.len());
        for node in nodes {
            // Nodes without a pool stay cached so lookups report them.
            if !node.node_pool_id.is_empty() && !managed.contains(node.node_pool_id.as_str()) {
                continue;
            }
            if !seen.insert(node.node_name.clone()) {
                warn!(node = %node.node_name, id = %node.id, "duplicate node name; keeping the later record");
            }
            records.push(NodeRecord {
                id: node.id,
                node_name: node.node_name,
                pool_id: node.node_pool_id,
                provider_id: node.provider_id,
            });
        }
        records
    }

    async fn refresh_inner(&self) -> Result<Generation, ProviderError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ProviderError::Refresh {
                message: String::from("manager has been cleaned up"),
            });
        }

        let (pools, nodes) = timeout(self.refresh_timeout, self.fetch())
            .await
            .map_err(|_| ProviderError::Timeout {
                operation: Operation::Refresh,
                after: self.refresh_timeout,
            })?
            .map_err(|err| ProviderError::Refresh {
                message: err.to_string(),
            })?;

        let pool_records = self.pool_records(pools);
        let node_records = Self::node_records(&pool_records, nodes);
        let pool_count = pool_records.len();
        let node_count = node_records.len();

        if self.closed.load(Ordering::SeqCst) {
            return Err(ProviderError::Refresh {
                message: String::from("manager was cleaned up during refresh"),
            });
        }

        let previous = self.cache.generation();
        let generation = self.cache.install(pool_records, node_records);
        if generation == previous {
            debug!(%generation, "Rancher state unchanged");
        } else {
            info!(
                cluster = %self.cluster_id,
                %generation,
                pools = pool_count,
                nodes = node_count,
                "installed Rancher snapshot"
            );
        }
        Ok(generation)
    }

    async fn cleanup_inner(&self) -> Result<(), ProviderError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        match timeout(self.cleanup_timeout, self.client.close()).await {
            Ok(Ok(())) => {
                info!(cluster = %self.cluster_id, "closed Rancher client");
                Ok(())
            }
            Ok(Err(err)) => Err(ProviderError::Cleanup {
                message: err.to_string(),
            }),
            Err(_) => Err(ProviderError::Timeout {
                operation: Operation::Cleanup,
                after: self.cleanup_timeout,
            }),
        }
    }
}

fn bounded_pool(pool: NodePool) -> Option<PoolRecord> {
    if pool.id.is_empty() {
        warn!(name = %pool.name, "skipping node pool without an id");
        return None;
    }
    let (Some(min_size), Some(max_size)) = (pool.min_size, pool.max_size) else {
        debug!(pool = %pool.id, "node pool has no autoscaling bounds");
        return None;
    };
    if max_size < min_size {
        warn!(pool = %pool.id, min_size, max_size, "ignoring node pool with inverted bounds");
        return None;
    }
    Some(PoolRecord {
        id: pool.id,
        name: pool.name,
        min_size,
        max_size,
        target_size: pool.quantity,
    })
}

impl<C: RancherClient> Manager for RancherManager<C> {
    fn refresh(&self) -> ProviderFuture<'_, Generation> {
        Box::pin(self.refresh_inner())
    }

    fn list_node_groups(&self) -> Result<Vec<PoolRecord>, ProviderError> {
        Ok(self.cache.load().pools().cloned().collect())
    }

    fn resolve_node(&self, node_name: &str) -> Result<Option<NodeRecord>, ProviderError> {
        Ok(self.cache.load().node(node_name).cloned())
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.cache.load()
    }

    fn cleanup(&self) -> ProviderFuture<'_, ()> {
        Box::pin(self.cleanup_inner())
    }
}

