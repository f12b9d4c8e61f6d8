//! Rancher implementation of the cloud provider facade.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, warn};

use super::node_group::RancherNodeGroup;
use crate::cache::Generation;
use crate::limiter::ResourceLimiter;
use crate::manager::Manager;
use crate::node_group::NodeGroup;
use crate::provider::{
    Capability, CloudProvider, Node, NodeGroupRequest, PricingModel, ProviderError,
    ProviderFuture,
};

/// Name under which the Rancher backend is selected.
pub const RANCHER_PROVIDER_NAME: &str = "rancher";

/// Label added to nodes with GPU resources.
pub const GPU_LABEL: &str = "nodes.pkds.it/gpu-node";

/// Cloud provider facade over a Rancher [`Manager`].
pub struct RancherCloudProvider<M> {
    manager: Arc<M>,
    resource_limiter: Arc<ResourceLimiter>,
    cleaned_up: AtomicBool,
}

impl<M: Manager + 'static> RancherCloudProvider<M> {
    /// Assembles a provider from a ready manager and the supplied limiter.
    #[must_use]
    pub const fn new(manager: Arc<M>, resource_limiter: Arc<ResourceLimiter>) -> Self {
        Self {
            manager,
            resource_limiter,
            cleaned_up: AtomicBool::new(false),
        }
    }

    /// Manager backing this provider.
    #[must_use]
    pub const fn manager(&self) -> &Arc<M> {
        &self.manager
    }

    fn handle(&self, id: String) -> Box<dyn NodeGroup> {
        Box::new(RancherNodeGroup::new(Arc::clone(&self.manager), id))
    }
}

impl<M: Manager + 'static> CloudProvider for RancherCloudProvider<M> {
    fn name(&self) -> &str {
        RANCHER_PROVIDER_NAME
    }

    fn node_groups(&self) -> Vec<Box<dyn NodeGroup>> {
        let pools = match self.manager.list_node_groups() {
            Ok(pools) => pools,
            Err(err) => {
                error!(error = %err, "failed to get node pools");
                return Vec::new();
            }
        };
        pools
            .into_iter()
            .filter(|pool| !pool.id.is_empty())
            .map(|pool| self.handle(pool.id))
            .collect()
    }

    fn node_group_for_node(&self, node: &Node) -> Result<Option<Box<dyn NodeGroup>>, ProviderError> {
        let Some(record) = self.manager.resolve_node(&node.name)? else {
            debug!(node = %node.name, "node is not managed by Rancher");
            return Ok(None);
        };
        if !record.has_pool() {
            return Err(ProviderError::DataIntegrity {
                node_name: record.node_name,
                node_id: record.id,
            });
        }
        Ok(Some(self.handle(record.pool_id)))
    }

    fn pricing(&self) -> Result<Box<dyn PricingModel>, ProviderError> {
        Err(ProviderError::unsupported(Capability::Pricing))
    }

    fn available_machine_types(&self) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::unsupported(Capability::MachineTypes))
    }

    fn new_node_group(
        &self,
        _request: &NodeGroupRequest,
    ) -> Result<Box<dyn NodeGroup>, ProviderError> {
        Err(ProviderError::unsupported(Capability::NewNodeGroup))
    }

    fn resource_limiter(&self) -> Arc<ResourceLimiter> {
        Arc::clone(&self.resource_limiter)
    }

    fn gpu_label(&self) -> &str {
        GPU_LABEL
    }

    fn available_gpu_types(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn generation(&self) -> Generation {
        self.manager.snapshot().generation()
    }

    fn refresh(&self) -> ProviderFuture<'_, Generation> {
        Box::pin(async move {
            self.manager.refresh().await.inspect_err(|err| {
                warn!(
                    error = %err,
                    serving = %self.generation(),
                    "refresh failed; keeping previous generation"
                );
            })
        })
    }

    fn cleanup(&self) -> ProviderFuture<'_, ()> {
        Box::pin(async move {
            if self.cleaned_up.swap(true, Ordering::SeqCst) {
                debug!("cloud provider already cleaned up");
                return Ok(());
            }
            self.manager.cleanup().await
        })
    }
}
