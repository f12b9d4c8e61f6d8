//! Provider construction.
//!
//! Builders return errors instead of exiting; the caller decides whether a
//! construction failure aborts start-up.

use std::sync::Arc;

use tracing::info;

use crate::limiter::ResourceLimiter;
use crate::options::{AutoscalingOptions, NodeGroupDiscoveryOptions};
use crate::provider::{CloudProvider, ProviderError};
use crate::rancher::{RANCHER_PROVIDER_NAME, RancherClient, RancherCloudProvider, RancherManager};

/// Builds the Rancher provider, its manager, and validates the inputs.
///
/// # Errors
///
/// Returns [`ProviderError::Construction`] when the Rancher configuration or
/// the node group specs are invalid.
pub fn build_rancher<C: RancherClient + 'static>(
    options: &AutoscalingOptions,
    discovery: &NodeGroupDiscoveryOptions,
    resource_limiter: Arc<ResourceLimiter>,
    client: C,
) -> Result<RancherCloudProvider<RancherManager<C>>, ProviderError> {
    options
        .rancher
        .validate()
        .map_err(|err| ProviderError::construction(format!("failed to create Rancher manager: {err}")))?;
    let specs = discovery
        .parse_specs()
        .map_err(|err| ProviderError::construction(format!("failed to create Rancher manager: {err}")))?;

    let manager = RancherManager::new(client, &options.rancher, specs);
    info!(
        cluster = %manager.cluster_id(),
        static_groups = discovery.node_group_specs.len(),
        "built Rancher cloud provider"
    );
    Ok(RancherCloudProvider::new(Arc::new(manager), resource_limiter))
}

/// Selects and builds the provider named by `options.cloud_provider_name`.
///
/// Selection happens once; the returned trait object is used for the life of
/// the process.
///
/// # Errors
///
/// Returns [`ProviderError::Construction`] for an unknown provider name or
/// any failure reported by the selected builder.
pub fn build_cloud_provider<C: RancherClient + 'static>(
    options: &AutoscalingOptions,
    discovery: &NodeGroupDiscoveryOptions,
    resource_limiter: Arc<ResourceLimiter>,
    client: C,
) -> Result<Box<dyn CloudProvider>, ProviderError> {
    match options.cloud_provider_name.trim() {
        RANCHER_PROVIDER_NAME => Ok(Box::new(build_rancher(
            options,
            discovery,
            resource_limiter,
            client,
        )?)),
        other => Err(ProviderError::construction(format!(
            "unknown cloud provider '{other}'"
        ))),
    }
}
