//! Cloud provider abstraction for a cluster autoscaler.
//!
//! The crate exposes the contract a generic scaling control loop uses to
//! observe and resize provider-specific node pools, a generation-swapped
//! cache that keeps every read within a tick consistent, and a Rancher
//! backend built on that contract.

pub mod builder;
pub mod cache;
pub mod config;
pub mod limiter;
pub mod manager;
pub mod node_group;
pub mod options;
pub mod provider;
pub mod rancher;
pub mod test_support;

pub use builder::{build_cloud_provider, build_rancher};
pub use cache::{Generation, NodeRecord, PoolRecord, Snapshot, SnapshotCache};
pub use config::{ConfigError, RancherConfig};
pub use limiter::ResourceLimiter;
pub use manager::Manager;
pub use node_group::NodeGroup;
pub use options::{
    AutoscalingOptions, DiscoveryError, NodeGroupDiscoveryOptions, NodeGroupSpec, ProviderFlags,
};
pub use provider::{
    Capability, CloudProvider, ErrorKind, Instance, Node, NodeGroupRequest, PricingModel,
    ProviderError, ProviderFuture,
};
pub use rancher::{
    GPU_LABEL, NodePool, RANCHER_PROVIDER_NAME, RancherClient, RancherCloudProvider,
    RancherManager, RancherNode,
};
