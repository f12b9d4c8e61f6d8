//! Rancher backend: node pools managed through the Rancher API.

mod client;
mod manager;
mod node_group;
mod provider;

pub use client::{ClientFuture, NodePool, RancherClient, RancherNode};
pub use manager::RancherManager;
pub use node_group::RancherNodeGroup;
pub use provider::{GPU_LABEL, RANCHER_PROVIDER_NAME, RancherCloudProvider};
