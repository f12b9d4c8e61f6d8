//! Interface to the Rancher API client.
//!
//! The client owns transport, authentication, and pagination. The manager
//! only needs the three calls below.

use std::future::Future;
use std::pin::Pin;

/// Future returned by Rancher client calls.
pub type ClientFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A Rancher node pool as reported by the API.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodePool {
    /// Pool identifier (for example `c-abc12:np-xyz`).
    pub id: String,
    /// Pool display name.
    pub name: String,
    /// Desired node count.
    pub quantity: usize,
    /// Autoscaler minimum configured on the pool, if any.
    pub min_size: Option<usize>,
    /// Autoscaler maximum configured on the pool, if any.
    pub max_size: Option<usize>,
}

/// A Rancher node as reported by the API.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RancherNode {
    /// Rancher node identifier.
    pub id: String,
    /// Kubernetes node name.
    pub node_name: String,
    /// Owning pool; empty when Rancher has not recorded one.
    pub node_pool_id: String,
    /// Cloud provider identifier, if reported.
    pub provider_id: Option<String>,
}

/// Minimal interface implemented by Rancher API clients.
pub trait RancherClient: Send + Sync {
    /// Client specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lists node pools belonging to the cluster.
    fn list_node_pools<'a>(
        &'a self,
        cluster_id: &'a str,
    ) -> ClientFuture<'a, Vec<NodePool>, Self::Error>;

    /// Lists nodes belonging to the cluster.
    fn list_nodes<'a>(
        &'a self,
        cluster_id: &'a str,
    ) -> ClientFuture<'a, Vec<RancherNode>, Self::Error>;

    /// Closes connections and stops background work.
    fn close(&self) -> ClientFuture<'_, (), Self::Error>;
}
