//! Contract between the autoscaling control loop and a compute backend.
//!
//! The control loop holds a single `Box<dyn CloudProvider>` chosen at
//! start-up. Once per tick it awaits [`CloudProvider::refresh`]; every other
//! call is synchronous and answers from the snapshot installed by the most
//! recent successful refresh.

mod error;
mod types;

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::cache::Generation;
use crate::limiter::ResourceLimiter;
use crate::node_group::NodeGroup;

pub use error::{Capability, ErrorKind, Operation, ProviderError};
pub use types::{Instance, Node, NodeGroupRequest, PricingModel, Taint, TaintEffect};

/// Future returned by provider and manager operations that reach the backend.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Capability interface implemented once per backend kind.
pub trait CloudProvider: Send + Sync {
    /// Stable identifier of the backend kind.
    fn name(&self) -> &str;

    /// Returns handles for every node group in the current snapshot.
    ///
    /// A listing failure is logged and yields an empty vector, so callers
    /// cannot tell "no groups" apart from "listing failed this tick".
    fn node_groups(&self) -> Vec<Box<dyn NodeGroup>>;

    /// Resolves the node group owning `node`.
    ///
    /// Returns `Ok(None)` for nodes this provider does not manage.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::DataIntegrity`] when the node is cached
    /// without a pool assignment.
    fn node_group_for_node(&self, node: &Node) -> Result<Option<Box<dyn NodeGroup>>, ProviderError>;

    /// Returns the pricing model.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unsupported`] when the backend has no pricing.
    fn pricing(&self) -> Result<Box<dyn PricingModel>, ProviderError>;

    /// Lists machine types that a new node group may use.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unsupported`] when the backend cannot list
    /// machine types.
    fn available_machine_types(&self) -> Result<Vec<String>, ProviderError>;

    /// Builds a theoretical node group. Nothing is created on the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unsupported`] when the backend cannot create
    /// node groups.
    fn new_node_group(&self, request: &NodeGroupRequest)
    -> Result<Box<dyn NodeGroup>, ProviderError>;

    /// Returns the limiter supplied at construction.
    fn resource_limiter(&self) -> Arc<ResourceLimiter>;

    /// Label key identifying GPU-bearing nodes.
    fn gpu_label(&self) -> &str;

    /// GPU types the backend can provision. May be empty.
    fn available_gpu_types(&self) -> BTreeSet<String>;

    /// Generation of the snapshot currently served to readers.
    ///
    /// [`Generation::NONE`] means no refresh has succeeded yet.
    fn generation(&self) -> Generation;

    /// Pulls fresh backend state and installs it as a new generation.
    ///
    /// On failure the previous generation stays in use.
    fn refresh(&self) -> ProviderFuture<'_, Generation>;

    /// Releases backend resources. Calls after the first are no-ops.
    fn cleanup(&self) -> ProviderFuture<'_, ()>;
}
