//! Value types exchanged between the control loop and providers.

use std::collections::BTreeMap;
use std::time::SystemTime;

use super::ProviderError;

/// A cluster member as observed by the control loop.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Node {
    /// Kubernetes node name.
    pub name: String,
    /// Cloud provider identifier from the node spec, if set.
    pub provider_id: Option<String>,
    /// Node labels.
    pub labels: BTreeMap<String, String>,
}

impl Node {
    /// Creates a node with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A machine belonging to a node group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instance {
    /// Provider identifier, falling back to the backend node identifier.
    pub id: String,
    /// Kubernetes node name.
    pub node_name: String,
}

/// Scheduling effect of a taint.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TaintEffect {
    /// Pods without a toleration are not scheduled.
    NoSchedule,
    /// The scheduler avoids the node when possible.
    PreferNoSchedule,
    /// Running pods without a toleration are evicted.
    NoExecute,
}

/// Taint applied to nodes of a prospective node group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Taint {
    /// Taint key.
    pub key: String,
    /// Taint value.
    pub value: String,
    /// Scheduling effect.
    pub effect: TaintEffect,
}

/// Description of a theoretical node group to create.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodeGroupRequest {
    /// Machine type backing the nodes.
    pub machine_type: String,
    /// User labels applied to nodes.
    pub labels: BTreeMap<String, String>,
    /// System labels applied to nodes.
    pub system_labels: BTreeMap<String, String>,
    /// Taints applied to nodes.
    pub taints: Vec<Taint>,
    /// Extra resources (for example GPUs) as quantity strings.
    pub extra_resources: BTreeMap<String, String>,
}

/// Prices nodes and pods for cost-aware expansion strategies.
pub trait PricingModel: Send + Sync {
    /// Price of running `node` between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the price cannot be determined.
    fn node_price(&self, node: &Node, start: SystemTime, end: SystemTime)
    -> Result<f64, ProviderError>;

    /// Price of running the named pod between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the price cannot be determined.
    fn pod_price(&self, pod: &str, start: SystemTime, end: SystemTime)
    -> Result<f64, ProviderError>;
}
