//! Shared fixtures for refresh BDD scenarios.

use std::fmt;
use std::sync::Arc;

use ranchscale::test_support::{ScriptedClient, node, pool};
use ranchscale::{
    AutoscalingOptions, ErrorKind, NodeGroupDiscoveryOptions, RANCHER_PROVIDER_NAME,
    RancherCloudProvider, RancherConfig, RancherManager, ResourceLimiter, build_rancher,
};
use rstest::fixture;

use crate::test_constants::CLUSTER_ID;

pub type Provider = RancherCloudProvider<RancherManager<ScriptedClient>>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    Success,
    Failure { kind: ErrorKind, message: String },
}

#[derive(Clone)]
pub struct RefreshContext {
    pub client: ScriptedClient,
    pub provider: Arc<Provider>,
    pub pool_ids: Vec<String>,
    pub orphans: Vec<String>,
    pub outcome: Option<StepOutcome>,
}

impl fmt::Debug for RefreshContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshContext")
            .field("pool_ids", &self.pool_ids)
            .field("orphans", &self.orphans)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl RefreshContext {
    /// Publishes the current pools, one worker per pool, plus orphans.
    pub fn publish(&self) {
        let pools = self
            .pool_ids
            .iter()
            .map(|id| pool(id, 0, 5, 1))
            .collect();
        let nodes = self
            .pool_ids
            .iter()
            .map(|id| node(&format!("{id}-worker"), id))
            .chain(self.orphans.iter().map(|name| node(name, "")))
            .collect();
        self.client.set_inventory(pools, nodes);
    }
}

#[fixture]
pub fn refresh_context() -> RefreshContext {
    let client = ScriptedClient::new();
    let provider = build_rancher(
        &AutoscalingOptions {
            cloud_provider_name: String::from(RANCHER_PROVIDER_NAME),
            rancher: RancherConfig::for_cluster(CLUSTER_ID),
        },
        &NodeGroupDiscoveryOptions::default(),
        Arc::new(ResourceLimiter::default()),
        client.clone(),
    )
    .unwrap_or_else(|err| panic!("provider should build: {err}"));

    RefreshContext {
        client,
        provider: Arc::new(provider),
        pool_ids: Vec::new(),
        orphans: Vec::new(),
        outcome: None,
    }
}
