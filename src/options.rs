//! Scaling and node group discovery options passed to the provider builder.

use std::collections::BTreeSet;
use std::str::FromStr;

use clap::Parser;
use thiserror::Error;

use crate::config::RancherConfig;

/// Command-line flags selecting and scoping the cloud provider.
#[derive(Clone, Debug, Parser)]
#[command(name = "ranchscale", about = "Cluster autoscaler cloud provider flags")]
pub struct ProviderFlags {
    /// Backend kind to build.
    #[arg(long = "cloud-provider", env = "CLOUD_PROVIDER", default_value = crate::rancher::RANCHER_PROVIDER_NAME)]
    pub cloud_provider: String,
    /// Static node group in `min:max:pool-id` form. May be repeated.
    #[arg(long = "nodes", value_name = "MIN:MAX:ID")]
    pub nodes: Vec<String>,
}

impl ProviderFlags {
    /// Combines the flags with loaded Rancher settings.
    #[must_use]
    pub fn into_options(
        self,
        rancher: RancherConfig,
    ) -> (AutoscalingOptions, NodeGroupDiscoveryOptions) {
        (
            AutoscalingOptions {
                cloud_provider_name: self.cloud_provider,
                rancher,
            },
            NodeGroupDiscoveryOptions {
                node_group_specs: self.nodes,
            },
        )
    }
}

/// Scaling configuration relevant to provider construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AutoscalingOptions {
    /// Backend kind requested by the operator (for example `rancher`).
    pub cloud_provider_name: String,
    /// Rancher backend settings.
    pub rancher: RancherConfig,
}

/// Node group discovery configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodeGroupDiscoveryOptions {
    /// Static node group specs in `min:max:pool-id` form.
    pub node_group_specs: Vec<String>,
}

impl NodeGroupDiscoveryOptions {
    /// Reports whether static specs restrict the managed pools.
    #[must_use]
    pub fn static_discovery_enabled(&self) -> bool {
        !self.node_group_specs.is_empty()
    }

    /// Parses every static spec, rejecting duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] naming the first spec that is malformed or
    /// repeats an earlier pool identifier.
    pub fn parse_specs(&self) -> Result<Vec<NodeGroupSpec>, DiscoveryError> {
        let mut seen = BTreeSet::new();
        let mut specs = Vec::with_capacity(self.node_group_specs.len());
        for raw in &self.node_group_specs {
            let spec = raw.parse::<NodeGroupSpec>()?;
            if !seen.insert(spec.id.clone()) {
                return Err(DiscoveryError::Duplicate { id: spec.id });
            }
            specs.push(spec);
        }
        Ok(specs)
    }
}

/// Size bounds for one statically configured pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeGroupSpec {
    /// Minimum pool size.
    pub min_size: usize,
    /// Maximum pool size.
    pub max_size: usize,
    /// Backend pool identifier. May itself contain `:`.
    pub id: String,
}

impl FromStr for NodeGroupSpec {
    type Err = DiscoveryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DiscoveryError::Invalid {
            spec: raw.to_owned(),
            reason: reason.to_owned(),
        };

        let mut parts = raw.trim().splitn(3, ':');
        let (Some(min), Some(max), Some(id)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected min:max:pool-id"));
        };
        let min_size = min
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid("min size must be a non-negative integer"))?;
        let max_size = max
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid("max size must be a non-negative integer"))?;
        if max_size == 0 {
            return Err(invalid("max size must be greater than zero"));
        }
        if max_size < min_size {
            return Err(invalid("max size must be greater than or equal to min size"));
        }
        let trimmed_id = id.trim();
        if trimmed_id.is_empty() {
            return Err(invalid("pool id must not be empty"));
        }

        Ok(Self {
            min_size,
            max_size,
            id: trimmed_id.to_owned(),
        })
    }
}

/// Errors raised while parsing discovery options.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DiscoveryError {
    /// Raised when a spec cannot be parsed or has inconsistent bounds.
    #[error("invalid node group spec '{spec}': {reason}")]
    Invalid {
        /// Spec as supplied by the operator.
        spec: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Raised when two specs name the same pool.
    #[error("node group {id} is specified more than once")]
    Duplicate {
        /// Repeated pool identifier.
        id: String,
    },
}
