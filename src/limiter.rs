//! Aggregate resource bounds supplied by the autoscaler at start-up.
//!
//! The limiter is built and validated outside this crate. Providers only hold
//! it and hand the same instance back to the control loop.

use std::collections::{BTreeMap, BTreeSet};

/// Resource name for CPU cores.
pub const RESOURCE_CORES: &str = "cpu";

/// Resource name for memory, in bytes.
pub const RESOURCE_MEMORY: &str = "memory";

/// Resource name for the total node count.
pub const RESOURCE_NODES: &str = "nodes";

/// Immutable minimum and maximum bounds for cluster-wide resources.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResourceLimiter {
    min: BTreeMap<String, i64>,
    max: BTreeMap<String, i64>,
}

impl ResourceLimiter {
    /// Creates a limiter from per-resource minimum and maximum bounds.
    #[must_use]
    pub const fn new(min: BTreeMap<String, i64>, max: BTreeMap<String, i64>) -> Self {
        Self { min, max }
    }

    /// Returns the lower bound for `resource`, or `0` when none is set.
    #[must_use]
    pub fn min(&self, resource: &str) -> i64 {
        self.min.get(resource).copied().unwrap_or(0)
    }

    /// Returns the upper bound for `resource`, or `i64::MAX` when unbounded.
    #[must_use]
    pub fn max(&self, resource: &str) -> i64 {
        self.max.get(resource).copied().unwrap_or(i64::MAX)
    }

    /// Lists every resource named by either bound, sorted and deduplicated.
    #[must_use]
    pub fn resources(&self) -> Vec<&str> {
        self.min
            .keys()
            .chain(self.max.keys())
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
