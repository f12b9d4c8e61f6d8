//! Generation-swapped index of backend pools and node assignments.
//!
//! Every refresh builds a complete [`Snapshot`] and replaces the previous one
//! in a single pointer swap. Readers clone the current `Arc<Snapshot>` and
//! keep using it for as long as they like, so a lookup never observes pools
//! from one refresh mixed with nodes from another.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Monotonic counter identifying one completed refresh.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Generation(u64);

impl Generation {
    /// Generation visible before any refresh has succeeded.
    pub const NONE: Self = Self(0);

    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Reports whether at least one refresh has been installed.
    #[must_use]
    pub const fn is_loaded(self) -> bool {
        self.0 > 0
    }

    const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cached metadata for one node pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolRecord {
    /// Backend-assigned pool identifier. Never empty once cached.
    pub id: String,
    /// Human readable pool name.
    pub name: String,
    /// Smallest size the autoscaler may shrink the pool to.
    pub min_size: usize,
    /// Largest size the autoscaler may grow the pool to.
    pub max_size: usize,
    /// Node count the backend is currently converging on.
    pub target_size: usize,
}

/// Cached backend view of a single node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeRecord {
    /// Backend node identifier.
    pub id: String,
    /// Kubernetes node name used for lookups.
    pub node_name: String,
    /// Owning pool as reported by the backend. May be empty.
    pub pool_id: String,
    /// Cloud provider identifier, when the backend reports one.
    pub provider_id: Option<String>,
}

impl NodeRecord {
    /// Reports whether the backend assigned this node to a pool.
    #[must_use]
    pub fn has_pool(&self) -> bool {
        !self.pool_id.is_empty()
    }
}

/// One immutable generation of the cached index.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    generation: Generation,
    pools: BTreeMap<String, PoolRecord>,
    nodes: HashMap<String, NodeRecord>,
}

impl Snapshot {
    /// Returns the empty snapshot used before the first refresh.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Generation that produced this snapshot.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Looks up a pool by identifier.
    #[must_use]
    pub fn pool(&self, id: &str) -> Option<&PoolRecord> {
        self.pools.get(id)
    }

    /// Iterates pools in identifier order.
    pub fn pools(&self) -> impl Iterator<Item = &PoolRecord> {
        self.pools.values()
    }

    /// Looks up a node by its Kubernetes node name.
    #[must_use]
    pub fn node(&self, node_name: &str) -> Option<&NodeRecord> {
        self.nodes.get(node_name)
    }

    /// Returns the nodes assigned to `pool_id`, ordered by node name.
    #[must_use]
    pub fn nodes_in_pool(&self, pool_id: &str) -> Vec<&NodeRecord> {
        let mut members = self
            .nodes
            .values()
            .filter(|node| node.pool_id == pool_id)
            .collect::<Vec<_>>();
        members.sort_by(|left, right| left.node_name.cmp(&right.node_name));
        members
    }

    /// Number of cached pools.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Number of cached nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Holder for the current [`Snapshot`], swapped whole on every install.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    current: RwLock<Arc<Snapshot>>,
    install_lock: Mutex<()>,
}

impl SnapshotCache {
    /// Creates a cache holding the empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot.
    ///
    /// The lock is held only while the `Arc` is cloned. A poisoned lock is
    /// recovered because the guarded value is never partially written.
    #[must_use]
    pub fn load(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Generation of the current snapshot.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.load().generation()
    }

    /// Installs a new generation built from `pools` and `nodes`.
    ///
    /// Nodes are keyed by node name; a later record replaces an earlier one
    /// with the same name. When the content matches the current generation
    /// exactly the cache is left untouched and the current generation is
    /// returned.
    pub fn install(&self, pools: Vec<PoolRecord>, nodes: Vec<NodeRecord>) -> Generation {
        let pool_index = pools
            .into_iter()
            .map(|pool| (pool.id.clone(), pool))
            .collect::<BTreeMap<_, _>>();
        let node_index = nodes
            .into_iter()
            .map(|node| (node.node_name.clone(), node))
            .collect::<HashMap<_, _>>();

        // Installs are serialised; readers only wait for the pointer swap.
        let _installing = self
            .install_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let current = self.load();
        if current.generation.is_loaded() && current.pools == pool_index && current.nodes == node_index {
            return current.generation;
        }

        let generation = current.generation.next();
        let next = Arc::new(Snapshot {
            generation,
            pools: pool_index,
            nodes: node_index,
        });
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
        generation
    }
}
