//! Test support utilities shared across unit and integration tests.

use std::collections::{BTreeSet, VecDeque};
use std::env;
use std::ffi::OsString;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard, Notify};

use crate::rancher::{ClientFuture, NodePool, RancherClient, RancherNode};

/// Errors produced by [`ScriptedClient`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ScriptedClientError {
    /// Simulated API failure.
    #[error("rancher API unavailable: {0}")]
    Unavailable(String),
    /// Simulated failure while closing the client.
    #[error("close failed")]
    Close,
}

#[derive(Debug, Default)]
struct ClientState {
    pools: Vec<NodePool>,
    nodes: Vec<RancherNode>,
    failures: VecDeque<String>,
    fail_on_close: bool,
    hang_on_close: bool,
    listings_held: bool,
    list_calls: u32,
    close_calls: u32,
}

/// Rancher client serving a mutable in-memory inventory.
///
/// Queued failures are consumed one per listing call, in FIFO order.
#[derive(Clone, Debug, Default)]
pub struct ScriptedClient {
    state: Arc<Mutex<ClientState>>,
    listing_gate: Arc<Notify>,
}

impl ScriptedClient {
    /// Creates a client with an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client serving `pools` and `nodes`.
    #[must_use]
    pub fn with_inventory(pools: Vec<NodePool>, nodes: Vec<RancherNode>) -> Self {
        let client = Self::new();
        client.set_inventory(pools, nodes);
        client
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ClientState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Replaces the inventory returned by subsequent listings.
    pub fn set_inventory(&self, pools: Vec<NodePool>, nodes: Vec<RancherNode>) {
        self.with_state(|state| {
            state.pools = pools;
            state.nodes = nodes;
        });
    }

    /// Makes the next listing call fail with `message`.
    pub fn fail_next_listing(&self, message: impl Into<String>) {
        self.with_state(|state| state.failures.push_back(message.into()));
    }

    /// Makes `close` report an error.
    pub fn fail_on_close(&self) {
        self.with_state(|state| state.fail_on_close = true);
    }

    /// Makes `close` never complete.
    pub fn hang_on_close(&self) {
        self.with_state(|state| state.hang_on_close = true);
    }

    /// Makes listing calls wait until [`Self::release_listings`] is called.
    pub fn hang_on_listing(&self) {
        self.with_state(|state| state.listings_held = true);
    }

    /// Lets held and future listing calls proceed.
    pub fn release_listings(&self) {
        self.with_state(|state| state.listings_held = false);
        self.listing_gate.notify_waiters();
    }

    /// Number of pool and node listing calls received so far.
    #[must_use]
    pub fn list_calls(&self) -> u32 {
        self.with_state(|state| state.list_calls)
    }

    /// Number of `close` calls received so far.
    #[must_use]
    pub fn close_calls(&self) -> u32 {
        self.with_state(|state| state.close_calls)
    }

    async fn enter_listing(&self) {
        self.with_state(|state| state.list_calls += 1);
        loop {
            let released = self.listing_gate.notified();
            if !self.with_state(|state| state.listings_held) {
                return;
            }
            released.await;
        }
    }

    fn next_listing<T>(
        &self,
        select: impl FnOnce(&ClientState) -> Vec<T>,
    ) -> Result<Vec<T>, ScriptedClientError> {
        self.with_state(|state| match state.failures.pop_front() {
            Some(message) => Err(ScriptedClientError::Unavailable(message)),
            None => Ok(select(state)),
        })
    }
}

impl RancherClient for ScriptedClient {
    type Error = ScriptedClientError;

    fn list_node_pools<'a>(
        &'a self,
        _cluster_id: &'a str,
    ) -> ClientFuture<'a, Vec<NodePool>, Self::Error> {
        Box::pin(async move {
            self.enter_listing().await;
            self.next_listing(|state| state.pools.clone())
        })
    }

    fn list_nodes<'a>(
        &'a self,
        _cluster_id: &'a str,
    ) -> ClientFuture<'a, Vec<RancherNode>, Self::Error> {
        Box::pin(async move {
            self.enter_listing().await;
            self.next_listing(|state| state.nodes.clone())
        })
    }

    fn close(&self) -> ClientFuture<'_, (), Self::Error> {
        Box::pin(async move {
            let (hang, fail) = self.with_state(|state| {
                state.close_calls += 1;
                (state.hang_on_close, state.fail_on_close)
            });
            if hang {
                std::future::pending::<()>().await;
            }
            if fail {
                return Err(ScriptedClientError::Close);
            }
            Ok(())
        })
    }
}

/// Builds a pool with its own autoscaling bounds.
#[must_use]
pub fn pool(id: &str, min_size: usize, max_size: usize, quantity: usize) -> NodePool {
    NodePool {
        id: id.to_owned(),
        name: format!("{id}-name"),
        quantity,
        min_size: Some(min_size),
        max_size: Some(max_size),
    }
}

/// Builds a node assigned to `pool_id`; pass `""` for an unassigned node.
#[must_use]
pub fn node(node_name: &str, pool_id: &str) -> RancherNode {
    RancherNode {
        id: format!("m-{node_name}"),
        node_name: node_name.to_owned(),
        node_pool_id: pool_id.to_owned(),
        provider_id: None,
    }
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: AsyncMutex<()> = AsyncMutex::const_new(());

/// Guard that holds the env mutex and restores variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets multiple environment variables while holding a global mutex.
    pub async fn set_vars(pairs: &[(&str, &str)]) -> Self {
        debug_assert!(
            {
                let mut seen = BTreeSet::new();
                pairs.iter().all(|(key, _)| seen.insert(*key))
            },
            "duplicate environment variable keys passed to EnvGuard::set_vars"
        );

        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            previous.push(((*key).to_owned(), env::var_os(key)));
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`.
            unsafe { env::set_var(key, value) };
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            // SAFETY: Environment mutation is serialised by holding `_guard`.
            unsafe {
                match old {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
