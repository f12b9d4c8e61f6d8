//! Shared constants for integration tests.
//!
//! Integration tests are compiled as separate crates (one per top-level file in
//! `tests/`). Placing shared constants under `tests/common/` avoids creating an
//! additional integration test binary while still allowing reuse via:
//!
//! ```rust
//! #[path = "common/test_constants.rs"]
//! mod test_constants;
//! ```

/// Rancher cluster used by every test provider.
pub const CLUSTER_ID: &str = "c-abc12";

/// Pool that owns the well-known worker nodes.
pub const POOL_A: &str = "pool-a";
