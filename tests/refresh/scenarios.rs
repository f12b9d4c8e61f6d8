//! BDD scenarios for provider refresh.

use rstest_bdd_macros::scenario;

use super::test_helpers::{RefreshContext, refresh_context};

#[scenario(
    path = "tests/features/refresh.feature",
    name = "Install a new generation on successful refresh"
)]
fn scenario_install_generation(refresh_context: RefreshContext) {
    let _ = refresh_context;
}

#[scenario(
    path = "tests/features/refresh.feature",
    name = "Keep serving the previous generation when refresh fails"
)]
fn scenario_failed_refresh(refresh_context: RefreshContext) {
    let _ = refresh_context;
}

#[scenario(
    path = "tests/features/refresh.feature",
    name = "Replace the node groups when the backend changes"
)]
fn scenario_backend_changes(refresh_context: RefreshContext) {
    let _ = refresh_context;
}

#[scenario(
    path = "tests/features/refresh.feature",
    name = "Keep the generation when the backend is unchanged"
)]
fn scenario_unchanged_backend(refresh_context: RefreshContext) {
    let _ = refresh_context;
}

#[scenario(
    path = "tests/features/refresh.feature",
    name = "Reject a node that lost its pool assignment"
)]
fn scenario_missing_pool(refresh_context: RefreshContext) {
    let _ = refresh_context;
}

#[scenario(path = "tests/features/refresh.feature", name = "Clean up only once")]
fn scenario_cleanup_once(refresh_context: RefreshContext) {
    drop(refresh_context);
}
