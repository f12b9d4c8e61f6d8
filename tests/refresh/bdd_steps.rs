//! BDD step definitions for provider refresh, lookup, and cleanup.

use ranchscale::{CloudProvider, ErrorKind, Node, ProviderError};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::{RefreshContext, StepOutcome};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn record(result: Result<(), ProviderError>) -> StepOutcome {
    match result {
        Ok(()) => StepOutcome::Success,
        Err(err) => StepOutcome::Failure {
            kind: err.kind(),
            message: err.to_string(),
        },
    }
}

fn runtime() -> Result<Runtime, StepError> {
    Runtime::new().map_err(|err| StepError::Assertion(err.to_string()))
}

#[given("a Rancher backend with pools \"{first}\" and \"{second}\"")]
fn backend_with_pools(
    mut refresh_context: RefreshContext,
    first: String,
    second: String,
) -> RefreshContext {
    refresh_context.pool_ids = vec![first, second];
    refresh_context.publish();
    refresh_context
}

#[given("node \"{name}\" has no pool assignment")]
fn node_without_pool(mut refresh_context: RefreshContext, name: String) -> RefreshContext {
    refresh_context.orphans.push(name);
    refresh_context.publish();
    refresh_context
}

#[given("the control loop has refreshed once")]
fn refreshed_once(refresh_context: RefreshContext) -> Result<RefreshContext, StepError> {
    let provider = std::sync::Arc::clone(&refresh_context.provider);
    runtime()?
        .block_on(async move { provider.refresh().await })
        .map_err(|err| StepError::Assertion(format!("initial refresh failed: {err}")))?;
    Ok(refresh_context)
}

#[given("the backend drops pool \"{id}\"")]
fn backend_drops_pool(mut refresh_context: RefreshContext, id: String) -> RefreshContext {
    refresh_context.pool_ids.retain(|pool_id| *pool_id != id);
    refresh_context.publish();
    refresh_context
}

#[given("the backend fails the next listing")]
fn backend_fails(refresh_context: RefreshContext) -> RefreshContext {
    refresh_context.client.fail_next_listing("rancher API returned 503");
    refresh_context
}

#[when("the control loop refreshes the provider")]
fn refresh_provider(mut refresh_context: RefreshContext) -> Result<RefreshContext, StepError> {
    let provider = std::sync::Arc::clone(&refresh_context.provider);
    let result = runtime()?.block_on(async move { provider.refresh().await.map(|_| ()) });
    refresh_context.outcome = Some(record(result));
    Ok(refresh_context)
}

#[when("the control loop resolves node \"{name}\"")]
fn resolve_node(mut refresh_context: RefreshContext, name: String) -> RefreshContext {
    let result = refresh_context
        .provider
        .node_group_for_node(&Node::named(name))
        .map(|_| ());
    refresh_context.outcome = Some(record(result));
    refresh_context
}

#[when("the control loop cleans up the provider twice")]
fn cleanup_twice(mut refresh_context: RefreshContext) -> Result<RefreshContext, StepError> {
    let provider = std::sync::Arc::clone(&refresh_context.provider);
    let result = runtime()?.block_on(async move {
        provider.cleanup().await?;
        provider.cleanup().await
    });
    refresh_context.outcome = Some(record(result));
    Ok(refresh_context)
}

#[then("the refresh succeeds")]
fn refresh_succeeds(refresh_context: &RefreshContext) -> Result<(), StepError> {
    match refresh_context.outcome.as_ref() {
        Some(StepOutcome::Success) => Ok(()),
        Some(other) => Err(StepError::Assertion(format!(
            "expected success, got {other:?}"
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

#[then("the refresh fails with a refresh error")]
fn refresh_fails(refresh_context: &RefreshContext) -> Result<(), StepError> {
    match refresh_context.outcome.as_ref() {
        Some(StepOutcome::Failure {
            kind: ErrorKind::Refresh,
            ..
        }) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected refresh error, got {other:?}"
        ))),
    }
}

#[then("the provider serves generation {generation:u64}")]
fn serves_generation(refresh_context: &RefreshContext, generation: u64) -> Result<(), StepError> {
    let served = refresh_context.provider.generation().get();
    if served == generation {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected generation {generation}, got {served}"
        )))
    }
}

#[then("the provider lists {count:usize} node groups")]
fn lists_node_groups(refresh_context: &RefreshContext, count: usize) -> Result<(), StepError> {
    let listed = refresh_context.provider.node_groups().len();
    if listed == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} node groups, got {listed}"
        )))
    }
}

#[then("the lookup fails naming node \"{name}\"")]
fn lookup_fails(refresh_context: &RefreshContext, name: String) -> Result<(), StepError> {
    let Some(StepOutcome::Failure { kind, message }) = refresh_context.outcome.as_ref() else {
        return Err(StepError::Assertion(String::from(
            "expected lookup to fail",
        )));
    };
    if *kind == ErrorKind::DataIntegrity && message.contains(name.as_str()) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected integrity error naming {name}, got {kind:?}: {message}"
        )))
    }
}

#[then("the backend client is closed {times:u32} time")]
fn client_closed(refresh_context: &RefreshContext, times: u32) -> Result<(), StepError> {
    let closed = refresh_context.client.close_calls();
    if closed == times {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {times} close calls, got {closed}"
        )))
    }
}
