//! # List Fetch Example
//!
//! A paged list loaded by a simulated remote call, tracked with an async state node.
//!
//! This example showcases:
//! - An action set per tracked operation
//! - A custom progress hook that appends pages to the payload
//! - A producer task that dispatches START, PROGRESS, then DONE or ERROR
//! - A consumer that owns the state and applies every action in order
//!
//! ## Architecture
//!
//! The reducer stays pure. All timing lives in the producer, which sends
//! actions over a channel; the consumer folds them into the node:
//!
//! ```text
//! fetch task ──mpsc──▶ consumer ──reduce──▶ AsyncStateNode
//! ```

use resynchronize_core::prelude::*;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::mpsc;

/// What the simulated server does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Serve every page, then finish.
    Succeed,
    /// Serve some pages, then fail.
    FailAfter(usize),
}

/// Simulated remote listing.
#[derive(Debug, Clone)]
pub struct FetchPlan {
    /// Pages the server holds.
    pub pages: Vec<Vec<String>>,
    /// Delay before each page.
    pub latency: Duration,
    /// How the fetch ends.
    pub outcome: FetchOutcome,
}

/// The list operation: its actions and its reducer.
#[derive(Debug, Clone)]
pub struct ListFeature {
    /// Actions dispatched by the fetch task.
    pub actions: AsyncActionSet,
    /// Reducer for the list node.
    pub reducer: AsyncReducer,
}

impl ListFeature {
    /// Build the list operation for `store_key`.
    ///
    /// Progress pages are appended to the payload. Done replaces it with
    /// the full listing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigShapeError`] if the handler configuration is rejected.
    pub fn new(store_key: &str) -> Result<Self, ConfigShapeError> {
        let actions = create_async_action_set(store_key);
        let payload = Handler::map().with_hooks(
            &actions,
            HookMap::new()
                .on(Stage::Start, |_, _| json!([]))
                .on(Stage::Progress, append_page),
        );
        let errors = Handler::map().with_hooks(
            &actions,
            HookMap::new().on(Stage::Error, |_, action| {
                json!({ "message": action.payload, "retryable": true })
            }),
        );
        let reducer = create_async_reducer(json!([]), &payload, Some(&errors))?;
        Ok(Self { actions, reducer })
    }
}

fn append_page(items: &Value, action: &AsyncAction) -> Value {
    let mut items = items.as_array().cloned().unwrap_or_default();
    if let Some(page) = action.payload.as_array() {
        items.extend(page.iter().cloned());
    }
    Value::Array(items)
}

/// Run the simulated fetch, sending every lifecycle action to `tx`.
///
/// Stops early if the receiver is gone.
pub async fn fetch(actions: AsyncActionSet, plan: FetchPlan, tx: mpsc::Sender<AsyncAction>) {
    if tx.send(actions.start().empty()).await.is_err() {
        tracing::debug!("consumer gone before start");
        return;
    }

    let mut loaded = Vec::new();
    for (index, page) in plan.pages.iter().enumerate() {
        if plan.outcome == FetchOutcome::FailAfter(index) {
            tracing::warn!(page = index, "simulated fetch failure");
            if tx.send(actions.error().create(json!("connection reset"))).await.is_err() {
                tracing::debug!("consumer gone, error not delivered");
            }
            return;
        }

        tokio::time::sleep(plan.latency).await;
        tracing::debug!(page = index, items = page.len(), "page received");
        loaded.extend(page.iter().cloned());
        if tx.send(actions.progress().create(json!(page))).await.is_err() {
            tracing::debug!(page = index, "consumer gone, stopping fetch");
            return;
        }
    }

    if tx.send(actions.done().create(json!(loaded))).await.is_err() {
        tracing::debug!("consumer gone, done not delivered");
    }
}

/// Apply every action from `rx` to the list node, in arrival order.
///
/// Returns the final node once the producer hangs up.
pub async fn consume(reducer: &AsyncReducer, mut rx: mpsc::Receiver<AsyncAction>) -> AsyncStateNode {
    let mut state = reducer.initial_state();
    while let Some(action) = rx.recv().await {
        state = reducer.reduce(&state, &action);
        tracing::info!(
            action = action.action_type(),
            status = ?state.status,
            items = state.payload.as_array().map_or(0, Vec::len),
            "list updated"
        );
    }
    state
}

/// Fetch `plan` end to end and return the resulting node.
///
/// # Errors
///
/// Returns [`ConfigShapeError`] if the list reducer cannot be built.
pub async fn load(store_key: &str, plan: FetchPlan) -> Result<AsyncStateNode, ConfigShapeError> {
    let feature = ListFeature::new(store_key)?;
    let (tx, rx) = mpsc::channel(8);

    let producer = tokio::spawn(fetch(feature.actions.clone(), plan, tx));
    let state = consume(&feature.reducer, rx).await;
    if let Err(error) = producer.await {
        tracing::error!(%error, "fetch task failed");
    }
    Ok(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_appends_pages() {
        let feature = ListFeature::new("LIST").unwrap();
        let reducer = &feature.reducer;
        let actions = &feature.actions;

        let state = reducer.reduce(&reducer.initial_state(), &actions.start().empty());
        let state = reducer.reduce(&state, &actions.progress().create(json!(["a", "b"])));
        let state = reducer.reduce(&state, &actions.progress().create(json!(["c"])));

        assert!(is_loading(&state));
        assert_eq!(get_payload(&state), json!(["a", "b", "c"]));
    }

    #[test]
    fn test_start_clears_previous_listing() {
        let feature = ListFeature::new("LIST").unwrap();
        let reducer = &feature.reducer;
        let actions = &feature.actions;

        let state = reducer.reduce(&reducer.initial_state(), &actions.done().create(json!(["old"])));
        let state = reducer.reduce(&state, &actions.start().empty());

        assert_eq!(get_payload(&state), json!([]));
    }

    #[test]
    fn test_error_is_wrapped() {
        let feature = ListFeature::new("LIST").unwrap();
        let reducer = &feature.reducer;

        let state = reducer.reduce(
            &reducer.initial_state(),
            &feature.actions.error().create(json!("boom")),
        );

        assert_eq!(get_error(&state), json!({ "message": "boom", "retryable": true }));
    }
}
