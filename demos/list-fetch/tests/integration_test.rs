//! Integration tests for the list fetch demo
//!
//! A real producer task drives the reducer over a channel.

#![allow(clippy::unwrap_used)] // Tests can unwrap

use list_fetch::{FetchOutcome, FetchPlan, ListFeature, consume, fetch, load};
use resynchronize_core::prelude::*;
use resynchronize_testing::assertions;
use resynchronize_testing::helpers::init_test_tracing;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;

fn pages() -> Vec<Vec<String>> {
    vec![
        vec!["a".to_string(), "b".to_string()],
        vec!["c".to_string()],
    ]
}

#[tokio::test]
async fn test_successful_fetch_ends_done() {
    init_test_tracing();
    let plan = FetchPlan {
        pages: pages(),
        latency: Duration::from_millis(1),
        outcome: FetchOutcome::Succeed,
    };

    let state = load("LIST", plan).await.unwrap();

    assertions::assert_done_with(&state, &json!(["a", "b", "c"]));
}

#[tokio::test]
async fn test_failed_fetch_keeps_nothing() {
    let plan = FetchPlan {
        pages: pages(),
        latency: Duration::from_millis(1),
        outcome: FetchOutcome::FailAfter(1),
    };

    let state = load("LIST", plan).await.unwrap();

    assert!(has_error(&state));
    assert_eq!(get_payload(&state), serde_json::Value::Null);
    assert_eq!(
        get_error(&state),
        json!({ "message": "connection reset", "retryable": true })
    );
}

#[tokio::test]
async fn test_consumer_sees_actions_in_order() {
    let feature = ListFeature::new("LIST").unwrap();
    let (tx, rx) = mpsc::channel(8);

    // Dispatch by hand: a cancel arriving after progress wins.
    tx.send(feature.actions.start().empty()).await.unwrap();
    tx.send(feature.actions.progress().create(json!(["a"]))).await.unwrap();
    tx.send(feature.actions.cancel().empty()).await.unwrap();
    drop(tx);

    let state = consume(&feature.reducer, rx).await;

    assertions::assert_cancelled(&state);
}

#[tokio::test]
async fn test_producer_stops_when_consumer_leaves() {
    init_test_tracing();
    let feature = ListFeature::new("LIST").unwrap();
    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    let plan = FetchPlan {
        pages: pages(),
        latency: Duration::from_millis(1),
        outcome: FetchOutcome::Succeed,
    };

    // Returns instead of hanging on a closed channel.
    tokio::time::timeout(Duration::from_secs(1), fetch(feature.actions, plan, tx))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_producer_stops_when_consumer_leaves_mid_fetch() {
    init_test_tracing();
    let feature = ListFeature::new("LIST").unwrap();
    let (tx, mut rx) = mpsc::channel(1);

    let plan = FetchPlan {
        pages: pages(),
        latency: Duration::from_millis(1),
        outcome: FetchOutcome::Succeed,
    };
    let producer = tokio::spawn(fetch(feature.actions.clone(), plan, tx));

    let first = rx.recv().await.unwrap();
    assert_eq!(feature.actions.stage_of(&first), Some(Stage::Start));
    drop(rx);

    tokio::time::timeout(Duration::from_secs(1), producer)
        .await
        .unwrap()
        .unwrap();
}
