//! List fetch example binary
//!
//! Loads a paged list twice: once successfully, once with a failure halfway.

use list_fetch::{FetchOutcome, FetchPlan, load};
use resynchronize_core::prelude::*;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn plan(outcome: FetchOutcome) -> FetchPlan {
    FetchPlan {
        pages: vec![
            vec!["alpha".to_string(), "beta".to_string()],
            vec!["gamma".to_string()],
            vec!["delta".to_string(), "epsilon".to_string()],
        ],
        latency: Duration::from_millis(150),
        outcome,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "list_fetch=debug,resynchronize_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== List Fetch Example: async state reducer ===\n");

    println!(">>> Loading every page");
    let state = load("LIST", plan(FetchOutcome::Succeed)).await?;
    println!("done: {}, payload: {}", is_done(&state), get_payload(&state));

    println!("\n>>> Loading with a failure on page 2");
    let state = load("LIST", plan(FetchOutcome::FailAfter(2))).await?;
    println!(
        "has_error: {}, payload: {}, error: {}",
        has_error(&state),
        get_payload(&state),
        get_error(&state)
    );

    println!("\nFinal node: {}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
