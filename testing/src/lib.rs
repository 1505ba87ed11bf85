//! # Resynchronize Testing
//!
//! Testing utilities and helpers for resynchronize reducers.
//!
//! This crate provides:
//! - A Given-When-Then builder for reducers
//! - Assertion helpers for async state nodes
//! - Property-based testing strategies
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```
//! use resynchronize_core::prelude::*;
//! use resynchronize_testing::{ReducerTest, assertions};
//! use serde_json::{Value, json};
//!
//! let detail = create_async_action_set("DETAIL");
//! let reducer = create_async_reducer(Value::Null, &Handler::from(&detail), None).unwrap();
//!
//! ReducerTest::new(reducer)
//!     .when_action(detail.error().create(json!("not found")))
//!     .then_state(|state| assertions::assert_error_with(state, &json!("not found")))
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Test helpers and utilities
pub mod helpers {
    use resynchronize_core::prelude::{
        AsyncActionSet, AsyncReducer, Handler, create_async_action_set, create_async_reducer,
    };
    use serde_json::Value;

    /// Install a `tracing` subscriber for test output
    ///
    /// Honors `RUST_LOG`, defaulting to `resynchronize_core=trace`. Safe to call
    /// from every test; only the first call installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "resynchronize_core=trace".into()),
            )
            .with_test_writer()
            .try_init();
    }

    /// An action set and a default reducer for it
    ///
    /// # Panics
    ///
    /// Never in practice: a single action set is always a valid handler.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn tracked_operation(store_key: &str, initial_payload: Value) -> (AsyncActionSet, AsyncReducer) {
        let actions = create_async_action_set(store_key);
        let reducer = create_async_reducer(initial_payload, &Handler::from(&actions), None)
            .expect("a single action set should always be a valid handler");
        (actions, reducer)
    }
}

/// Property-based testing utilities
///
/// Strategies for the values reducers are exercised with.
pub mod properties {
    use proptest::prelude::*;
    use resynchronize_core::action_set::Stage;
    use serde_json::{Value, json};

    /// Store keys: an ASCII letter followed by letters, digits or underscores
    pub fn store_key() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9_]{0,24}"
    }

    /// Payloads that replace the previous value under the default hooks
    pub fn truthy_payload() -> impl Strategy<Value = Value> {
        prop_oneof![
            "[a-z]{1,12}".prop_map(Value::from),
            (1_i64..i64::MAX).prop_map(Value::from),
            Just(json!(true)),
            prop::collection::vec(any::<i32>(), 0..4).prop_map(|items| json!(items)),
            Just(json!({})),
        ]
    }

    /// Payloads the default hooks treat as absent
    pub fn falsy_payload() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            Just(json!(0)),
            Just(json!("")),
            Just(json!(false)),
        ]
    }

    /// Any lifecycle stage
    pub fn stage() -> impl Strategy<Value = Stage> {
        prop::sample::select(Stage::ALL.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_tracked_operation() {
        helpers::init_test_tracing();
        let (actions, reducer) = helpers::tracked_operation("TEST", Value::Null);
        assert_eq!(actions.store_key(), "TEST");
        assert_eq!(reducer.table().len(), 6);
    }
}
