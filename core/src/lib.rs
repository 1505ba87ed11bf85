//! # Resynchronize Core
//!
//! Async request lifecycles as plain, reducible state.
//!
//! Many parts of an application run independent "fetch-like" operations that
//! all need the same start/progress/done/error/cancel/reset bookkeeping. This
//! crate turns that bookkeeping into data:
//!
//! - **Action sets**: six action creators per tracked operation, keyed by a store key
//! - **State node**: `{status, payload, error}` for one operation
//! - **Reducer config**: validated per-stage hooks merged into a dispatch table
//! - **Runtime**: a reducer that applies the matching transition or passes through
//!
//! ## Architecture Principles
//!
//! - Pure transitions: every action produces a new node, the previous one is untouched
//! - Fail fast: handler shapes are validated when the table is built, never at dispatch
//! - Independent operations: each store key owns its own slice of the table
//!
//! ## Example
//!
//! ```
//! use resynchronize_core::prelude::*;
//! use serde_json::{Value, json};
//!
//! # fn main() -> resynchronize_core::error::Result<()> {
//! let list = create_async_action_set("LIST");
//! let reducer = create_async_reducer(Value::Null, &Handler::from(&list), None)?;
//!
//! let state = reducer.reduce_or_init(None, Some(&list.start().empty()));
//! assert!(is_loading(&state));
//!
//! let state = reducer.reduce(&state, &list.done().create(json!(["a", "b"])));
//! assert!(is_done(&state));
//! assert_eq!(get_payload(&state), json!(["a", "b"]));
//! # Ok(())
//! # }
//! ```

pub use serde_json::Value;

/// Actions and action creators
pub mod action;

/// Action sets for tracked operations
pub mod action_set;

/// Reducer configuration building
pub mod config;

/// Configuration errors
pub mod error;

/// Table-driven reducer runtime
pub mod runtime;

/// The async state node, its predicates and transitions
pub mod state;

/// Reducer composition utilities
pub mod composition;

/// Reducer module - the core trait for state transitions
///
/// Reducers are pure functions: `(State, Action) → State`.
/// They never mutate their inputs and never fail.
pub mod reducer {
    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer produces
    /// - `Action`: The action type this reducer processes
    ///
    /// # Example
    ///
    /// ```
    /// use resynchronize_core::reducer::Reducer;
    ///
    /// struct Toggle;
    ///
    /// impl Reducer for Toggle {
    ///     type State = bool;
    ///     type Action = ();
    ///
    ///     fn initial_state(&self) -> bool {
    ///         false
    ///     }
    ///
    ///     fn reduce(&self, state: &bool, _action: &()) -> bool {
    ///         !state
    ///     }
    /// }
    ///
    /// assert!(Toggle.reduce_or_init(None, Some(&())));
    /// assert!(!Toggle.reduce_or_init(None, None));
    /// ```
    pub trait Reducer {
        /// The state type this reducer produces
        type State;

        /// The action type this reducer processes
        type Action;

        /// State used when none is supplied
        fn initial_state(&self) -> Self::State;

        /// Write this reducer's initial state into `state`
        ///
        /// Reducers that own the whole state replace it. Reducers mounted on
        /// part of a larger state only overwrite their part, so combined
        /// reducers can seed every child in turn.
        fn seed(&self, _state: Self::State) -> Self::State {
            self.initial_state()
        }

        /// Compute the next state
        ///
        /// Must not panic; actions the reducer does not handle return an
        /// equal copy of `state`.
        fn reduce(&self, state: &Self::State, action: &Self::Action) -> Self::State;

        /// Reduce with optional inputs
        ///
        /// A missing state is replaced by [`Reducer::initial_state`]; a missing
        /// action matches nothing and returns the state as is.
        fn reduce_or_init(
            &self,
            state: Option<&Self::State>,
            action: Option<&Self::Action>,
        ) -> Self::State
        where
            Self::State: Clone,
        {
            let initial;
            let state = if let Some(state) = state {
                state
            } else {
                initial = self.initial_state();
                &initial
            };

            action.map_or_else(|| state.clone(), |action| self.reduce(state, action))
        }
    }
}

/// Everything needed to declare, configure and query tracked operations.
pub mod prelude {
    pub use crate::action::{ActionCreator, AsyncAction, TypedAction, create_action};
    pub use crate::action_set::{AsyncActionSet, Stage, create_async_action_set, stage_types};
    pub use crate::config::{
        AsyncReducer, Handler, HandlerEntry, HookMap, HookSlot, build_reducer_config,
        create_async_reducer,
    };
    pub use crate::error::ConfigShapeError;
    pub use crate::reducer::Reducer;
    pub use crate::runtime::{DispatchTable, TableReducer, create_reducer};
    pub use crate::state::{
        AsyncStateNode, AsyncStatus, get_error, get_payload, has_error, is_cancelled, is_done,
        is_loading,
    };
}
