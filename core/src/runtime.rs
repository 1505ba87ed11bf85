//! Table-driven reducer execution.
//!
//! A [`DispatchTable`] maps action type strings to transitions. A
//! [`TableReducer`] looks each incoming action up by exact type match and
//! applies the transition it finds. Actions with no entry leave the state as
//! it was.
//!
//! # Example
//!
//! ```
//! use resynchronize_core::action::{AsyncAction, create_action};
//! use resynchronize_core::reducer::Reducer;
//! use resynchronize_core::runtime::{DispatchTable, create_reducer};
//! use serde_json::json;
//!
//! let increment = create_action("INCREMENT");
//!
//! let mut table = DispatchTable::new();
//! table.insert(increment.to_string(), |count: &i64, _: &AsyncAction| count + 1);
//!
//! let reducer = create_reducer(0_i64, table);
//! assert_eq!(reducer.reduce(&1, &increment.empty()), 2);
//! assert_eq!(reducer.reduce(&1, &AsyncAction::new("OTHER", json!(null))), 1);
//! ```

use crate::action::TypedAction;
use crate::reducer::Reducer;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A state transition: `(previous state, action) -> next state`.
pub type Transition<S, A> = Arc<dyn Fn(&S, &A) -> S + Send + Sync>;

/// Action type → transition.
pub struct DispatchTable<S, A> {
    entries: HashMap<String, Transition<S, A>>,
}

impl<S, A> DispatchTable<S, A> {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `transition` for `action_type`.
    ///
    /// An existing entry for the same type is replaced. Returns `true` when
    /// that happened.
    pub fn insert<F>(&mut self, action_type: impl Into<String>, transition: F) -> bool
    where
        F: Fn(&S, &A) -> S + Send + Sync + 'static,
    {
        self.insert_transition(action_type, Arc::new(transition))
    }

    /// Register an already shared transition. See [`DispatchTable::insert`].
    pub fn insert_transition(
        &mut self,
        action_type: impl Into<String>,
        transition: Transition<S, A>,
    ) -> bool {
        let action_type = action_type.into();
        let replaced = self.entries.insert(action_type.clone(), transition).is_some();
        if replaced {
            tracing::debug!(action_type = %action_type, "replaced existing transition");
        }
        replaced
    }

    /// Move every entry of `other` into this table. Later entries win.
    pub fn extend(&mut self, other: Self) {
        for (action_type, transition) in other.entries {
            self.insert_transition(action_type, transition);
        }
    }

    /// Transition registered for `action_type`.
    #[must_use]
    pub fn get(&self, action_type: &str) -> Option<&Transition<S, A>> {
        self.entries.get(action_type)
    }

    /// Whether `action_type` has a transition.
    #[must_use]
    pub fn contains(&self, action_type: &str) -> bool {
        self.entries.contains_key(action_type)
    }

    /// Number of registered action types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no action type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered action types, sorted.
    #[must_use]
    pub fn action_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl<S, A> Default for DispatchTable<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Clone for DispatchTable<S, A> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<S, A> fmt::Debug for DispatchTable<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("action_types", &self.action_types())
            .finish()
    }
}

/// Reducer driven by a [`DispatchTable`].
///
/// Created by [`create_reducer`].
pub struct TableReducer<S, A> {
    initial_state: S,
    table: DispatchTable<S, A>,
}

impl<S, A> TableReducer<S, A> {
    /// The table this reducer dispatches through.
    #[must_use]
    pub const fn table(&self) -> &DispatchTable<S, A> {
        &self.table
    }
}

impl<S: Clone, A> Clone for TableReducer<S, A> {
    fn clone(&self) -> Self {
        Self {
            initial_state: self.initial_state.clone(),
            table: self.table.clone(),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for TableReducer<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableReducer")
            .field("initial_state", &self.initial_state)
            .field("table", &self.table)
            .finish()
    }
}

impl<S, A> Reducer for TableReducer<S, A>
where
    S: Clone,
    A: TypedAction,
{
    type State = S;
    type Action = A;

    fn initial_state(&self) -> S {
        self.initial_state.clone()
    }

    fn reduce(&self, state: &S, action: &A) -> S {
        let action_type = action.action_type();
        if let Some(transition) = self.table.get(action_type) {
            tracing::trace!(action_type, "applying transition");
            transition(state, action)
        } else {
            tracing::trace!(action_type, "no transition registered, passing state through");
            state.clone()
        }
    }
}

/// Build a reducer that starts from `initial_state` and dispatches through `table`.
#[must_use]
pub fn create_reducer<S, A>(initial_state: S, table: DispatchTable<S, A>) -> TableReducer<S, A> {
    TableReducer {
        initial_state,
        table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{AsyncAction, create_action};
    use serde_json::Value;

    fn counter() -> TableReducer<i64, AsyncAction> {
        let mut table = DispatchTable::new();
        table.insert("INCREMENT", |count: &i64, _: &AsyncAction| count + 1);
        table.insert("DOUBLE", |count: &i64, _: &AsyncAction| count * 2);
        create_reducer(10, table)
    }

    #[test]
    fn test_matching_action_applies_transition() {
        let reducer = counter();
        assert_eq!(reducer.reduce(&3, &create_action("INCREMENT").empty()), 4);
        assert_eq!(reducer.reduce(&3, &create_action("DOUBLE").empty()), 6);
    }

    #[test]
    fn test_unknown_action_passes_through() {
        let reducer = counter();
        assert_eq!(reducer.reduce(&3, &AsyncAction::new("UNKNOWN", Value::Null)), 3);
    }

    #[test]
    fn test_missing_state_uses_initial() {
        let reducer = counter();
        let increment = create_action("INCREMENT").empty();
        assert_eq!(reducer.reduce_or_init(None, Some(&increment)), 11);
    }

    #[test]
    fn test_missing_action_returns_state() {
        let reducer = counter();
        assert_eq!(reducer.reduce_or_init(None, None), 10);
        assert_eq!(reducer.reduce_or_init(Some(&7), None), 7);
    }

    #[test]
    fn test_insert_replaces_existing_entry() {
        let mut table: DispatchTable<i64, AsyncAction> = DispatchTable::new();
        assert!(!table.insert("SET", |_: &i64, _: &AsyncAction| 1));
        assert!(table.insert("SET", |_: &i64, _: &AsyncAction| 2));
        assert_eq!(table.len(), 1);

        let reducer = create_reducer(0, table);
        assert_eq!(reducer.reduce(&0, &create_action("SET").empty()), 2);
    }

    #[test]
    fn test_extend_is_last_write_wins() {
        let mut first: DispatchTable<i64, AsyncAction> = DispatchTable::new();
        first.insert("A", |_: &i64, _: &AsyncAction| 1);
        first.insert("B", |_: &i64, _: &AsyncAction| 1);

        let mut second = DispatchTable::new();
        second.insert("B", |_: &i64, _: &AsyncAction| 2);

        first.extend(second);
        assert_eq!(first.action_types(), vec!["A", "B"]);

        let reducer = create_reducer(0, first);
        assert_eq!(reducer.reduce(&0, &create_action("B").empty()), 2);
    }
}
