//! Reducer composition utilities
//!
//! An application usually tracks several operations in one state value. This
//! module mounts operation reducers into that larger state:
//! - **`scope_reducer`**: Focus a reducer on one field of a larger state
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//!
//! Composed reducers stay independent: every operation's node is only touched
//! by its own actions.
//!
//! # Example
//!
//! ```
//! use resynchronize_core::composition::{combine_reducers, scope_reducer};
//! use resynchronize_core::prelude::*;
//! use serde_json::{Value, json};
//!
//! #[derive(Clone, Debug, Default)]
//! struct AppState {
//!     users: AsyncStateNode,
//!     orders: AsyncStateNode,
//! }
//!
//! # fn main() -> resynchronize_core::error::Result<()> {
//! let users = create_async_action_set("USERS");
//! let orders = create_async_action_set("ORDERS");
//!
//! let app = combine_reducers(vec![
//!     Box::new(scope_reducer(
//!         create_async_reducer(Value::Null, &Handler::from(&users), None)?,
//!         |app: &AppState| &app.users,
//!         |app: &mut AppState, node| app.users = node,
//!     )),
//!     Box::new(scope_reducer(
//!         create_async_reducer(Value::Null, &Handler::from(&orders), None)?,
//!         |app: &AppState| &app.orders,
//!         |app: &mut AppState, node| app.orders = node,
//!     )),
//! ]);
//!
//! let state = app.reduce(&app.initial_state(), &users.start().empty());
//! assert!(is_loading(&state.users));
//! assert!(!is_loading(&state.orders));
//! # Ok(())
//! # }
//! ```

use crate::reducer::Reducer;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, each one receiving the state produced by
/// the previous one. The initial state is `S::default()` seeded by every
/// reducer in order, so scoped children keep their own initial values.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type
#[must_use]
pub fn combine_reducers<S, A>(
    reducers: Vec<Box<dyn Reducer<State = S, Action = A> + Send + Sync>>,
) -> CombinedReducer<S, A>
where
    S: Clone + Default + 'static,
    A: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A>
where
    S: Clone + Default + 'static,
    A: 'static,
{
    reducers: Vec<Box<dyn Reducer<State = S, Action = A> + Send + Sync>>,
}

impl<S, A> CombinedReducer<S, A>
where
    S: Clone + Default + 'static,
    A: 'static,
{
    /// Number of combined reducers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no reducer was combined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A> Reducer for CombinedReducer<S, A>
where
    S: Clone + Default + 'static,
    A: 'static,
{
    type State = S;
    type Action = A;

    fn initial_state(&self) -> S {
        self.seed(S::default())
    }

    fn seed(&self, state: S) -> S {
        self.reducers
            .iter()
            .fold(state, |state, reducer| reducer.seed(state))
    }

    fn reduce(&self, state: &S, action: &A) -> S {
        self.reducers
            .iter()
            .fold(state.clone(), |state, reducer| reducer.reduce(&state, action))
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// The initial parent state is `P::default()` with the child's initial state
/// written into it.
///
/// # Type Parameters
///
/// - `P`: The parent state type
/// - `R`: The child reducer
pub fn scope_reducer<P, R>(
    reducer: R,
    get_state: fn(&P) -> &R::State,
    set_state: fn(&mut P, R::State),
) -> ScopedReducer<P, R>
where
    P: Clone + Default,
    R: Reducer,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<P, R>
where
    R: Reducer,
{
    reducer: R,
    get_state: fn(&P) -> &R::State,
    set_state: fn(&mut P, R::State),
}

impl<P, R> Reducer for ScopedReducer<P, R>
where
    P: Clone + Default,
    R: Reducer,
{
    type State = P;
    type Action = R::Action;

    fn initial_state(&self) -> P {
        self.seed(P::default())
    }

    fn seed(&self, mut parent: P) -> P {
        (self.set_state)(&mut parent, self.reducer.initial_state());
        parent
    }

    fn reduce(&self, state: &P, action: &R::Action) -> P {
        let child = self.reducer.reduce((self.get_state)(state), action);

        let mut parent = state.clone();
        (self.set_state)(&mut parent, child);
        parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TestState {
        counter: i32,
        name: String,
    }

    #[derive(Clone)]
    enum TestAction {
        Increment,
        Decrement,
        SetName(String),
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = TestState;
        type Action = TestAction;

        fn initial_state(&self) -> TestState {
            TestState::default()
        }

        fn reduce(&self, state: &TestState, action: &TestAction) -> TestState {
            match action {
                TestAction::Increment => TestState {
                    counter: state.counter + 1,
                    ..state.clone()
                },
                TestAction::Decrement => TestState {
                    counter: state.counter - 1,
                    ..state.clone()
                },
                TestAction::SetName(_) => state.clone(),
            }
        }
    }

    struct NameReducer;

    impl Reducer for NameReducer {
        type State = TestState;
        type Action = TestAction;

        fn initial_state(&self) -> TestState {
            TestState::default()
        }

        fn reduce(&self, state: &TestState, action: &TestAction) -> TestState {
            if let TestAction::SetName(name) = action {
                TestState {
                    name: name.clone(),
                    ..state.clone()
                }
            } else {
                state.clone()
            }
        }
    }

    #[test]
    fn test_combine_reducers() {
        let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);
        assert_eq!(combined.len(), 2);

        let state = combined.initial_state();

        // Test counter reducer
        let state = combined.reduce(&state, &TestAction::Increment);
        assert_eq!(state.counter, 1);

        // Test name reducer
        let state = combined.reduce(&state, &TestAction::SetName("Alice".to_string()));
        assert_eq!(state.name, "Alice");

        // Both reducers work
        let state = combined.reduce(&state, &TestAction::Decrement);
        assert_eq!(state.counter, 0);
        assert_eq!(state.name, "Alice");
    }

    #[test]
    fn test_combine_reducers_leaves_input_untouched() {
        let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);
        let before = TestState {
            counter: 5,
            name: "Bob".to_string(),
        };
        let _ = combined.reduce(&before, &TestAction::Increment);
        assert_eq!(before.counter, 5);
    }

    // Scoped reducer tests
    #[derive(Clone, Debug, Default, PartialEq)]
    struct SubState {
        value: i32,
    }

    enum SubAction {
        Add(i32),
        Multiply(i32),
    }

    struct SubReducer;

    impl Reducer for SubReducer {
        type State = SubState;
        type Action = SubAction;

        fn initial_state(&self) -> SubState {
            SubState { value: 1 }
        }

        fn reduce(&self, state: &SubState, action: &SubAction) -> SubState {
            match action {
                SubAction::Add(n) => SubState {
                    value: state.value + n,
                },
                SubAction::Multiply(n) => SubState {
                    value: state.value * n,
                },
            }
        }
    }

    #[derive(Clone, Default)]
    struct ParentState {
        sub: SubState,
        other: String,
    }

    #[test]
    fn test_scope_reducer() {
        let scoped = scope_reducer(
            SubReducer,
            |parent: &ParentState| &parent.sub,
            |parent: &mut ParentState, sub: SubState| {
                parent.sub = sub;
            },
        );

        let state = ParentState {
            sub: SubState { value: 5 },
            other: "test".to_string(),
        };

        // Test scoped operations
        let state = scoped.reduce(&state, &SubAction::Add(3));
        assert_eq!(state.sub.value, 8);
        assert_eq!(state.other, "test"); // Other state unchanged

        let state = scoped.reduce(&state, &SubAction::Multiply(2));
        assert_eq!(state.sub.value, 16);
        assert_eq!(state.other, "test");
    }

    #[test]
    fn test_scope_reducer_initial_state() {
        let scoped = scope_reducer(
            SubReducer,
            |parent: &ParentState| &parent.sub,
            |parent: &mut ParentState, sub: SubState| parent.sub = sub,
        );
        assert_eq!(scoped.initial_state().sub, SubState { value: 1 });
    }

    #[derive(Clone, Debug, Default)]
    struct PairState {
        left: SubState,
        right: SubState,
    }

    #[test]
    fn test_combined_initial_state_seeds_scoped_children() {
        let combined = combine_reducers(vec![
            Box::new(scope_reducer(
                SubReducer,
                |pair: &PairState| &pair.left,
                |pair: &mut PairState, sub: SubState| pair.left = sub,
            )),
            Box::new(scope_reducer(
                SubReducer,
                |pair: &PairState| &pair.right,
                |pair: &mut PairState, sub: SubState| pair.right = sub,
            )),
        ]);

        let initial = combined.initial_state();
        assert_eq!(initial.left, SubState { value: 1 });
        assert_eq!(initial.right, SubState { value: 1 });

        let state = combined.reduce_or_init(None, Some(&SubAction::Add(2)));
        assert_eq!(state.left.value, 3);
        assert_eq!(state.right.value, 3);
    }
}
