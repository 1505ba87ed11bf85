//! Actions and action creators.
//!
//! An [`AsyncAction`] is the unit the reducer runtime consumes: a type tag and an
//! arbitrary JSON payload. An [`ActionCreator`] is the reusable constructor for
//! one type tag, and displays as that tag so it can be used wherever a key is
//! expected.
//!
//! # Example
//!
//! ```
//! use resynchronize_core::action::create_action;
//! use serde_json::json;
//!
//! let select = create_action("SELECT_ITEM");
//! assert_eq!(select.to_string(), "SELECT_ITEM");
//!
//! let action = select.create(json!(42));
//! assert_eq!(action.action_type(), "SELECT_ITEM");
//! assert_eq!(action.payload, json!(42));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Anything the reducer runtime can route by type tag.
pub trait TypedAction {
    /// The exact string the dispatch table is keyed by.
    fn action_type(&self) -> &str;
}

/// A dispatched action: `{ "type": ..., "payload": ... }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsyncAction {
    #[serde(rename = "type")]
    action_type: String,

    /// Arbitrary payload carried by the action. `null` when created without one.
    #[serde(default)]
    pub payload: Value,
}

impl AsyncAction {
    /// Build an action directly from a type tag and payload.
    #[must_use]
    pub fn new(action_type: impl Into<String>, payload: Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }

    /// The type tag of this action.
    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }
}

impl TypedAction for AsyncAction {
    fn action_type(&self) -> &str {
        &self.action_type
    }
}

/// Constructor for actions of a single type.
///
/// Cloning is cheap; the type tag is shared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionCreator {
    action_type: Arc<str>,
}

impl ActionCreator {
    /// The type tag every action from this creator carries.
    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Create an action carrying `payload`.
    #[must_use]
    pub fn create(&self, payload: Value) -> AsyncAction {
        AsyncAction::new(self.action_type.as_ref(), payload)
    }

    /// Create an action with a `null` payload.
    #[must_use]
    pub fn empty(&self) -> AsyncAction {
        self.create(Value::Null)
    }

    /// Whether `action` was produced for this creator's type.
    #[must_use]
    pub fn matches(&self, action: &impl TypedAction) -> bool {
        action.action_type() == self.action_type()
    }
}

impl fmt::Display for ActionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action_type)
    }
}

impl AsRef<str> for ActionCreator {
    fn as_ref(&self) -> &str {
        &self.action_type
    }
}

/// Create an action creator for `action_type`.
///
/// The tag is not validated; an empty string produces a creator whose actions
/// only match an empty key.
#[must_use]
pub fn create_action(action_type: impl Into<String>) -> ActionCreator {
    ActionCreator {
        action_type: Arc::from(action_type.into()),
    }
}
