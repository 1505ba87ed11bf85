//! The async state node and its lifecycle.
//!
//! A tracked operation is represented by an [`AsyncStateNode`]:
//!
//! ```text
//! NONE ──start──▶ STARTED ──done──▶ DONE
//!                    │  ▲   ──error─▶ ERROR
//!                progress   ──cancel▶ CANCELLED
//!
//! any ──reset──▶ NONE          any ──start──▶ STARTED
//! ```
//!
//! There are no guards. Whatever stage action arrives fires its transition,
//! so an operation can be retried, cancelled or reset from any state.
//!
//! Transitions never touch the previous node. Each one computes the new
//! `payload` and `error` with a [`Hook`] applied to the previous value of the
//! same field, and stamps the stage's fixed status.

use crate::action::AsyncAction;
use crate::action_set::Stage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Error value stored by the default cancel transition.
pub const CANCELLED_ERROR: &str = "cancelled";

static NULL: Value = Value::Null;

/// Reducer for a single field: `(previous value, action) -> new value`.
pub type Hook = Arc<dyn Fn(&Value, &AsyncAction) -> Value + Send + Sync>;

/// Lifecycle status. The not-started state is `None` on the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AsyncStatus {
    /// In flight.
    Started,
    /// Finished successfully.
    Done,
    /// Failed.
    Error,
    /// Abandoned.
    Cancelled,
}

impl AsyncStatus {
    /// Status written by `stage`'s transition. `None` for reset.
    #[must_use]
    pub const fn for_stage(stage: Stage) -> Option<Self> {
        match stage {
            Stage::Start | Stage::Progress => Some(Self::Started),
            Stage::Done => Some(Self::Done),
            Stage::Error => Some(Self::Error),
            Stage::Cancel => Some(Self::Cancelled),
            Stage::Reset => None,
        }
    }
}

/// `{status, payload, error}` for one tracked operation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AsyncStateNode {
    /// Current status. `None` means not started.
    #[serde(default)]
    pub status: Option<AsyncStatus>,

    /// Last data written by a hook.
    #[serde(default)]
    pub payload: Value,

    /// Last error written by a hook.
    #[serde(default)]
    pub error: Value,
}

impl AsyncStateNode {
    /// A not-started node holding `initial_payload`.
    #[must_use]
    pub const fn initial(initial_payload: Value) -> Self {
        state_shape(None, initial_payload, Value::Null)
    }

    /// Read a node out of arbitrary JSON.
    ///
    /// Missing fields, non-object input and unknown statuses all degrade to
    /// the not-started defaults instead of failing.
    #[must_use]
    pub fn from_json(raw: &Value) -> Self {
        let field = |name: &str| raw.get(name).cloned().unwrap_or(Value::Null);
        Self {
            status: raw
                .get("status")
                .and_then(|status| serde_json::from_value(status.clone()).ok()),
            payload: field("payload"),
            error: field("error"),
        }
    }

    /// See [`is_loading`].
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == Some(AsyncStatus::Started)
    }

    /// See [`is_done`].
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == Some(AsyncStatus::Done)
    }

    /// See [`has_error`].
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.status == Some(AsyncStatus::Error)
    }

    /// See [`is_cancelled`].
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == Some(AsyncStatus::Cancelled)
    }

    /// See [`get_error`].
    #[must_use]
    pub fn error_value(&self) -> &Value {
        match self.status {
            Some(AsyncStatus::Error | AsyncStatus::Cancelled) => &self.error,
            _ => &NULL,
        }
    }
}

/// Build a node from its three fields.
#[must_use]
pub const fn state_shape(status: Option<AsyncStatus>, payload: Value, error: Value) -> AsyncStateNode {
    AsyncStateNode {
        status,
        payload,
        error,
    }
}

// Predicates accept `&node`, `Some(&node)` or `None`; a missing node reads as not started.

/// The operation is in flight.
pub fn is_loading<'a>(node: impl Into<Option<&'a AsyncStateNode>>) -> bool {
    node.into().is_some_and(AsyncStateNode::is_loading)
}

/// The operation finished successfully. Errors and cancellations are not done.
pub fn is_done<'a>(node: impl Into<Option<&'a AsyncStateNode>>) -> bool {
    node.into().is_some_and(AsyncStateNode::is_done)
}

/// The operation failed. Cancellation is reported by [`is_cancelled`] instead.
pub fn has_error<'a>(node: impl Into<Option<&'a AsyncStateNode>>) -> bool {
    node.into().is_some_and(AsyncStateNode::has_error)
}

/// The operation was cancelled.
pub fn is_cancelled<'a>(node: impl Into<Option<&'a AsyncStateNode>>) -> bool {
    node.into().is_some_and(AsyncStateNode::is_cancelled)
}

/// The payload, verbatim. `null` for a missing node.
pub fn get_payload<'a>(node: impl Into<Option<&'a AsyncStateNode>>) -> Value {
    node.into()
        .map_or(Value::Null, |node| node.payload.clone())
}

/// The error field while failed or cancelled, otherwise `null`.
pub fn get_error<'a>(node: impl Into<Option<&'a AsyncStateNode>>) -> Value {
    node.into()
        .map_or(Value::Null, |node| node.error_value().clone())
}

/// JavaScript truthiness: `null`, `false`, `0`, and `""` are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Default field hooks.
pub mod hooks {
    use super::{CANCELLED_ERROR, Hook, is_truthy};
    use crate::action::AsyncAction;
    use serde_json::Value;
    use std::sync::Arc;

    /// `action.payload || previous`.
    ///
    /// A falsy payload (`0`, `""`, `false`) keeps the previous value rather than
    /// replacing it.
    #[must_use]
    pub fn passthrough() -> Hook {
        Arc::new(|previous: &Value, action: &AsyncAction| {
            if is_truthy(&action.payload) {
                action.payload.clone()
            } else {
                previous.clone()
            }
        })
    }

    /// Always `null`.
    #[must_use]
    pub fn nullify() -> Hook {
        Arc::new(|_: &Value, _: &AsyncAction| Value::Null)
    }

    /// `initial || null`, ignoring both the previous value and the action.
    #[must_use]
    pub fn initial_value(initial: Value) -> Hook {
        let value = if is_truthy(&initial) { initial } else { Value::Null };
        Arc::new(move |_: &Value, _: &AsyncAction| value.clone())
    }

    /// Always [`CANCELLED_ERROR`].
    #[must_use]
    pub fn cancelled_sentinel() -> Hook {
        Arc::new(|_: &Value, _: &AsyncAction| Value::String(CANCELLED_ERROR.to_string()))
    }
}

/// Payload hook used for `stage` when none is configured.
#[must_use]
pub fn default_payload_hook(stage: Stage, initial_payload: &Value) -> Hook {
    match stage {
        Stage::Start | Stage::Progress | Stage::Done => hooks::passthrough(),
        Stage::Error | Stage::Cancel => hooks::nullify(),
        Stage::Reset => hooks::initial_value(initial_payload.clone()),
    }
}

/// Error hook used for `stage` when none is configured.
#[must_use]
pub fn default_error_hook(stage: Stage) -> Hook {
    match stage {
        Stage::Start | Stage::Progress | Stage::Done | Stage::Reset => hooks::nullify(),
        Stage::Error => hooks::passthrough(),
        Stage::Cancel => hooks::cancelled_sentinel(),
    }
}

/// The transition for one stage: a fixed status and one hook per field.
#[derive(Clone)]
pub struct StageTransition {
    status: Option<AsyncStatus>,
    payload: Hook,
    error: Hook,
}

impl StageTransition {
    /// Transition into `status`, computing each field with its hook.
    #[must_use]
    pub fn new(status: Option<AsyncStatus>, payload: Hook, error: Hook) -> Self {
        Self {
            status,
            payload,
            error,
        }
    }

    /// Transition for `stage`, falling back to the stage defaults for missing hooks.
    #[must_use]
    pub fn for_stage(
        stage: Stage,
        initial_payload: &Value,
        payload: Option<Hook>,
        error: Option<Hook>,
    ) -> Self {
        Self::new(
            AsyncStatus::for_stage(stage),
            payload.unwrap_or_else(|| default_payload_hook(stage, initial_payload)),
            error.unwrap_or_else(|| default_error_hook(stage)),
        )
    }

    /// Status this transition writes.
    #[must_use]
    pub const fn status(&self) -> Option<AsyncStatus> {
        self.status
    }

    /// Produce the next node. `node` is left untouched.
    #[must_use]
    pub fn apply(&self, node: &AsyncStateNode, action: &AsyncAction) -> AsyncStateNode {
        state_shape(
            self.status,
            (self.payload)(&node.payload, action),
            (self.error)(&node.error, action),
        )
    }
}

impl std::fmt::Debug for StageTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageTransition")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
