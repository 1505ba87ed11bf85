//! Action sets: the six related actions of one tracked operation.
//!
//! Every set is keyed by a store key. Each stage's type tag is the stage name
//! uppercased followed by the key, so `create_async_action_set("LIST")` yields
//! `START_LIST`, `PROGRESS_LIST`, `DONE_LIST`, `ERROR_LIST`, `CANCEL_LIST` and
//! `RESET_LIST`.
//!
//! Store keys are not checked for uniqueness. Two sets created from the same
//! key produce identical type tags and drive the same transitions.

use crate::action::{ActionCreator, TypedAction, create_action};
use std::fmt;
use std::str::FromStr;

/// A lifecycle step of a tracked operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// The operation was kicked off.
    Start,
    /// Partial data arrived while still in flight.
    Progress,
    /// The operation finished successfully.
    Done,
    /// The operation failed.
    Error,
    /// The operation was abandoned.
    Cancel,
    /// Back to the not-started state.
    Reset,
}

impl Stage {
    /// All stages, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Start,
        Self::Progress,
        Self::Done,
        Self::Error,
        Self::Cancel,
        Self::Reset,
    ];

    /// Hook name of the stage, as used in hook maps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Progress => "progress",
            Self::Done => "done",
            Self::Error => "error",
            Self::Cancel => "cancel",
            Self::Reset => "reset",
        }
    }

    /// Uppercased prefix of the stage's action types.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Progress => "PROGRESS",
            Self::Done => "DONE",
            Self::Error => "ERROR",
            Self::Cancel => "CANCEL",
            Self::Reset => "RESET",
        }
    }

    /// Action type of this stage for `store_key`.
    #[must_use]
    pub fn action_type(self, store_key: &str) -> String {
        format!("{}_{store_key}", self.tag())
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hook name that is not a stage.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown stage `{0}`")]
pub struct UnknownStage(pub String);

impl FromStr for Stage {
    type Err = UnknownStage;

    /// Parses a hook name. `flush` is accepted as another name for `progress`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "start" => Ok(Self::Start),
            "progress" | "flush" => Ok(Self::Progress),
            "done" => Ok(Self::Done),
            "error" => Ok(Self::Error),
            "cancel" => Ok(Self::Cancel),
            "reset" => Ok(Self::Reset),
            other => Err(UnknownStage(other.to_string())),
        }
    }
}

/// The type tags of every stage for one store key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageTypes {
    types: [String; 6],
}

impl StageTypes {
    /// Type tag of `stage`.
    #[must_use]
    pub fn get(&self, stage: Stage) -> &str {
        &self.types[stage.index()]
    }

    /// `(stage, type)` pairs in lifecycle order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &str)> {
        Stage::ALL.into_iter().zip(self.types.iter().map(String::as_str))
    }
}

/// Derive the stage type tags for `store_key` without building creators.
#[must_use]
pub fn stage_types(store_key: &str) -> StageTypes {
    StageTypes {
        types: Stage::ALL.map(|stage| stage.action_type(store_key)),
    }
}

/// The action creators of one tracked operation.
///
/// Displays as its store key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsyncActionSet {
    store_key: String,
    creators: [ActionCreator; 6],
}

impl AsyncActionSet {
    /// Key this set was created from.
    #[must_use]
    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    /// Creator for `stage`.
    #[must_use]
    pub fn stage(&self, stage: Stage) -> &ActionCreator {
        &self.creators[stage.index()]
    }

    /// Creator of the start action.
    #[must_use]
    pub fn start(&self) -> &ActionCreator {
        self.stage(Stage::Start)
    }

    /// Creator of the progress action.
    #[must_use]
    pub fn progress(&self) -> &ActionCreator {
        self.stage(Stage::Progress)
    }

    /// Creator of the done action.
    #[must_use]
    pub fn done(&self) -> &ActionCreator {
        self.stage(Stage::Done)
    }

    /// Creator of the error action.
    #[must_use]
    pub fn error(&self) -> &ActionCreator {
        self.stage(Stage::Error)
    }

    /// Creator of the cancel action.
    #[must_use]
    pub fn cancel(&self) -> &ActionCreator {
        self.stage(Stage::Cancel)
    }

    /// Creator of the reset action.
    #[must_use]
    pub fn reset(&self) -> &ActionCreator {
        self.stage(Stage::Reset)
    }

    /// Type tags of this set.
    #[must_use]
    pub fn types(&self) -> StageTypes {
        stage_types(&self.store_key)
    }

    /// The stage `action` belongs to, if it was produced by this set.
    #[must_use]
    pub fn stage_of(&self, action: &impl TypedAction) -> Option<Stage> {
        Stage::ALL
            .into_iter()
            .find(|stage| self.stage(*stage).matches(action))
    }

    /// Whether `action` was produced by this set.
    #[must_use]
    pub fn owns(&self, action: &impl TypedAction) -> bool {
        self.stage_of(action).is_some()
    }
}

impl fmt::Display for AsyncActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.store_key)
    }
}

/// Create the action set for `store_key`.
#[must_use]
pub fn create_async_action_set(store_key: impl Into<String>) -> AsyncActionSet {
    let store_key = store_key.into();
    let creators = Stage::ALL.map(|stage| create_action(stage.action_type(&store_key)));
    AsyncActionSet {
        store_key,
        creators,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::action::AsyncAction;
    use serde_json::Value;

    #[test]
    fn test_set_displays_as_store_key() {
        let actions = create_async_action_set("TEST");
        assert_eq!(actions.to_string(), "TEST");
        assert_eq!(actions.store_key(), "TEST");
    }

    #[test]
    fn test_stage_types_are_prefixed() {
        let actions = create_async_action_set("TEST");
        assert_eq!(actions.start().to_string(), "START_TEST");
        assert_eq!(actions.progress().to_string(), "PROGRESS_TEST");
        assert_eq!(actions.done().to_string(), "DONE_TEST");
        assert_eq!(actions.error().to_string(), "ERROR_TEST");
        assert_eq!(actions.cancel().to_string(), "CANCEL_TEST");
        assert_eq!(actions.reset().to_string(), "RESET_TEST");
    }

    #[test]
    fn test_store_key_case_is_kept() {
        let actions = create_async_action_set("list");
        assert_eq!(actions.done().action_type(), "DONE_list");
    }

    #[test]
    fn test_stage_types_match_creators() {
        let actions = create_async_action_set("TEST");
        for (stage, action_type) in stage_types("TEST").iter() {
            assert_eq!(actions.stage(stage).action_type(), action_type);
        }
    }

    #[test]
    fn test_flush_is_progress() {
        assert_eq!("flush".parse::<Stage>(), Ok(Stage::Progress));
        assert_eq!("progress".parse::<Stage>(), Ok(Stage::Progress));
        assert!("sugar".parse::<Stage>().is_err());
    }

    #[test]
    fn test_unknown_stage_error_names_key() {
        let err = "finish".parse::<Stage>().unwrap_err();
        assert_eq!(err, UnknownStage("finish".to_string()));
        assert_eq!(err.to_string(), "unknown stage `finish`");
    }

    #[test]
    fn test_owns_and_stage_of() {
        let list = create_async_action_set("LIST");
        let other = create_async_action_set("OTHER");

        assert_eq!(list.stage_of(&list.cancel().empty()), Some(Stage::Cancel));
        assert!(!list.owns(&other.start().empty()));
        assert!(!list.owns(&AsyncAction::new("START_LIST2", Value::Null)));
    }

    #[test]
    fn test_colliding_keys_alias() {
        let first = create_async_action_set("SAME");
        let second = create_async_action_set("SAME");
        assert_eq!(first, second);
        assert!(first.owns(&second.done().empty()));
    }
}
