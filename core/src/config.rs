//! Reducer configuration: from handler arguments to a dispatch table.
//!
//! A reducer is configured with a payload handler and an optional error
//! handler. Each handler is either
//!
//! - a single [`AsyncActionSet`], wired up with the default hooks, or
//! - a map whose entries are action sets (defaults again) or [`HookMap`]s
//!   keyed by the store key of the set they customize.
//!
//! Building runs in four steps:
//!
//! 1. [`format_handler`] normalizes each handler into store key → [`HandlerConfig`],
//!    validating every hook map on the way.
//! 2. [`merge_handlers`] takes the union of store keys from both handlers.
//! 3. [`create_actions_handler`] emits one transition per stage for each key,
//!    combining the stage status with the payload and error hooks (or defaults).
//! 4. The entries are collected into one [`DispatchTable`], paired with the
//!    initial node.
//!
//! # Example
//!
//! ```
//! use resynchronize_core::config::{Handler, HookMap, create_async_reducer};
//! use resynchronize_core::action_set::{Stage, create_async_action_set};
//! use resynchronize_core::reducer::Reducer;
//! use resynchronize_core::state::get_payload;
//! use serde_json::{Value, json};
//!
//! # fn main() -> resynchronize_core::error::Result<()> {
//! let list = create_async_action_set("LIST");
//! let add_item = create_async_action_set("ADD_ITEM");
//!
//! let payload = Handler::map()
//!     .with_set(&list)
//!     .with_hooks(&add_item, HookMap::new().on(Stage::Done, |items: &Value, action| {
//!         let mut items = items.as_array().cloned().unwrap_or_default();
//!         items.push(action.payload.clone());
//!         Value::Array(items)
//!     }));
//!
//! let reducer = create_async_reducer(json!([]), &payload, None)?;
//!
//! let state = reducer.reduce(&reducer.initial_state(), &list.done().create(json!(["a"])));
//! let state = reducer.reduce(&state, &add_item.done().create(json!("b")));
//! assert_eq!(get_payload(&state), json!(["a", "b"]));
//! # Ok(())
//! # }
//! ```

use crate::action::AsyncAction;
use crate::action_set::{AsyncActionSet, Stage, stage_types};
use crate::error::{ConfigShapeError, Result};
use crate::runtime::{DispatchTable, TableReducer, create_reducer};
use crate::state::{AsyncStateNode, Hook, StageTransition};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Dispatch table over async state nodes.
pub type AsyncDispatchTable = DispatchTable<AsyncStateNode, AsyncAction>;

/// Reducer over async state nodes.
pub type AsyncReducer = TableReducer<AsyncStateNode, AsyncAction>;

/// A value in a [`HookMap`]: either a hook or something that is not callable.
#[derive(Clone)]
pub enum HookSlot {
    /// A field reducer.
    Function(Hook),
    /// Anything else. Always rejected by validation.
    Value(Value),
}

impl fmt::Debug for HookSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("HookSlot::Function(<hook>)"),
            Self::Value(value) => f.debug_tuple("HookSlot::Value").field(value).finish(),
        }
    }
}

/// Unvalidated hooks keyed by name, in insertion order.
///
/// [`validate_config`] turns it into a [`HandlerConfig`].
#[derive(Clone, Debug, Default)]
pub struct HookMap {
    entries: Vec<(String, HookSlot)>,
}

impl HookMap {
    /// An empty map. Invalid until at least one hook is added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook for `stage`.
    #[must_use]
    pub fn on<F>(self, stage: Stage, hook: F) -> Self
    where
        F: Fn(&Value, &AsyncAction) -> Value + Send + Sync + 'static,
    {
        self.with(stage.name(), HookSlot::Function(Arc::new(hook)))
    }

    /// Add an arbitrary entry. The key is not checked until validation.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, slot: HookSlot) -> Self {
        self.entries.push((key.into(), slot));
        self
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Validated per-stage hooks. Stages without a hook use the defaults.
#[derive(Clone, Default)]
pub struct HandlerConfig {
    hooks: [Option<Hook>; 6],
}

impl HandlerConfig {
    /// Hook configured for `stage`.
    #[must_use]
    pub fn hook(&self, stage: Stage) -> Option<&Hook> {
        self.hooks[stage.index()].as_ref()
    }

    /// Stages that have a hook.
    #[must_use]
    pub fn stages(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|stage| self.hook(*stage).is_some())
            .collect()
    }
}

impl fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerConfig")
            .field("stages", &self.stages())
            .finish()
    }
}

/// Check a hook map and convert it into a [`HandlerConfig`].
///
/// Valid maps have at least one entry, and every key is a hook name mapped
/// to a function. When a key repeats (including `flush` next to `progress`)
/// the later hook wins.
///
/// # Errors
///
/// - [`ConfigShapeError::EmptyConfig`] if the map has no entries.
/// - [`ConfigShapeError::UnknownHook`] for a key that is not a hook name.
/// - [`ConfigShapeError::HookNotAFunction`] for a value that is not a hook.
pub fn validate_config(hooks: &HookMap) -> Result<HandlerConfig> {
    if hooks.is_empty() {
        return Err(ConfigShapeError::EmptyConfig);
    }

    let mut config = HandlerConfig::default();
    for (key, slot) in &hooks.entries {
        let stage: Stage = key
            .parse()
            .map_err(|_| ConfigShapeError::UnknownHook { key: key.clone() })?;
        let HookSlot::Function(hook) = slot else {
            return Err(ConfigShapeError::HookNotAFunction { key: key.clone() });
        };
        config.hooks[stage.index()] = Some(Arc::clone(hook));
    }
    Ok(config)
}

/// Boolean view of [`validate_config`].
#[must_use]
pub fn is_valid_config(hooks: &HookMap) -> bool {
    validate_config(hooks).is_ok()
}

/// A value in a handler map.
#[derive(Clone, Debug)]
pub enum HandlerEntry {
    /// Include this set with the default hooks.
    ActionSet(AsyncActionSet),
    /// Custom hooks for the set whose store key is the entry name.
    Hooks(HookMap),
    /// Anything else. Always rejected.
    Value(Value),
}

impl HandlerEntry {
    /// Whether this entry is a whole action set rather than a hook map.
    #[must_use]
    pub const fn is_async_action_set(&self) -> bool {
        matches!(self, Self::ActionSet(_))
    }
}

impl From<AsyncActionSet> for HandlerEntry {
    fn from(set: AsyncActionSet) -> Self {
        Self::ActionSet(set)
    }
}

impl From<HookMap> for HandlerEntry {
    fn from(hooks: HookMap) -> Self {
        Self::Hooks(hooks)
    }
}

/// A payload or error handler argument.
#[derive(Clone)]
pub enum Handler {
    /// A single set with the default hooks.
    ActionSet(AsyncActionSet),
    /// Named entries, in insertion order.
    Map(Vec<(String, HandlerEntry)>),
    /// A bare hook where a map was expected. Always rejected.
    Function(Hook),
    /// A scalar where a map was expected. Always rejected.
    Scalar(Value),
}

impl Handler {
    /// An empty map handler.
    #[must_use]
    pub const fn map() -> Self {
        Self::Map(Vec::new())
    }

    /// Same as [`Handler::map`]; reads better for an error handler with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self::map()
    }

    /// Whether this handler is a single action set.
    #[must_use]
    pub const fn is_async_action_set(&self) -> bool {
        matches!(self, Self::ActionSet(_))
    }

    /// Add a named entry. Non-map handlers are first turned into an empty map.
    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, entry: impl Into<HandlerEntry>) -> Self {
        let mut entries = match self {
            Self::Map(entries) => entries,
            Self::ActionSet(set) => vec![(set.store_key().to_string(), HandlerEntry::ActionSet(set))],
            Self::Function(_) | Self::Scalar(_) => Vec::new(),
        };
        entries.push((key.into(), entry.into()));
        Self::Map(entries)
    }

    /// Add `set` with the default hooks.
    #[must_use]
    pub fn with_set(self, set: &AsyncActionSet) -> Self {
        self.with_entry(set.store_key(), set.clone())
    }

    /// Add custom hooks for `set`.
    #[must_use]
    pub fn with_hooks(self, set: &AsyncActionSet, hooks: HookMap) -> Self {
        self.with_entry(set.store_key(), hooks)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActionSet(set) => f.debug_tuple("Handler::ActionSet").field(set).finish(),
            Self::Map(entries) => f.debug_tuple("Handler::Map").field(entries).finish(),
            Self::Function(_) => f.write_str("Handler::Function(<hook>)"),
            Self::Scalar(value) => f.debug_tuple("Handler::Scalar").field(value).finish(),
        }
    }
}

impl From<AsyncActionSet> for Handler {
    fn from(set: AsyncActionSet) -> Self {
        Self::ActionSet(set)
    }
}

impl From<&AsyncActionSet> for Handler {
    fn from(set: &AsyncActionSet) -> Self {
        Self::ActionSet(set.clone())
    }
}

/// Store key → hooks, after normalization.
pub type FormattedHandler = BTreeMap<String, HandlerConfig>;

/// Normalize a handler argument into store key → [`HandlerConfig`].
///
/// Action set entries are keyed by their own store key, whatever the entry
/// name. Hook map entries are keyed by the entry name. When two entries
/// resolve to the same key the later one wins.
///
/// # Errors
///
/// - [`ConfigShapeError::MissingHandler`] when `handler` is `None`.
/// - [`ConfigShapeError::NotAnObject`] for a bare function or scalar handler.
/// - [`ConfigShapeError::InvalidEntry`] for an entry that is neither an action
///   set nor a valid hook map.
pub fn format_handler(handler: Option<&Handler>) -> Result<FormattedHandler> {
    let handler = handler.ok_or(ConfigShapeError::MissingHandler)?;

    match handler {
        Handler::ActionSet(set) => Ok(BTreeMap::from([(
            set.store_key().to_string(),
            HandlerConfig::default(),
        )])),
        Handler::Map(entries) => {
            let mut formatted = BTreeMap::new();
            for (key, entry) in entries {
                match entry {
                    HandlerEntry::ActionSet(set) => {
                        formatted.insert(set.store_key().to_string(), HandlerConfig::default());
                    },
                    HandlerEntry::Hooks(hooks) => {
                        let config = validate_config(hooks).map_err(|reason| {
                            ConfigShapeError::InvalidEntry {
                                key: key.clone(),
                                reason: Box::new(reason),
                            }
                        })?;
                        formatted.insert(key.clone(), config);
                    },
                    HandlerEntry::Value(_) => {
                        return Err(ConfigShapeError::InvalidEntry {
                            key: key.clone(),
                            reason: Box::new(ConfigShapeError::NotAnObject),
                        });
                    },
                }
            }
            Ok(formatted)
        },
        Handler::Function(_) | Handler::Scalar(_) => Err(ConfigShapeError::NotAnObject),
    }
}

/// Union of the store keys of both formatted handlers, without repeats.
#[must_use]
pub fn merge_handlers(payload: &FormattedHandler, error: &FormattedHandler) -> BTreeSet<String> {
    payload.keys().chain(error.keys()).cloned().collect()
}

/// Dispatch entries for every stage of `store_key`.
///
/// Stages without a hook in `payload_hooks` / `error_hooks` use the defaults;
/// the reset payload default restores `initial_payload`.
#[must_use]
pub fn create_actions_handler(
    initial_payload: &Value,
    store_key: &str,
    payload_hooks: Option<&HandlerConfig>,
    error_hooks: Option<&HandlerConfig>,
) -> AsyncDispatchTable {
    let mut table = DispatchTable::new();
    for (stage, action_type) in stage_types(store_key).iter() {
        let transition = StageTransition::for_stage(
            stage,
            initial_payload,
            payload_hooks.and_then(|config| config.hook(stage)).cloned(),
            error_hooks.and_then(|config| config.hook(stage)).cloned(),
        );
        table.insert(action_type, move |node: &AsyncStateNode, action: &AsyncAction| {
            transition.apply(node, action)
        });
    }
    table
}

/// A built configuration: the dispatch table and the node it starts from.
#[derive(Clone, Debug)]
pub struct AsyncReducerConfig {
    /// `{NONE, initial payload, null}`.
    pub initial_state: AsyncStateNode,
    /// One entry per stage of every configured store key.
    pub table: AsyncDispatchTable,
}

impl AsyncReducerConfig {
    /// Wrap this configuration in a reducer.
    #[must_use]
    pub fn into_reducer(self) -> AsyncReducer {
        create_reducer(self.initial_state, self.table)
    }
}

/// Build the dispatch table for `payload_handlers` and `error_handlers`.
///
/// `error_handlers` defaults to an empty map.
///
/// # Errors
///
/// Returns [`ConfigShapeError`] when either handler is malformed; see
/// [`format_handler`].
pub fn build_reducer_config(
    initial_payload: Value,
    payload_handlers: Option<&Handler>,
    error_handlers: Option<&Handler>,
) -> Result<AsyncReducerConfig> {
    let empty = Handler::empty();
    let payload = format_handler(payload_handlers)?;
    let error = format_handler(Some(error_handlers.unwrap_or(&empty)))?;

    let store_keys = merge_handlers(&payload, &error);

    let mut table = DispatchTable::new();
    for store_key in &store_keys {
        table.extend(create_actions_handler(
            &initial_payload,
            store_key,
            payload.get(store_key),
            error.get(store_key),
        ));
    }

    tracing::debug!(
        store_keys = ?store_keys,
        entries = table.len(),
        "built async reducer config"
    );

    Ok(AsyncReducerConfig {
        initial_state: AsyncStateNode::initial(initial_payload),
        table,
    })
}

/// Build a configuration and wrap it in a reducer.
///
/// # Errors
///
/// Returns [`ConfigShapeError`] when either handler is malformed.
pub fn create_async_reducer(
    initial_payload: Value,
    payload_handlers: &Handler,
    error_handlers: Option<&Handler>,
) -> Result<AsyncReducer> {
    build_reducer_config(initial_payload, Some(payload_handlers), error_handlers)
        .map(AsyncReducerConfig::into_reducer)
}
